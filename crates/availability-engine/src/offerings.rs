//! The service-offerings phase: pricing tiers, accepted pets and logistics.
//!
//! After availability, the provider answers three free-text questions. The
//! language model turns each answer into JSON keyed by service:
//!
//! - `durationsAndCosts`: `{"walking": {"durations": [{"duration": "30 minutes", "cost": 30}]}}`
//! - `petTypes`: `{"walking": {"acceptedPets": ["Dogs"], "restrictions": {"size": "..."}}}`
//! - `logistics`: `{"generic": {"serviceArea": {...}, "travelFee": {...}},
//!   "serviceSpecific": {"walking": {"cancellationPolicy": "..."}}}`
//!
//! As with the availability intake, each answer is checked for structure
//! first and every problem is reported together.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AvailabilityError, Result};
use crate::services::ServiceKey;

/// Which of the three questions an answer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OfferingsAnalysis {
    DurationsAndCosts,
    PetTypes,
    Logistics,
}

impl OfferingsAnalysis {
    pub const ALL: [OfferingsAnalysis; 3] = [
        OfferingsAnalysis::DurationsAndCosts,
        OfferingsAnalysis::PetTypes,
        OfferingsAnalysis::Logistics,
    ];

    /// Wire name, also the form field the answer is stored under.
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferingsAnalysis::DurationsAndCosts => "durationsAndCosts",
            OfferingsAnalysis::PetTypes => "petTypes",
            OfferingsAnalysis::Logistics => "logistics",
        }
    }
}

impl fmt::Display for OfferingsAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferingsAnalysis {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self> {
        OfferingsAnalysis::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| AvailabilityError::InvalidAnalysisKind(s.to_string()))
    }
}

/// One priced visit length, e.g. `"30 minutes"` for 30.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationTier {
    pub duration: String,
    pub cost: f64,
}

impl fmt::Display for DurationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ${}", self.duration, money(self.cost))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDurations {
    pub durations: Vec<DurationTier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PetRestrictions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    /// Anything else the model reported, e.g. `"temperament"`.
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

impl PetRestrictions {
    /// `(name, value)` pairs, size and capacity first.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let known = [("size", &self.size), ("capacity", &self.capacity)];
        known
            .into_iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
            .chain(self.other.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PetPolicy {
    pub accepted_pets: Vec<String>,
    pub restrictions: PetRestrictions,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceArea {
    pub zip_codes: Vec<String>,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelFee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
}

/// Logistics that apply to every service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenericLogistics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_area: Option<ServiceArea>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_fee: Option<TravelFee>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceLogistics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_policy: Option<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

impl ServiceLogistics {
    pub fn entries(&self) -> Vec<(&str, &str)> {
        self.cancellation_policy
            .as_deref()
            .map(|v| ("cancellationPolicy", v))
            .into_iter()
            .chain(self.other.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Logistics {
    pub generic: GenericLogistics,
    pub service_specific: BTreeMap<ServiceKey, ServiceLogistics>,
}

/// Everything collected in the service-offerings phase.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceOfferingDetails {
    /// Services ticked on the form, in form order.
    pub services: Vec<ServiceKey>,
    pub durations: BTreeMap<ServiceKey, ServiceDurations>,
    pub pets: BTreeMap<ServiceKey, PetPolicy>,
    pub logistics: Logistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_comments: Option<String>,
}

/// One row of the service summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub service: ServiceKey,
    pub label: &'static str,
    pub durations: Vec<DurationTier>,
    pub accepted_pets: Vec<String>,
    /// `"Size: Up to 60 pounds"` style lines.
    pub restrictions: Vec<String>,
    pub logistics: Vec<String>,
}

const NO_GENERIC_LOGISTICS: &str = "No generic logistics information available";

impl ServiceOfferingDetails {
    /// One row per selected service. Services the answers never mention
    /// still get a row, with empty columns.
    pub fn summary(&self) -> Vec<ServiceSummary> {
        self.services
            .iter()
            .map(|key| {
                let pets = self.pets.get(key).cloned().unwrap_or_default();
                let logistics = self.logistics.service_specific.get(key);
                ServiceSummary {
                    service: *key,
                    label: key.label(),
                    durations: self
                        .durations
                        .get(key)
                        .map(|d| d.durations.clone())
                        .unwrap_or_default(),
                    restrictions: pets
                        .restrictions
                        .entries()
                        .into_iter()
                        .map(|(k, v)| format!("{}: {}", capitalize(k), v))
                        .collect(),
                    accepted_pets: pets.accepted_pets,
                    logistics: logistics
                        .map(|l| l.entries())
                        .unwrap_or_default()
                        .into_iter()
                        .map(|(k, v)| format!("{}: {}", capitalize(k), v))
                        .collect(),
                }
            })
            .collect()
    }

    /// Display lines for logistics shared by every service.
    pub fn generic_logistics(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let generic = &self.logistics.generic;

        if let Some(area) = &generic.service_area {
            let zips = if area.zip_codes.is_empty() {
                "Not specified".to_string()
            } else {
                area.zip_codes.join(", ")
            };
            let locations = if area.locations.is_empty() {
                String::new()
            } else {
                format!(" ({})", area.locations.join(", "))
            };
            lines.push(format!("Service Area: {}{}", zips, locations));
        }

        if let Some(travel) = &generic.travel_fee {
            let fee = travel.fee.map(money).unwrap_or_else(|| "N/A".to_string());
            let distance = travel.distance.as_deref().unwrap_or("N/A");
            lines.push(format!("Travel Fee: ${} for distances over {}", fee, distance));
        }

        if lines.is_empty() {
            lines.push(NO_GENERIC_LOGISTICS.to_string());
        }
        lines
    }
}

fn money(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Structure validation
// ---------------------------------------------------------------------------

/// List every structural problem in one model answer.
pub fn validate_analysis(kind: OfferingsAnalysis, answer: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(root) = answer.as_object() else {
        errors.push(format!("{} must be a JSON object", kind));
        return errors;
    };

    match kind {
        OfferingsAnalysis::DurationsAndCosts => {
            for (name, entry) in services_in(root, &mut errors) {
                check_durations(name, entry, &mut errors);
            }
        }
        OfferingsAnalysis::PetTypes => {
            for (name, entry) in services_in(root, &mut errors) {
                check_pets(name, entry, &mut errors);
            }
        }
        OfferingsAnalysis::Logistics => check_logistics(root, &mut errors),
    }
    errors
}

/// Entries keyed by a known service; unknown keys are reported.
fn services_in<'a>(
    map: &'a Map<String, Value>,
    errors: &mut Vec<String>,
) -> Vec<(&'a str, &'a Value)> {
    let mut known = Vec::with_capacity(map.len());
    for (name, entry) in map {
        if ServiceKey::parse(name).is_some() {
            known.push((name.as_str(), entry));
        } else {
            errors.push(format!("Unknown service: {}", name));
        }
    }
    known
}

fn check_durations(name: &str, entry: &Value, errors: &mut Vec<String>) {
    let Some(tiers) = entry.get("durations").and_then(Value::as_array) else {
        errors.push(format!("{}.durations must be an array", name));
        return;
    };
    for (i, tier) in tiers.iter().enumerate() {
        if !tier.get("duration").is_some_and(Value::is_string) {
            errors.push(format!("{}.durations[{}].duration must be a string", name, i));
        }
        if !tier.get("cost").is_some_and(Value::is_number) {
            errors.push(format!("{}.durations[{}].cost must be a number", name, i));
        }
    }
}

fn check_pets(name: &str, entry: &Value, errors: &mut Vec<String>) {
    if !entry.is_object() {
        errors.push(format!("{} must be an object", name));
        return;
    }
    if let Some(pets) = present(entry, "acceptedPets") {
        if !is_string_array(pets) {
            errors.push(format!("{}.acceptedPets must be an array of strings", name));
        }
    }
    if let Some(restrictions) = present(entry, "restrictions") {
        if !is_string_map(restrictions) {
            errors.push(format!("{}.restrictions must be an object of strings", name));
        }
    }
}

fn check_logistics(root: &Map<String, Value>, errors: &mut Vec<String>) {
    if let Some(generic) = root.get("generic").filter(|v| !v.is_null()) {
        if !generic.is_object() {
            errors.push("generic must be an object".to_string());
        } else {
            if let Some(area) = present(generic, "serviceArea") {
                if !area.is_object() {
                    errors.push("generic.serviceArea must be an object".to_string());
                }
                for field in ["zipCodes", "locations"] {
                    if present(area, field).is_some_and(|v| !is_string_array(v)) {
                        errors.push(format!(
                            "generic.serviceArea.{} must be an array of strings",
                            field
                        ));
                    }
                }
            }
            if let Some(travel) = present(generic, "travelFee") {
                if !travel.is_object() {
                    errors.push("generic.travelFee must be an object".to_string());
                }
                if present(travel, "fee").is_some_and(|v| !v.is_number()) {
                    errors.push("generic.travelFee.fee must be a number".to_string());
                }
                if present(travel, "distance").is_some_and(|v| !v.is_string()) {
                    errors.push("generic.travelFee.distance must be a string".to_string());
                }
            }
        }
    }

    if let Some(specific) = root.get("serviceSpecific").filter(|v| !v.is_null()) {
        match specific.as_object() {
            Some(map) => {
                for (name, entry) in services_in(map, errors) {
                    if !is_string_map(entry) {
                        errors.push(format!(
                            "serviceSpecific.{} must be an object of strings",
                            name
                        ));
                    }
                }
            }
            None => errors.push("serviceSpecific must be an object".to_string()),
        }
    }
}

fn present<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    value.get(field).filter(|v| !v.is_null())
}

fn is_string_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string))
}

fn is_string_map(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.values().all(Value::is_string))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn decode<T: DeserializeOwned>(kind: OfferingsAnalysis, mut answer: Value) -> Result<T> {
    let errors = validate_analysis(kind, &answer);
    if !errors.is_empty() {
        return Err(AvailabilityError::InvalidIntake(errors));
    }
    strip_nulls(&mut answer);
    Ok(serde_json::from_value(answer)?)
}

/// Null fields mean "not mentioned"; drop them so defaults apply.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Parse the `durationsAndCosts` answer.
pub fn parse_durations(json: &str) -> Result<BTreeMap<ServiceKey, ServiceDurations>> {
    decode(OfferingsAnalysis::DurationsAndCosts, serde_json::from_str(json)?)
}

/// Parse the `petTypes` answer.
pub fn parse_pet_policies(json: &str) -> Result<BTreeMap<ServiceKey, PetPolicy>> {
    decode(OfferingsAnalysis::PetTypes, serde_json::from_str(json)?)
}

/// Parse the `logistics` answer.
pub fn parse_logistics(json: &str) -> Result<Logistics> {
    decode(OfferingsAnalysis::Logistics, serde_json::from_str(json)?)
}

/// Parse the whole service-offerings form.
///
/// The form carries `services` (service key to ticked flag), the three
/// model answers and optional `additionalComments`. Answers may be embedded
/// objects or the raw JSON strings the model returned. Problems from every
/// part are reported together, each prefixed with its field.
///
/// # Errors
/// - `AvailabilityError::Json` if `json` itself is not JSON.
/// - `AvailabilityError::InvalidIntake` listing every structural problem.
pub fn parse_offerings_form(json: &str) -> Result<ServiceOfferingDetails> {
    let form: Value = serde_json::from_str(json)?;
    let mut errors = Vec::new();

    let services = selected_services(&form, &mut errors);

    let mut answers = Vec::with_capacity(OfferingsAnalysis::ALL.len());
    for kind in OfferingsAnalysis::ALL {
        let mut answer = match form.get(kind.as_str()) {
            None | Some(Value::Null) => {
                errors.push(format!("Missing {}", kind));
                Value::Null
            }
            Some(Value::String(raw)) => match serde_json::from_str(raw) {
                Ok(value) => value,
                Err(e) => {
                    errors.push(format!("{} is not valid JSON: {}", kind, e));
                    Value::Null
                }
            },
            Some(value) => value.clone(),
        };
        if !answer.is_null() {
            errors.extend(
                validate_analysis(kind, &answer)
                    .into_iter()
                    .map(|e| format!("{}: {}", kind, e)),
            );
        }
        strip_nulls(&mut answer);
        answers.push(answer);
    }

    if !errors.is_empty() {
        return Err(AvailabilityError::InvalidIntake(errors));
    }

    let mut answers = answers.into_iter();
    let mut next = || answers.next().unwrap_or(Value::Null);
    let durations = serde_json::from_value(next())?;
    let pets = serde_json::from_value(next())?;
    let logistics = serde_json::from_value(next())?;

    let additional_comments = form
        .get("additionalComments")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(ServiceOfferingDetails {
        services,
        durations,
        pets,
        logistics,
        additional_comments,
    })
}

fn selected_services(form: &Value, errors: &mut Vec<String>) -> Vec<ServiceKey> {
    let Some(map) = form.get("services").and_then(Value::as_object) else {
        errors.push("Missing services object".to_string());
        return Vec::new();
    };
    let mut selected = Vec::new();
    for (name, flag) in map {
        match (ServiceKey::parse(name), flag.as_bool()) {
            (None, _) => errors.push(format!("Unknown service: {}", name)),
            (Some(_), None) => errors.push(format!("services.{} must be true or false", name)),
            (Some(key), Some(true)) => {
                if !selected.contains(&key) {
                    selected.push(key);
                }
            }
            (Some(_), Some(false)) => {}
        }
    }
    selected
}
