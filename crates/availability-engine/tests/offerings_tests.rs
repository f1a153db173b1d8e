//! Tests for the service-offerings phase: answer validation, form parsing
//! and the summary table.

use availability_engine::offerings::{
    parse_durations, parse_logistics, parse_offerings_form, parse_pet_policies,
    validate_analysis, OfferingsAnalysis, ServiceOfferingDetails,
};
use availability_engine::services::ServiceKey;
use availability_engine::AvailabilityError;
use serde_json::json;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn durations_answer() -> serde_json::Value {
    json!({
        "walking": {"durations": [
            {"duration": "30 minutes", "cost": 30},
            {"duration": "60 minutes", "cost": 45}
        ]},
        "sitting": {"durations": [{"duration": "30 minutes", "cost": 25}]},
        "overnights": {"durations": [{"duration": "per night", "cost": 95.5}]}
    })
}

fn pets_answer() -> serde_json::Value {
    json!({
        "walking": {
            "acceptedPets": ["Dogs"],
            "restrictions": {"size": "Up to 60 pounds", "temperament": "No reactive dogs"}
        },
        "sitting": {"acceptedPets": ["Dogs", "Cats"], "restrictions": {"capacity": "3 pets"}}
    })
}

fn logistics_answer() -> serde_json::Value {
    json!({
        "generic": {
            "serviceArea": {"zipCodes": ["60015", "60035"], "locations": ["Deerfield, IL"]},
            "travelFee": {"distance": "5 miles", "fee": 5}
        },
        "serviceSpecific": {
            "walking": {"cancellationPolicy": "24 hours notice"},
            "overnights": {"keyPickup": "Day before the stay"}
        }
    })
}

fn form() -> serde_json::Value {
    json!({
        "services": {"walking": true, "sitting": true, "overnights": true, "homeBoarding": false},
        "durationsAndCosts": durations_answer(),
        "petTypes": pets_answer(),
        "logistics": logistics_answer(),
        "additionalComments": "  Happy to send photos.  "
    })
}

fn invalid_intake(err: AvailabilityError) -> Vec<String> {
    match err {
        AvailabilityError::InvalidIntake(errors) => errors,
        other => panic!("expected InvalidIntake, got {other:?}"),
    }
}

// ── Form parsing ────────────────────────────────────────────────────────────

#[test]
fn complete_form_decodes() {
    let details = parse_offerings_form(&form().to_string()).unwrap();

    assert_eq!(
        details.services,
        vec![ServiceKey::Walking, ServiceKey::Sitting, ServiceKey::Overnights]
    );
    assert_eq!(details.durations[&ServiceKey::Walking].durations.len(), 2);
    assert_eq!(details.durations[&ServiceKey::Overnights].durations[0].cost, 95.5);
    assert_eq!(
        details.pets[&ServiceKey::Sitting].restrictions.capacity.as_deref(),
        Some("3 pets")
    );
    assert_eq!(details.additional_comments.as_deref(), Some("Happy to send photos."));
}

#[test]
fn answers_may_arrive_as_json_strings() {
    let mut form = form();
    form["durationsAndCosts"] = json!(durations_answer().to_string());
    form["logistics"] = json!(logistics_answer().to_string());

    let details = parse_offerings_form(&form.to_string()).unwrap();
    assert_eq!(details.durations.len(), 3);
    assert_eq!(
        details.logistics.generic.travel_fee.as_ref().and_then(|t| t.fee),
        Some(5.0)
    );
}

#[test]
fn form_problems_are_reported_together_with_their_field() {
    let bad = json!({
        "services": {"walking": "yes", "grooming": true},
        "durationsAndCosts": {"walking": {"durations": [{"duration": 30, "cost": "30"}]}},
        "petTypes": "not json at all",
    });

    let errors = invalid_intake(parse_offerings_form(&bad.to_string()).unwrap_err());
    assert!(errors.contains(&"services.walking must be true or false".to_string()));
    assert!(errors.contains(&"Unknown service: grooming".to_string()));
    assert!(errors.contains(
        &"durationsAndCosts: walking.durations[0].duration must be a string".to_string()
    ));
    assert!(errors.contains(
        &"durationsAndCosts: walking.durations[0].cost must be a number".to_string()
    ));
    assert!(errors.iter().any(|e| e.starts_with("petTypes is not valid JSON")));
    assert!(errors.contains(&"Missing logistics".to_string()));
}

#[test]
fn missing_services_object_is_reported() {
    let mut form = form();
    form.as_object_mut().unwrap().remove("services");
    let errors = invalid_intake(parse_offerings_form(&form.to_string()).unwrap_err());
    assert_eq!(errors, vec!["Missing services object"]);
}

#[test]
fn non_json_form_is_a_json_error() {
    let err = parse_offerings_form("walking please").unwrap_err();
    assert!(matches!(err, AvailabilityError::Json(_)));
}

#[test]
fn blank_comments_are_dropped() {
    let mut form = form();
    form["additionalComments"] = json!("   ");
    let details = parse_offerings_form(&form.to_string()).unwrap();
    assert_eq!(details.additional_comments, None);
}

// ── Individual answers ──────────────────────────────────────────────────────

#[test]
fn each_answer_parses_on_its_own() {
    let durations = parse_durations(&durations_answer().to_string()).unwrap();
    assert_eq!(
        durations[&ServiceKey::Walking].durations[1].to_string(),
        "60 minutes: $45"
    );

    let pets = parse_pet_policies(&pets_answer().to_string()).unwrap();
    assert_eq!(pets[&ServiceKey::Walking].accepted_pets, vec!["Dogs"]);
    assert_eq!(
        pets[&ServiceKey::Walking].restrictions.other["temperament"],
        "No reactive dogs"
    );

    let logistics = parse_logistics(&logistics_answer().to_string()).unwrap();
    assert_eq!(
        logistics.service_specific[&ServiceKey::Overnights].other["keyPickup"],
        "Day before the stay"
    );
}

#[test]
fn singular_overnight_is_accepted() {
    let answer = json!({"overnight": {"durations": [{"duration": "per night", "cost": 80}]}});
    assert!(validate_analysis(OfferingsAnalysis::DurationsAndCosts, &answer).is_empty());
    let durations = parse_durations(&answer.to_string()).unwrap();
    assert!(durations.contains_key(&ServiceKey::Overnights));
}

#[test]
fn answer_structure_errors() {
    assert_eq!(
        validate_analysis(OfferingsAnalysis::PetTypes, &json!([])),
        vec!["petTypes must be a JSON object"]
    );
    assert_eq!(
        validate_analysis(
            OfferingsAnalysis::PetTypes,
            &json!({"walking": {"acceptedPets": "Dogs", "restrictions": {"size": 60}}})
        ),
        vec![
            "walking.acceptedPets must be an array of strings",
            "walking.restrictions must be an object of strings",
        ]
    );
    assert_eq!(
        validate_analysis(
            OfferingsAnalysis::Logistics,
            &json!({
                "generic": {"serviceArea": {"zipCodes": [60015]}, "travelFee": {"fee": "five"}},
                "serviceSpecific": {"walking": {"cancellationPolicy": 24}}
            })
        ),
        vec![
            "generic.serviceArea.zipCodes must be an array of strings",
            "generic.travelFee.fee must be a number",
            "serviceSpecific.walking must be an object of strings",
        ]
    );
    assert_eq!(
        validate_analysis(OfferingsAnalysis::Logistics, &json!({"serviceSpecific": []})),
        vec!["serviceSpecific must be an object"]
    );
}

#[test]
fn null_sections_are_allowed() {
    let answer = json!({"generic": null, "serviceSpecific": null});
    let logistics = parse_logistics(&answer.to_string()).unwrap();
    assert!(logistics.service_specific.is_empty());
}

// ── Summary table ───────────────────────────────────────────────────────────

#[test]
fn summary_has_a_row_per_selected_service() {
    let details = parse_offerings_form(&form().to_string()).unwrap();
    let rows = details.summary();
    assert_eq!(rows.len(), 3);

    let walking = &rows[0];
    assert_eq!(walking.label, "Walking");
    assert_eq!(walking.accepted_pets, vec!["Dogs"]);
    assert_eq!(
        walking.restrictions,
        vec!["Size: Up to 60 pounds", "Temperament: No reactive dogs"]
    );
    assert_eq!(walking.logistics, vec!["CancellationPolicy: 24 hours notice"]);

    // Overnights has no pet answer; its columns stay empty.
    let overnights = &rows[2];
    assert!(overnights.accepted_pets.is_empty());
    assert_eq!(overnights.durations[0].to_string(), "per night: $95.50");
    assert_eq!(overnights.logistics, vec!["KeyPickup: Day before the stay"]);
}

#[test]
fn generic_logistics_lines() {
    let details = parse_offerings_form(&form().to_string()).unwrap();
    assert_eq!(
        details.generic_logistics(),
        vec![
            "Service Area: 60015, 60035 (Deerfield, IL)",
            "Travel Fee: $5 for distances over 5 miles",
        ]
    );
}

#[test]
fn generic_logistics_fallbacks() {
    let mut details = ServiceOfferingDetails::default();
    assert_eq!(
        details.generic_logistics(),
        vec!["No generic logistics information available"]
    );

    details.logistics = parse_logistics(
        &json!({"generic": {"serviceArea": {}, "travelFee": {}}}).to_string(),
    )
    .unwrap();
    assert_eq!(
        details.generic_logistics(),
        vec!["Service Area: Not specified", "Travel Fee: $N/A for distances over N/A"]
    );
}

#[test]
fn details_round_trip_through_a_submission_record() {
    let details = parse_offerings_form(&form().to_string()).unwrap();
    let stored = serde_json::to_value(&details).unwrap();
    assert_eq!(stored["services"], json!(["walking", "sitting", "overnights"]));
    assert_eq!(
        stored["pets"]["walking"]["restrictions"]["temperament"],
        "No reactive dogs"
    );
    let back: ServiceOfferingDetails = serde_json::from_value(stored).unwrap();
    assert_eq!(back, details);
}
