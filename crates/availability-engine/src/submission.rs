//! Provider contact details and the finalized submission record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};
use crate::exceptions::ExceptionDate;
use crate::offerings::ServiceOfferingDetails;
use crate::resolver::AvailabilityProfile;
use crate::schedule::WeeklySchedule;
use crate::services::ServiceCatalog;

/// Who the provider is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub business_name: String,
}

impl ContactInfo {
    /// Check required fields and email shape.
    ///
    /// # Errors
    /// `AvailabilityError::InvalidContact` naming the missing fields, or the
    /// invalid email.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("First Name", &self.first_name),
            ("Last Name", &self.last_name),
            ("Email", &self.email),
            ("Business Name", &self.business_name),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| *label)
            .collect();
        if !missing.is_empty() {
            return Err(AvailabilityError::InvalidContact(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        if !is_valid_email(&self.email) {
            return Err(AvailabilityError::InvalidContact(
                "Please enter a valid email address".to_string(),
            ));
        }
        Ok(())
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    #[default]
    Started,
    InProgress,
    /// Pricing, pets and logistics are in; availability is still to come.
    ServiceOfferingsSubmitted,
    Submitted,
}

/// A finalized onboarding submission. Never edited after creation; a later
/// finalization produces a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Assigned by the persistence layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub business_name: String,
    pub services: ServiceCatalog,
    pub schedule: WeeklySchedule,
    #[serde(default)]
    pub days_off: Vec<ExceptionDate>,
    #[serde(default)]
    pub additional_work_days: Vec<ExceptionDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_offerings: Option<ServiceOfferingDetails>,
    #[serde(default)]
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn contact(&self) -> ContactInfo {
        ContactInfo {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            business_name: self.business_name.clone(),
        }
    }

    pub fn profile(&self) -> AvailabilityProfile {
        AvailabilityProfile {
            services: self.services.clone(),
            schedule: self.schedule.clone(),
            days_off: self.days_off.clone(),
            additional_work_days: self.additional_work_days.clone(),
        }
    }
}

/// Order submissions for the admin view, newest first. Submissions created
/// at the same instant keep their relative order.
pub fn sort_newest_first(submissions: &mut [Submission]) {
    submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
