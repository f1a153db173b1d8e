//! # availability-engine
//!
//! Availability resolution for pet-care provider onboarding.
//!
//! A provider describes a recurring weekly schedule, the services they offer,
//! and one-off exceptions (days off, additional working days). This crate
//! resolves that description into per-day availability and month calendar
//! grids, and carries the onboarding wizard state that produces it.
//!
//! ## Quick start
//!
//! ```rust
//! use availability_engine::{format_time, AvailabilityProfile};
//! use chrono::NaiveDate;
//!
//! let json = r#"{
//!   "services": {"walking": {"selected": true, "cost": 30, "duration": 30}},
//!   "schedule": {"Friday": {"selected": true, "startTime": "09:00", "endTime": "17:00"}},
//!   "daysOff": [],
//!   "additionalWorkDays": []
//! }"#;
//! let profile: AvailabilityProfile = serde_json::from_str(json).unwrap();
//! let day = profile.resolve(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
//! assert!(day.available);
//! assert_eq!(day.window.unwrap().to_string(), "9AM-5PM");
//! assert_eq!(format_time("13:30").unwrap(), "1:30PM");
//! ```
//!
//! ## Modules
//!
//! - [`resolver`]: weekly schedule + exceptions + services → `DayAvailability`
//! - [`calendar`]: month expansion into a Sunday-first grid
//! - [`clock`]: `HH:MM` times, windows, 12-hour display
//! - [`schedule`], [`services`], [`exceptions`]: the data model
//! - [`intake`]: validation of structured language-model responses
//! - [`offerings`]: service offering details and their summary table
//! - [`retry`]: retry with exponential backoff
//! - [`draft`], [`wizard`]: draft storage and the onboarding wizard controller
//! - [`submission`]: contact info and finalized submissions
//! - [`config`]: engine configuration
//! - [`error`]: error types

pub mod calendar;
pub mod clock;
pub mod config;
pub mod draft;
pub mod error;
pub mod exceptions;
pub mod intake;
pub mod offerings;
pub mod resolver;
pub mod retry;
pub mod schedule;
pub mod services;
pub mod submission;
pub mod wizard;

pub use calendar::{month_grid, CalendarCell, MonthGrid};
pub use clock::{format_time, ClockTime, TimeWindow};
pub use config::EngineConfig;
pub use draft::{DraftStore, JsonFileDraftStore, MemoryDraftStore, OnboardingDraft, WizardStep};
pub use error::AvailabilityError;
pub use exceptions::{ExceptionDate, ExceptionSet};
pub use intake::{parse_intake, parse_intake_now, IntakeResponse};
pub use offerings::{
    parse_offerings_form, OfferingsAnalysis, ServiceOfferingDetails, ServiceSummary,
};
pub use resolver::{resolve_day, AvailabilityProfile, DayAvailability, DayKind, ResolveOptions};
pub use retry::{with_retry, BackoffPolicy, RetryError};
pub use schedule::{DaySchedule, WeeklySchedule};
pub use services::{ServiceCatalog, ServiceKey, ServiceOffering};
pub use submission::{ContactInfo, Submission, SubmissionStatus};
pub use wizard::OnboardingWizard;
