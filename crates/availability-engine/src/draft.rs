//! In-progress onboarding drafts and where they are kept between sessions.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::exceptions::ExceptionSet;
use crate::offerings::ServiceOfferingDetails;
use crate::schedule::WeeklySchedule;
use crate::services::ServiceCatalog;
use crate::submission::{ContactInfo, SubmissionStatus};

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    /// Free-text description, structured by the language model.
    #[default]
    Overview,
    Services,
    Schedule,
    Exceptions,
    Summary,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Overview,
        WizardStep::Services,
        WizardStep::Schedule,
        WizardStep::Exceptions,
        WizardStep::Summary,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Overview => "Schedule & Service Submission",
            WizardStep::Services => "Services",
            WizardStep::Schedule => "Schedule",
            WizardStep::Exceptions => "Exceptions",
            WizardStep::Summary => "Summary",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> WizardStep {
        if self.is_last() {
            *self
        } else {
            Self::ALL[self.index() + 1]
        }
    }

    pub fn previous(&self) -> WizardStep {
        Self::ALL[self.index().saturating_sub(1)]
    }

    pub fn is_last(&self) -> bool {
        *self == WizardStep::Summary
    }
}

/// Everything the wizard has collected so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingDraft {
    pub onboarding_id: Option<String>,
    pub status: SubmissionStatus,
    pub contact: ContactInfo,
    pub step: WizardStep,
    /// Months (1-12) chosen for the calendar preview.
    pub months: Vec<u32>,
    /// The provider's own description, sent to the language model.
    pub overview: String,
    pub services: ServiceCatalog,
    pub schedule: WeeklySchedule,
    pub exceptions: ExceptionSet,
    pub service_offerings: Option<ServiceOfferingDetails>,
}

impl OnboardingDraft {
    /// A fresh draft previewing `month` (1-12).
    pub fn starting_in(month: u32) -> Self {
        Self {
            onboarding_id: None,
            status: SubmissionStatus::Started,
            contact: ContactInfo::default(),
            step: WizardStep::default(),
            months: vec![month],
            overview: String::new(),
            services: ServiceCatalog::unselected(),
            schedule: WeeklySchedule::unselected_week(),
            exceptions: ExceptionSet::default(),
            service_offerings: None,
        }
    }
}

impl Default for OnboardingDraft {
    /// Previews the current local month.
    fn default() -> Self {
        Self::starting_in(chrono::Local::now().month())
    }
}

/// Persistence for a single in-progress draft.
pub trait DraftStore {
    fn save(&mut self, draft: &OnboardingDraft) -> Result<()>;

    /// `None` when nothing has been saved.
    fn load(&self) -> Result<Option<OnboardingDraft>>;

    fn clear(&mut self) -> Result<()>;
}

/// Keeps the draft in memory; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryDraftStore {
    draft: Option<OnboardingDraft>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&mut self, draft: &OnboardingDraft) -> Result<()> {
        self.draft = Some(draft.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<OnboardingDraft>> {
        Ok(self.draft.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.draft = None;
        Ok(())
    }
}

/// Keeps the draft as pretty-printed JSON in one file.
#[derive(Debug, Clone)]
pub struct JsonFileDraftStore {
    path: PathBuf,
}

impl JsonFileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for JsonFileDraftStore {
    fn save(&mut self, draft: &OnboardingDraft) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(draft)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<OnboardingDraft>> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
