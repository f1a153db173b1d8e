//! The onboarding wizard controller.
//!
//! [`OnboardingWizard`] owns the in-progress [`OnboardingDraft`] and borrows
//! a [`DraftStore`]; every change is written through to the store so an
//! interrupted session can be reopened where it left off.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::calendar::{month_grid, MonthGrid};
use crate::draft::{DraftStore, OnboardingDraft, WizardStep};
use crate::error::{AvailabilityError, Result};
use crate::exceptions::ExceptionDate;
use crate::intake::IntakeResponse;
use crate::offerings::ServiceOfferingDetails;
use crate::resolver::{AvailabilityProfile, ResolveOptions};
use crate::schedule::WeeklySchedule;
use crate::services::ServiceCatalog;
use crate::submission::{ContactInfo, Submission, SubmissionStatus};

pub struct OnboardingWizard<'s, S: DraftStore + ?Sized> {
    store: &'s mut S,
    draft: OnboardingDraft,
}

impl<'s, S: DraftStore + ?Sized> OnboardingWizard<'s, S> {
    /// Resume the stored draft, or start a fresh one previewing the
    /// current month.
    pub fn open(store: &'s mut S) -> Result<Self> {
        Self::open_in_month(store, chrono::Local::now().month())
    }

    /// Like [`open`](Self::open), but a fresh draft previews `month` (1-12).
    pub fn open_in_month(store: &'s mut S, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AvailabilityError::InvalidMonth(month.to_string()));
        }
        let draft = match store.load()? {
            Some(draft) => draft,
            None => OnboardingDraft::starting_in(month),
        };
        Ok(Self { store, draft })
    }

    pub fn draft(&self) -> &OnboardingDraft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.draft.step
    }

    pub fn next_step(&mut self) -> Result<WizardStep> {
        self.update(|d| d.step = d.step.next())?;
        Ok(self.draft.step)
    }

    pub fn previous_step(&mut self) -> Result<WizardStep> {
        self.update(|d| d.step = d.step.previous())?;
        Ok(self.draft.step)
    }

    pub fn set_contact(&mut self, contact: ContactInfo) -> Result<()> {
        self.update(|d| d.contact = contact)
    }

    pub fn set_onboarding_id(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        self.update(|d| d.onboarding_id = Some(id))
    }

    pub fn set_overview(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.update(|d| d.overview = text)
    }

    /// Replace services, schedule and exceptions with a structured model
    /// response, and move past the overview step.
    pub fn apply_intake(&mut self, intake: IntakeResponse) -> Result<()> {
        self.update(|d| {
            d.exceptions = intake.exceptions();
            d.services = intake.services;
            d.schedule = intake.schedule;
            if d.step == WizardStep::Overview {
                d.step = d.step.next();
            }
        })
    }

    pub fn set_services(&mut self, services: ServiceCatalog) -> Result<()> {
        self.update(|d| d.services = services)
    }

    pub fn set_schedule(&mut self, schedule: WeeklySchedule) -> Result<()> {
        self.update(|d| d.schedule = schedule)
    }

    /// Add or remove a month (1-12) from the calendar preview selection.
    pub fn toggle_month(&mut self, month: u32) -> Result<()> {
        if !(1..=12).contains(&month) {
            return Err(AvailabilityError::InvalidMonth(month.to_string()));
        }
        self.update(|d| {
            if let Some(pos) = d.months.iter().position(|m| *m == month) {
                d.months.remove(pos);
            } else {
                d.months.push(month);
            }
        })
    }

    pub fn add_day_off(&mut self, date: NaiveDate) -> Result<()> {
        if self.draft.exceptions.is_additional_work_day(date) {
            tracing::warn!(%date, "date is also an additional work day; day off takes precedence");
        }
        self.update(|d| d.exceptions.add_day_off(date))
    }

    /// Returns whether an entry was removed.
    pub fn remove_day_off(&mut self, date: NaiveDate) -> Result<bool> {
        let mut removed = false;
        self.update(|d| removed = d.exceptions.remove_day_off(date))?;
        Ok(removed)
    }

    pub fn add_additional_work_day(&mut self, entry: ExceptionDate) -> Result<()> {
        if let Some(date) = entry.key() {
            if self.draft.exceptions.is_day_off(date) {
                tracing::warn!(%date, "date is also a day off; day off takes precedence");
            }
        }
        self.update(|d| d.exceptions.add_additional_work_day(entry))
    }

    /// Returns whether an entry was removed.
    pub fn remove_additional_work_day(&mut self, date: NaiveDate) -> Result<bool> {
        let mut removed = false;
        self.update(|d| removed = d.exceptions.remove_additional_work_day(date))?;
        Ok(removed)
    }

    /// Record the service-offerings phase.
    pub fn submit_service_offerings(&mut self, details: ServiceOfferingDetails) -> Result<()> {
        self.update(|d| {
            d.service_offerings = Some(details);
            d.status = SubmissionStatus::ServiceOfferingsSubmitted;
        })
    }

    /// The draft's current services, schedule and exceptions.
    pub fn profile(&self) -> AvailabilityProfile {
        AvailabilityProfile::new(
            self.draft.services.clone(),
            self.draft.schedule.clone(),
            self.draft.exceptions.clone(),
        )
    }

    /// Calendar previews for each selected month, in selection order.
    pub fn preview(&self, year: i32, options: &ResolveOptions) -> Result<Vec<MonthGrid>> {
        let profile = self.profile();
        self.draft
            .months
            .iter()
            .map(|m| month_grid(&profile, year, *m, options))
            .collect()
    }

    /// Turn the draft into a submission and clear the store.
    ///
    /// # Errors
    /// `InvalidContact` or `MissingOnboardingId` when the draft is incomplete;
    /// the stored draft is kept in that case.
    pub fn finalize(self, now: DateTime<Utc>) -> Result<Submission> {
        self.draft.contact.validate()?;
        let onboarding_id = match &self.draft.onboarding_id {
            Some(id) if !id.trim().is_empty() => id.clone(),
            _ => return Err(AvailabilityError::MissingOnboardingId),
        };

        let OnboardingDraft {
            contact,
            services,
            schedule,
            exceptions,
            service_offerings,
            ..
        } = self.draft;

        let submission = Submission {
            id: None,
            onboarding_id: Some(onboarding_id),
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            business_name: contact.business_name,
            services,
            schedule,
            days_off: exceptions.days_off,
            additional_work_days: exceptions.additional_work_days,
            service_offerings,
            status: SubmissionStatus::Submitted,
            created_at: now,
        };

        self.store.clear()?;
        tracing::info!(email = %submission.email, "onboarding submission finalized");
        Ok(submission)
    }

    /// Apply `change` to a copy and keep it only once the store has it.
    fn update<F: FnOnce(&mut OnboardingDraft)>(&mut self, change: F) -> Result<()> {
        let mut next = self.draft.clone();
        if next.status == SubmissionStatus::Started {
            next.status = SubmissionStatus::InProgress;
        }
        change(&mut next);
        self.store.save(&next)?;
        self.draft = next;
        Ok(())
    }
}
