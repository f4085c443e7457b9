// ABOUTME: Wizard controller owning the session state and gating every transition
// All mutations of WizardState go through these operations

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::state::{SelectedFile, SubmissionStatus, WizardState, WizardStep};
use super::validation::{FileSizePolicy, StepFields, StepValidator, ValidationError};
use crate::notifications::{Notification, NotificationQueue};
use crate::transport::{
    PayloadFile, SubmissionError, SubmissionPayload, SubmissionReceipt, SubmissionTransport,
};

/// Reasons a controller operation was refused. The state is unchanged
/// whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Expected step {expected}, wizard is at step {actual}")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Select at least one file or skip this step")]
    FilesRequired,
    #[error("Files are selected; continue with them or clear the selection")]
    FilesAlreadySelected,
    #[error("A submission is already in progress")]
    SubmissionInFlight,
    #[error("This analysis has already been submitted")]
    AlreadySubmitted,
}

/// Knobs for controller behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardOptions {
    pub file_policy: FileSizePolicy,
    pub allow_back_navigation: bool,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            file_policy: FileSizePolicy::Unlimited,
            allow_back_navigation: true,
        }
    }
}

/// Snapshot of the data to submit, taken when the submission starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub project_name: String,
    pub analysis_description: String,
    pub files: Vec<SelectedFile>,
    pub file_policy: FileSizePolicy,
}

impl PendingSubmission {
    /// Read every file's bytes and build the transport payload.
    /// The size cap is checked again against the bytes actually read.
    pub async fn into_payload(self) -> Result<SubmissionPayload, SubmissionError> {
        let mut files = Vec::with_capacity(self.files.len());
        for file in self.files {
            let bytes = file.read_bytes().await.map_err(|e| SubmissionError::FileRead {
                name: file.name.clone(),
                reason: e.to_string(),
            })?;

            let read_size = bytes.len() as u64;
            if read_size != file.size {
                warn!(
                    "{} changed since selection: {} -> {} bytes",
                    file.name, file.size, read_size
                );
            }
            if let FileSizePolicy::MaxBytes(max) = self.file_policy {
                if read_size > max {
                    warn!(
                        "Refusing to send {}: {} bytes over cap of {}",
                        file.name, read_size, max
                    );
                    return Err(SubmissionError::FileTooLarge { name: file.name });
                }
            }

            files.push(PayloadFile {
                name: file.name,
                bytes,
            });
        }

        Ok(SubmissionPayload {
            project_name: self.project_name,
            analysis_description: self.analysis_description,
            files,
        })
    }

    /// Package and hand the submission to the transport
    pub async fn dispatch(
        self,
        transport: &dyn SubmissionTransport,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let payload = self.into_payload().await?;
        info!(
            "Submitting '{}' via {} transport ({} file(s))",
            payload.project_name,
            transport.name(),
            payload.files.len()
        );
        transport.submit(payload).await
    }
}

#[derive(Debug)]
pub struct WizardController {
    state: WizardState,
    validator: StepValidator,
    allow_back_navigation: bool,
    notifications: NotificationQueue,
}

impl WizardController {
    pub fn new(options: WizardOptions) -> Self {
        Self {
            state: WizardState::new(),
            validator: StepValidator::new(options.file_policy),
            allow_back_navigation: options.allow_back_navigation,
            notifications: NotificationQueue::new(),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    pub fn file_policy(&self) -> FileSizePolicy {
        self.validator.file_policy()
    }

    pub fn allows_back_navigation(&self) -> bool {
        self.allow_back_navigation
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    /// Step 1: accept the project name and move to the description
    pub fn submit_step1(&mut self, project_name: &str) -> Result<(), WizardError> {
        self.ensure_editable(WizardStep::ProjectName)?;

        self.check(WizardStep::ProjectName, &StepFields::project_name(project_name))?;

        self.state.project_name = project_name.trim().to_string();
        self.advance_to(WizardStep::AnalysisDescription);
        Ok(())
    }

    /// Step 2: accept the description and move to file attachment
    pub fn submit_step2(&mut self, analysis_description: &str) -> Result<(), WizardError> {
        self.ensure_editable(WizardStep::AnalysisDescription)?;

        self.check(
            WizardStep::AnalysisDescription,
            &StepFields::analysis_description(analysis_description),
        )?;

        self.state.analysis_description = analysis_description.trim().to_string();
        self.advance_to(WizardStep::FileAttachment);
        Ok(())
    }

    /// Step 3: replace the selection. Under a size cap an oversized file
    /// rejects the whole selection and keeps the previous one.
    pub fn select_files(&mut self, files: Vec<SelectedFile>) -> Result<(), WizardError> {
        self.ensure_editable(WizardStep::FileAttachment)?;

        if let Some(offender) = self.validator.file_policy().first_violation(&files) {
            warn!(
                "Rejecting file selection: {} is {} bytes ({})",
                offender.name,
                offender.size,
                self.validator.file_policy().describe()
            );
        }
        self.check(WizardStep::FileAttachment, &StepFields::files(&files))?;

        info!("Selected {} file(s)", files.len());
        self.state.selected_files = files;
        Ok(())
    }

    /// Step 3 → 4 with no attachments
    pub fn advance_skipping_files(&mut self) -> Result<(), WizardError> {
        self.ensure_editable(WizardStep::FileAttachment)?;

        if !self.state.selected_files.is_empty() {
            debug!("Skip refused: {} file(s) selected", self.state.selected_files.len());
            return Err(self.refuse(WizardError::FilesAlreadySelected));
        }

        self.advance_to(WizardStep::Review);
        Ok(())
    }

    /// Step 3 → 4 with the current attachments
    pub fn advance_with_files(&mut self) -> Result<(), WizardError> {
        self.ensure_editable(WizardStep::FileAttachment)?;

        if self.state.selected_files.is_empty() {
            debug!("Continue with files refused: nothing selected");
            return Err(self.refuse(WizardError::FilesRequired));
        }

        self.advance_to(WizardStep::Review);
        Ok(())
    }

    /// Move to the previous step, keeping entered data.
    /// Returns false when there is nowhere to go or navigation is locked.
    pub fn go_back(&mut self) -> bool {
        if !self.allow_back_navigation || self.is_locked() {
            return false;
        }

        if let Some(prev) = self.state.step.previous() {
            debug!("Going back from step {} to {}", self.state.step, prev);
            self.state.step = prev;
            // A failure banner from the review step no longer applies
            if matches!(self.state.submission_status, SubmissionStatus::Failed(_)) {
                self.state.submission_status = SubmissionStatus::Idle;
                self.notifications.push(Notification::warning(
                    "Previous submission failed; review again before resubmitting",
                ));
            }
            return true;
        }
        false
    }

    /// Start a submission from the review step.
    ///
    /// Returns `None` (and changes nothing) unless the wizard is at step 4
    /// with no submission in flight and none succeeded yet.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if self.state.step != WizardStep::Review {
            debug!("Submit ignored at step {}", self.state.step);
            return None;
        }

        match self.state.submission_status {
            SubmissionStatus::InFlight => {
                debug!("Submit ignored: submission already in flight");
                return None;
            }
            SubmissionStatus::Succeeded => {
                debug!("Submit ignored: already succeeded");
                return None;
            }
            SubmissionStatus::Idle | SubmissionStatus::Failed(_) => {}
        }

        let fields = StepFields {
            project_name: Some(&self.state.project_name),
            analysis_description: Some(&self.state.analysis_description),
            files: &self.state.selected_files,
        };
        if let Err(e) = self.validator.validate(WizardStep::Review, &fields).into_result() {
            // Unreachable through the public operations; guards direct state edits
            error!("Review data failed validation: {}", e);
            self.notifications.push(Notification::error(e.message));
            return None;
        }

        self.state.submission_status = SubmissionStatus::InFlight;
        info!("Submission started for '{}'", self.state.project_name);

        Some(PendingSubmission {
            project_name: self.state.project_name.clone(),
            analysis_description: self.state.analysis_description.clone(),
            files: self.state.selected_files.clone(),
            file_policy: self.validator.file_policy(),
        })
    }

    /// Record the transport outcome for the in-flight submission
    pub fn complete_submit(&mut self, outcome: Result<SubmissionReceipt, SubmissionError>) {
        if !self.state.submission_status.is_in_flight() {
            warn!("Ignoring submission outcome with no submission in flight");
            return;
        }

        match outcome {
            Ok(receipt) => {
                info!("Submission succeeded with id {}", receipt.id);
                self.notifications.push(Notification::success(format!(
                    "Analysis '{}' submitted",
                    self.state.project_name
                )));
                self.state.submission_status = SubmissionStatus::Succeeded;
                self.state.receipt = Some(receipt);
            }
            Err(e) => {
                error!("Submission failed: {}", e);
                let reason = e.reason();
                self.notifications.push(Notification::error(reason.clone()));
                self.state.submission_status = SubmissionStatus::Failed(reason);
            }
        }
    }

    /// Begin, dispatch and complete a submission in one call.
    /// Returns false if the submission was not started.
    pub async fn submit(&mut self, transport: &dyn SubmissionTransport) -> bool {
        let Some(pending) = self.begin_submit() else {
            return false;
        };
        let outcome = pending.dispatch(transport).await;
        self.complete_submit(outcome);
        true
    }

    /// Return to a fresh session. Refused while a submission is in flight.
    pub fn reset(&mut self) -> bool {
        if self.state.submission_status.is_in_flight() {
            debug!("Reset refused: submission in flight");
            return false;
        }
        info!("Resetting wizard");
        self.state = WizardState::new();
        self.notifications.clear();
        true
    }

    /// True while a submission is running or after it succeeded
    pub fn is_locked(&self) -> bool {
        matches!(
            self.state.submission_status,
            SubmissionStatus::InFlight | SubmissionStatus::Succeeded
        )
    }

    fn ensure_editable(&self, expected: WizardStep) -> Result<(), WizardError> {
        match self.state.submission_status {
            SubmissionStatus::InFlight => return Err(WizardError::SubmissionInFlight),
            SubmissionStatus::Succeeded => return Err(WizardError::AlreadySubmitted),
            SubmissionStatus::Idle | SubmissionStatus::Failed(_) => {}
        }

        if self.state.step != expected {
            return Err(WizardError::WrongStep {
                expected,
                actual: self.state.step,
            });
        }
        Ok(())
    }

    /// Validate and surface the first failure as a notification
    fn check(&mut self, step: WizardStep, fields: &StepFields<'_>) -> Result<(), WizardError> {
        match self.validator.validate(step, fields).into_result() {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!("Validation failed on step {}: {} ({})", step, e.message, e.field);
                Err(self.refuse(WizardError::Validation(e)))
            }
        }
    }

    fn refuse(&mut self, error: WizardError) -> WizardError {
        self.notifications.push(Notification::error(error.to_string()));
        error
    }

    fn advance_to(&mut self, step: WizardStep) {
        info!("Wizard advanced from step {} to {}", self.state.step, step);
        self.state.step = step;
    }
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(WizardOptions::default())
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
