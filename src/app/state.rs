// ABOUTME: Application state for the wizard TUI
// Couples the wizard controller with text inputs, the prompt reveal and submission plumbing

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::notifications::Notification;
use crate::transport::{SubmissionError, SubmissionReceipt, SubmissionTransport};
use crate::wizard::{
    parse_file_list, PendingSubmission, RevealDriver, WizardController, WizardPhase, WizardStep,
};

/// Headline revealed once the submission succeeded
pub const SUCCESS_PROMPT: &str = "Your analysis request is on its way.";

/// Single-line text input with a character-indexed cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Text before and after the cursor, for rendering
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_offset(self.cursor))
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

/// Raw text typed on each input step. Kept apart from the accepted values so
/// that going back shows what the user typed.
#[derive(Debug, Clone, Default)]
pub struct StepInputs {
    pub project_name: TextInput,
    pub analysis_description: TextInput,
    pub file_paths: TextInput,
}

impl StepInputs {
    pub fn for_step(&self, step: WizardStep) -> Option<&TextInput> {
        match step {
            WizardStep::ProjectName => Some(&self.project_name),
            WizardStep::AnalysisDescription => Some(&self.analysis_description),
            WizardStep::FileAttachment => Some(&self.file_paths),
            WizardStep::Review => None,
        }
    }

    pub fn for_step_mut(&mut self, step: WizardStep) -> Option<&mut TextInput> {
        match step {
            WizardStep::ProjectName => Some(&mut self.project_name),
            WizardStep::AnalysisDescription => Some(&mut self.analysis_description),
            WizardStep::FileAttachment => Some(&mut self.file_paths),
            WizardStep::Review => None,
        }
    }
}

pub struct AppState {
    pub controller: WizardController,
    pub inputs: StepInputs,
    /// Reveal of the current step's prompt
    pub reveal: RevealDriver,
    /// Submission started by the user, waiting to be dispatched by `App::tick`
    pub pending_submission: Option<PendingSubmission>,
    pub should_quit: bool,
    /// Advances once per tick; drives the in-flight spinner
    pub tick_count: usize,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            controller: WizardController::new(config.wizard.options()),
            inputs: StepInputs::default(),
            reveal: RevealDriver::new(config.reveal.timing(), config.reveal.enabled),
            pending_submission: None,
            should_quit: false,
            tick_count: 0,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.controller.step()
    }

    pub fn phase(&self) -> WizardPhase {
        self.controller.state().phase()
    }

    /// Text input for the current step, if it has one
    pub fn active_input(&self) -> Option<&TextInput> {
        if self.controller.is_locked() {
            return None;
        }
        self.inputs.for_step(self.current_step())
    }

    pub fn active_input_mut(&mut self) -> Option<&mut TextInput> {
        if self.controller.is_locked() {
            return None;
        }
        let step = self.current_step();
        self.inputs.for_step_mut(step)
    }

    /// Prompt that should currently be revealed
    pub fn current_prompt(&self) -> &'static str {
        match self.phase() {
            WizardPhase::Step(step) => step.prompt(),
            WizardPhase::Succeeded => SUCCESS_PROMPT,
        }
    }

    /// Point the reveal at the prompt for whatever is on screen now.
    /// A changed prompt restarts the reveal from empty.
    pub fn sync_reveal(&mut self) {
        let prompt = self.current_prompt();
        self.reveal.set_target(prompt);
    }

    /// Enter on the current step
    pub fn confirm_step(&mut self) {
        match self.phase() {
            WizardPhase::Succeeded => {}
            WizardPhase::Step(WizardStep::ProjectName) => {
                let value = self.inputs.project_name.value().to_string();
                if let Err(e) = self.controller.submit_step1(&value) {
                    debug!("Project name refused: {}", e);
                }
            }
            WizardPhase::Step(WizardStep::AnalysisDescription) => {
                let value = self.inputs.analysis_description.value().to_string();
                if let Err(e) = self.controller.submit_step2(&value) {
                    debug!("Description refused: {}", e);
                }
            }
            WizardPhase::Step(WizardStep::FileAttachment) => self.confirm_files(),
            WizardPhase::Step(WizardStep::Review) => self.start_submission(),
        }
        self.sync_reveal();
    }

    /// Step 3: typed paths become the new selection; an empty input continues
    fn confirm_files(&mut self) {
        if self.inputs.file_paths.value().trim().is_empty() {
            let result = if self.controller.state().selected_files.is_empty() {
                self.controller.advance_skipping_files()
            } else {
                self.controller.advance_with_files()
            };
            if let Err(e) = result {
                debug!("File step continue refused: {}", e);
            }
            return;
        }

        match parse_file_list(self.inputs.file_paths.value()) {
            Ok(files) => {
                let count = files.len();
                if self.controller.select_files(files).is_ok() {
                    self.inputs.file_paths.clear();
                    self.controller
                        .notifications_mut()
                        .push(Notification::info(format!(
                            "{count} file(s) selected. Press Enter to continue"
                        )));
                }
            }
            Err(e) => {
                self.controller
                    .notifications_mut()
                    .push(Notification::error(e.to_string()));
            }
        }
    }

    pub fn skip_files(&mut self) {
        if let Err(e) = self.controller.advance_skipping_files() {
            debug!("Skip refused: {}", e);
        }
        self.sync_reveal();
    }

    pub fn clear_files(&mut self) {
        if self.current_step() == WizardStep::FileAttachment
            && self.controller.select_files(Vec::new()).is_ok()
        {
            self.controller
                .notifications_mut()
                .push(Notification::info("File selection cleared"));
        }
    }

    pub fn go_back(&mut self) {
        if self.controller.go_back() {
            self.sync_reveal();
        }
    }

    /// Queue a submission for dispatch; a no-op while one is in flight
    pub fn start_submission(&mut self) {
        if let Some(pending) = self.controller.begin_submit() {
            self.controller
                .notifications_mut()
                .push(Notification::info("Submitting analysis..."));
            self.pending_submission = Some(pending);
        }
    }

    /// Back to a blank wizard after a successful submission
    pub fn start_over(&mut self) {
        if self.controller.state().submission_status.is_succeeded() && self.controller.reset() {
            self.inputs = StepInputs::default();
            self.reveal.cancel();
            self.sync_reveal();
        }
    }
}

pub struct App {
    pub state: AppState,
    transport: Arc<dyn SubmissionTransport>,
    outcome_tx: UnboundedSender<Result<SubmissionReceipt, SubmissionError>>,
    outcome_rx: UnboundedReceiver<Result<SubmissionReceipt, SubmissionError>>,
}

impl App {
    pub fn new(config: &AppConfig, transport: Arc<dyn SubmissionTransport>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(config),
            transport,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Start the first prompt reveal
    pub fn init(&mut self) {
        info!("Starting wizard with {} transport", self.transport.name());
        self.state.sync_reveal();
    }

    /// Periodic housekeeping: dispatch queued submissions, apply outcomes,
    /// advance the reveal and prune notifications.
    /// Returns true when something visible changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        self.state.tick_count = self.state.tick_count.wrapping_add(1);

        if let Some(pending) = self.state.pending_submission.take() {
            let transport = Arc::clone(&self.transport);
            let tx = self.outcome_tx.clone();
            tokio::spawn(async move {
                let outcome = pending.dispatch(transport.as_ref()).await;
                // Receiver only goes away on shutdown
                let _ = tx.send(outcome);
            });
            changed = true;
        }

        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.state.controller.complete_submit(outcome);
            self.state.sync_reveal();
            changed = true;
        }

        changed |= self.state.reveal.poll();
        self.state.controller.notifications_mut().cleanup_expired();

        changed
    }

    /// Stop background work before exit
    pub fn shutdown(&mut self) {
        self.state.reveal.cancel();
    }
}
