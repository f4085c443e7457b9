// ABOUTME: Analysis wizard core: step state machine, validation and prompt reveal
// Four steps: project name, analysis description, optional files, review and submit

pub mod controller;
pub mod reveal;
pub mod state;
pub mod validation;

pub use controller::{PendingSubmission, WizardController, WizardError, WizardOptions};
pub use reveal::{reveal, RevealDriver, RevealTiming};
pub use state::{
    parse_file_list, FileSelectionError, FileSource, SelectedFile, SubmissionStatus, WizardPhase,
    WizardState, WizardStep,
};
pub use validation::{
    validate, Field, FileSizePolicy, StepFields, StepValidator, ValidationError, ValidationResult,
};
