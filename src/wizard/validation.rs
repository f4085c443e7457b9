// ABOUTME: Step validation for the analysis wizard
// Pure checks run before every forward transition

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::state::{format_size, SelectedFile, WizardStep};

pub const MIN_PROJECT_NAME_LEN: usize = 3;
pub const MIN_DESCRIPTION_LEN: usize = 10;
/// 5 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub const PROJECT_NAME_REQUIRED: &str = "Project name is required";
pub const PROJECT_NAME_TOO_SHORT: &str = "Project name must be at least 3 characters";
pub const DESCRIPTION_REQUIRED: &str = "Analysis description is required";
pub const DESCRIPTION_TOO_SHORT: &str = "Please provide more details (at least 10 characters)";
pub const FILE_TOO_LARGE: &str = "File size is too large";

/// Form fields that can carry a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    ProjectName,
    AnalysisDescription,
    Files,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectName => "projectName",
            Self::AnalysisDescription => "analysisDescription",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-level validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(BTreeMap<Field, String>),
}

impl ValidationResult {
    fn from_errors(errors: BTreeMap<Field, String>) -> Self {
        if errors.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Message for a given field, if it failed
    pub fn error_for(&self, field: Field) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(errors) => errors.get(&field).map(String::as_str),
        }
    }

    /// First failure in field order
    pub fn first_error(&self) -> Option<ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(errors) => errors
                .iter()
                .next()
                .map(|(field, message)| ValidationError::new(*field, message.clone())),
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        self.first_error().map_or(Ok(()), Err)
    }
}

/// Per-file size policy for the attachment step.
/// The baseline flow accepts any size; the capped variant rejects the whole
/// selection if any file is larger than the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileSizePolicy {
    #[default]
    Unlimited,
    MaxBytes(u64),
}

impl FileSizePolicy {
    /// The 5 MiB cap
    pub fn capped() -> Self {
        Self::MaxBytes(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn from_config(enforce: bool, max_bytes: u64) -> Self {
        if enforce {
            Self::MaxBytes(max_bytes)
        } else {
            Self::Unlimited
        }
    }

    /// First file that breaks the policy
    pub fn first_violation<'a>(&self, files: &'a [SelectedFile]) -> Option<&'a SelectedFile> {
        match self {
            Self::Unlimited => None,
            Self::MaxBytes(max) => files.iter().find(|f| f.size > *max),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Unlimited => "no size limit".to_string(),
            Self::MaxBytes(max) => format!("max {} per file", format_size(*max)),
        }
    }
}

/// Raw input handed to the validator; absent fields are treated as empty
#[derive(Debug, Clone, Copy, Default)]
pub struct StepFields<'a> {
    pub project_name: Option<&'a str>,
    pub analysis_description: Option<&'a str>,
    pub files: &'a [SelectedFile],
}

impl<'a> StepFields<'a> {
    pub fn project_name(value: &'a str) -> Self {
        Self {
            project_name: Some(value),
            ..Self::default()
        }
    }

    pub fn analysis_description(value: &'a str) -> Self {
        Self {
            analysis_description: Some(value),
            ..Self::default()
        }
    }

    pub fn files(files: &'a [SelectedFile]) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StepValidator {
    file_policy: FileSizePolicy,
}

impl StepValidator {
    pub fn new(file_policy: FileSizePolicy) -> Self {
        Self { file_policy }
    }

    pub fn file_policy(&self) -> FileSizePolicy {
        self.file_policy
    }

    pub fn validate(&self, step: WizardStep, fields: &StepFields<'_>) -> ValidationResult {
        let mut errors = BTreeMap::new();

        match step {
            WizardStep::ProjectName => check_project_name(fields.project_name, &mut errors),
            WizardStep::AnalysisDescription => {
                check_description(fields.analysis_description, &mut errors);
            }
            WizardStep::FileAttachment => self.check_files(fields.files, &mut errors),
            WizardStep::Review => {
                // Everything accumulated so far must still hold
                check_project_name(fields.project_name, &mut errors);
                check_description(fields.analysis_description, &mut errors);
                self.check_files(fields.files, &mut errors);
            }
        }

        ValidationResult::from_errors(errors)
    }

    fn check_files(&self, files: &[SelectedFile], errors: &mut BTreeMap<Field, String>) {
        if self.file_policy.first_violation(files).is_some() {
            errors.insert(Field::Files, FILE_TOO_LARGE.to_string());
        }
    }
}

/// Validate with the baseline policy (no file size cap)
pub fn validate(step: WizardStep, fields: &StepFields<'_>) -> ValidationResult {
    StepValidator::default().validate(step, fields)
}

fn check_project_name(value: Option<&str>, errors: &mut BTreeMap<Field, String>) {
    if let Some(message) = check_min_len(
        value,
        MIN_PROJECT_NAME_LEN,
        PROJECT_NAME_REQUIRED,
        PROJECT_NAME_TOO_SHORT,
    ) {
        errors.insert(Field::ProjectName, message.to_string());
    }
}

fn check_description(value: Option<&str>, errors: &mut BTreeMap<Field, String>) {
    if let Some(message) = check_min_len(
        value,
        MIN_DESCRIPTION_LEN,
        DESCRIPTION_REQUIRED,
        DESCRIPTION_TOO_SHORT,
    ) {
        errors.insert(Field::AnalysisDescription, message.to_string());
    }
}

/// Length is counted in characters after trimming
fn check_min_len(
    value: Option<&str>,
    min: usize,
    required: &'static str,
    too_short: &'static str,
) -> Option<&'static str> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        Some(required)
    } else if trimmed.chars().count() < min {
        Some(too_short)
    } else {
        None
    }
}
