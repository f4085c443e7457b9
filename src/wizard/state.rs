// ABOUTME: State model for the analysis wizard
// Tracks current step, accepted field values, selected files and submission status

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::transport::SubmissionReceipt;

/// Steps in the analysis wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    ProjectName,
    AnalysisDescription,
    FileAttachment,
    Review,
}

impl WizardStep {
    /// Get all steps in order
    pub fn all() -> &'static [WizardStep] {
        &[
            Self::ProjectName,
            Self::AnalysisDescription,
            Self::FileAttachment,
            Self::Review,
        ]
    }

    /// Get the step number (1-indexed)
    pub fn number(self) -> usize {
        match self {
            Self::ProjectName => 1,
            Self::AnalysisDescription => 2,
            Self::FileAttachment => 3,
            Self::Review => 4,
        }
    }

    /// Look up a step by its 1-indexed number
    pub fn from_number(number: usize) -> Option<Self> {
        Self::all().get(number.checked_sub(1)?).copied()
    }

    /// Get the total number of steps
    pub fn total() -> usize {
        4
    }

    /// Get display title for this step
    pub fn title(self) -> &'static str {
        match self {
            Self::ProjectName => "Project",
            Self::AnalysisDescription => "Description",
            Self::FileAttachment => "Files",
            Self::Review => "Review",
        }
    }

    /// Prompt revealed at the top of the step
    pub fn prompt(self) -> &'static str {
        match self {
            Self::ProjectName => "Let's start with a name for your project.",
            Self::AnalysisDescription => "Describe what you would like analyzed.",
            Self::FileAttachment => "Attach supporting files, or skip this step.",
            Self::Review => "Review your request and submit when ready.",
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::ProjectName => Some(Self::AnalysisDescription),
            Self::AnalysisDescription => Some(Self::FileAttachment),
            Self::FileAttachment => Some(Self::Review),
            Self::Review => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::ProjectName => None,
            Self::AnalysisDescription => Some(Self::ProjectName),
            Self::FileAttachment => Some(Self::AnalysisDescription),
            Self::Review => Some(Self::FileAttachment),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// Where a selected file's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A file handle chosen on the attachment step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub source: FileSource,
}

#[derive(Error, Debug)]
pub enum FileSelectionError {
    #[error("Path is empty")]
    EmptyPath,
    #[error("File does not exist: {0}")]
    NotFound(String),
    #[error("Not a regular file: {0}")]
    NotAFile(String),
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SelectedFile {
    /// In-memory file, mostly useful for hosts that already hold the bytes
    pub fn in_memory(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Resolve a user-typed path into a file handle using filesystem metadata
    pub fn from_path_str(path_str: &str) -> Result<Self, FileSelectionError> {
        let trimmed = path_str.trim();
        if trimmed.is_empty() {
            return Err(FileSelectionError::EmptyPath);
        }

        let expanded = expand_tilde(trimmed);
        Self::from_path(&expanded).map_err(|e| match e {
            // Report the path as the user typed it
            FileSelectionError::NotFound(_) => FileSelectionError::NotFound(trimmed.to_string()),
            FileSelectionError::NotAFile(_) => FileSelectionError::NotAFile(trimmed.to_string()),
            other => other,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, FileSelectionError> {
        let display = path.display().to_string();
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileSelectionError::NotFound(display));
            }
            Err(source) => return Err(FileSelectionError::Io { path: display, source }),
        };

        if !metadata.is_file() {
            return Err(FileSelectionError::NotAFile(display));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(display);

        Ok(Self {
            name,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Read the file's content
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Memory(bytes) => Ok(bytes.clone()),
        }
    }

    /// Human readable size, e.g. "1.2 MiB"
    pub fn display_size(&self) -> String {
        format_size(self.size)
    }
}

/// Parse a comma-separated list of paths into file handles.
/// Fails on the first path that cannot be resolved.
pub fn parse_file_list(input: &str) -> Result<Vec<SelectedFile>, FileSelectionError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SelectedFile::from_path_str)
        .collect()
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Status of the submission call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

impl SubmissionStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Named states of the wizard state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Step(WizardStep),
    Succeeded,
}

/// Full wizard session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    /// Current step in the wizard
    pub step: WizardStep,
    /// Accepted project name (set once step 1 validates)
    pub project_name: String,
    /// Accepted analysis description (set once step 2 validates)
    pub analysis_description: String,
    /// Files chosen on step 3; replaced wholesale on each selection
    pub selected_files: Vec<SelectedFile>,
    pub submission_status: SubmissionStatus,
    /// Receipt of the last successful submission
    pub receipt: Option<SubmissionReceipt>,
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            step: WizardStep::ProjectName,
            project_name: String::new(),
            analysis_description: String::new(),
            selected_files: Vec::new(),
            submission_status: SubmissionStatus::Idle,
            receipt: None,
        }
    }

    pub fn phase(&self) -> WizardPhase {
        if self.submission_status.is_succeeded() {
            WizardPhase::Succeeded
        } else {
            WizardPhase::Step(self.step)
        }
    }

    /// Total size of the selected files in bytes
    pub fn total_file_size(&self) -> u64 {
        self.selected_files.iter().map(|f| f.size).sum()
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}
