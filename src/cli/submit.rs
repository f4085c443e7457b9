// ABOUTME: CLI submit command - run the wizard steps headlessly and submit once
//
// Drives the same controller as the TUI, so every validation rule and the
// file size policy apply. Exits non-zero when a step is refused or the
// submission fails.

use super::{OutputFormat, SubmitArgs};
use analysis_wizard::config::AppConfig;
use analysis_wizard::notifications::Notification;
use analysis_wizard::transport::{self, SubmissionTransport};
use analysis_wizard::wizard::{SelectedFile, SubmissionStatus, WizardController};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Outcome of a headless submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReport {
    pub submitted: bool,
    pub project_name: String,
    pub file_count: usize,
    pub total_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitReport {
    fn refused(args: &SubmitArgs, error: impl Into<String>) -> Self {
        Self {
            submitted: false,
            project_name: args.name.trim().to_string(),
            file_count: args.file.len(),
            total_bytes: 0,
            receipt_id: None,
            submitted_at: None,
            error: Some(error.into()),
        }
    }
}

/// Execute the submit command
pub async fn execute(args: SubmitArgs, format: OutputFormat, config: &AppConfig) -> Result<()> {
    let transport = transport::from_config(&config.submission)?;
    info!("Headless submission via {} transport", transport.name());

    let mut controller = WizardController::new(config.wizard.options());
    let report = run_submission(&mut controller, &args, transport.as_ref()).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            for line in notification_lines(&controller.notifications_mut().drain()) {
                eprintln!("{line}");
            }
            output_text(&report);
        }
    }

    match report.error {
        Some(error) => Err(anyhow!(error)),
        None => Ok(()),
    }
}

/// Walk the four steps with the given arguments and submit
pub async fn run_submission(
    controller: &mut WizardController,
    args: &SubmitArgs,
    transport: &dyn SubmissionTransport,
) -> SubmitReport {
    if let Err(e) = fill_steps(controller, args) {
        return SubmitReport::refused(args, e.to_string());
    }

    controller.submit(transport).await;

    let state = controller.state();
    let mut report = SubmitReport {
        submitted: state.submission_status.is_succeeded(),
        project_name: state.project_name.clone(),
        file_count: state.selected_files.len(),
        total_bytes: state.total_file_size(),
        receipt_id: state.receipt.as_ref().map(|r| r.id.clone()),
        submitted_at: state.receipt.as_ref().map(|r| r.submitted_at),
        error: None,
    };

    if let SubmissionStatus::Failed(reason) = &state.submission_status {
        report.error = Some(reason.clone());
    }
    report
}

fn fill_steps(controller: &mut WizardController, args: &SubmitArgs) -> Result<()> {
    controller.submit_step1(&args.name)?;
    controller.submit_step2(&args.description)?;

    let files = args
        .file
        .iter()
        .map(|path| SelectedFile::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;

    if files.is_empty() {
        controller.advance_skipping_files()?;
    } else {
        controller.select_files(files)?;
        controller.advance_with_files()?;
    }
    Ok(())
}

/// Print the report and any notifications as plain text
fn output_text(report: &SubmitReport) {
    if report.submitted {
        println!("✅ Submitted '{}'", report.project_name);
        if let Some(id) = &report.receipt_id {
            println!("   Reference: {id}");
        }
        if let Some(at) = report.submitted_at {
            println!("   Submitted: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        if report.file_count > 0 {
            println!(
                "   Files:     {} ({})",
                report.file_count,
                analysis_wizard::wizard::state::format_size(report.total_bytes)
            );
        }
    } else if let Some(error) = &report.error {
        println!("❌ Not submitted: {error}");
    }
}

/// Notifications raised along the way, oldest first
pub fn notification_lines(notifications: &[Notification]) -> Vec<String> {
    notifications
        .iter()
        .map(|n| format!("[{}] {}", n.notification_type.label(), n.message))
        .collect()
}
