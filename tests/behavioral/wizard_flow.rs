// ABOUTME: Behavioral tests for the full wizard flow through the controller
// Covers the happy paths, gating, back navigation and submission exclusivity

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use analysis_wizard::wizard::{
    parse_file_list, FileSizePolicy, SelectedFile, SubmissionStatus, WizardController,
    WizardError, WizardOptions, WizardPhase, WizardStep,
};
use analysis_wizard::wizard::validation::FILE_TOO_LARGE;
use pretty_assertions::assert_eq;

use super::fixtures::{temp_file, CountingTransport, DESCRIPTION, NAME};

fn at_file_step() -> WizardController {
    let mut controller = WizardController::default();
    controller.submit_step1(NAME).unwrap();
    controller.submit_step2(DESCRIPTION).unwrap();
    controller
}

/// Name, description, skip files, submit
#[tokio::test]
async fn test_flow_without_files() {
    let mut controller = WizardController::default();
    assert_eq!(controller.step(), WizardStep::ProjectName);

    controller.submit_step1(NAME).unwrap();
    controller.submit_step2(DESCRIPTION).unwrap();
    controller.advance_skipping_files().unwrap();
    assert_eq!(controller.step(), WizardStep::Review);

    let transport = CountingTransport::accepting();
    assert!(controller.submit(&transport).await);

    assert_eq!(transport.calls(), 1);
    assert_eq!(controller.state().phase(), WizardPhase::Succeeded);
    assert_eq!(
        controller.state().receipt.as_ref().map(|r| r.id.as_str()),
        Some("receipt-1")
    );

    let payload = &transport.payloads()[0];
    assert_eq!(payload.project_name, NAME);
    assert_eq!(payload.analysis_description, DESCRIPTION);
    assert!(payload.files.is_empty());
}

/// Files picked from disk travel with the payload in selection order
#[tokio::test]
async fn test_flow_with_files_from_disk() {
    let first = temp_file(b"id,value\n1,10\n");
    let second = temp_file(b"{\"k\": 1}");
    let input = format!(
        "{} , {}",
        first.path().display(),
        second.path().display()
    );

    let mut controller = at_file_step();
    let files = parse_file_list(&input).unwrap();
    assert_eq!(files.len(), 2);
    controller.select_files(files).unwrap();
    controller.advance_with_files().unwrap();

    let transport = CountingTransport::accepting();
    assert!(controller.submit(&transport).await);

    let payload = &transport.payloads()[0];
    let contents: Vec<&[u8]> = payload.files.iter().map(|f| f.bytes.as_slice()).collect();
    assert_eq!(contents, vec![&b"id,value\n1,10\n"[..], &b"{\"k\": 1}"[..]]);
    assert_eq!(payload.total_bytes(), 22);
}

/// A failed validation never advances and keeps previously accepted data
#[test]
fn test_invalid_input_never_advances() {
    let mut controller = WizardController::default();

    for bad in ["", "  ", "AB", " AB "] {
        assert!(controller.submit_step1(bad).is_err(), "{bad:?} accepted");
        assert_eq!(controller.step(), WizardStep::ProjectName);
    }

    controller.submit_step1(NAME).unwrap();
    for bad in ["", "too short", "   short   "] {
        assert!(controller.submit_step2(bad).is_err(), "{bad:?} accepted");
        assert_eq!(controller.step(), WizardStep::AnalysisDescription);
    }
    assert_eq!(controller.state().project_name, NAME);
}

/// Going back preserves everything entered and allows edits
#[test]
fn test_back_navigation_preserves_and_allows_edit() {
    let mut controller = at_file_step();
    controller
        .select_files(vec![SelectedFile::in_memory("a.txt", b"a".to_vec())])
        .unwrap();
    controller.advance_with_files().unwrap();

    assert!(controller.go_back());
    assert!(controller.go_back());
    assert_eq!(controller.step(), WizardStep::AnalysisDescription);
    assert_eq!(controller.state().selected_files.len(), 1);

    controller.submit_step2("A revised and longer description").unwrap();
    assert_eq!(controller.step(), WizardStep::FileAttachment);
    assert_eq!(
        controller.state().analysis_description,
        "A revised and longer description"
    );
    assert_eq!(controller.state().selected_files.len(), 1);
}

/// Rapid repeated submits dispatch exactly once
#[tokio::test]
async fn test_double_submit_reaches_transport_once() {
    let mut controller = at_file_step();
    controller.advance_skipping_files().unwrap();

    let transport = Arc::new(CountingTransport::slow(Duration::from_millis(20)));

    let pending = controller.begin_submit().unwrap();
    for _ in 0..5 {
        assert!(controller.begin_submit().is_none());
    }
    assert!(controller.state().submission_status.is_in_flight());

    let outcome = pending.dispatch(transport.as_ref()).await;
    controller.complete_submit(outcome);

    assert_eq!(transport.calls(), 1);
    assert_eq!(controller.state().submission_status, SubmissionStatus::Succeeded);
}

/// A rejected submission stays on review and can be retried
#[tokio::test]
async fn test_failure_then_retry_succeeds() {
    let mut controller = at_file_step();
    controller.advance_skipping_files().unwrap();

    let failing = CountingTransport::failing("service unavailable");
    assert!(controller.submit(&failing).await);
    assert_eq!(controller.step(), WizardStep::Review);
    assert!(matches!(
        &controller.state().submission_status,
        SubmissionStatus::Failed(reason) if reason.contains("service unavailable")
    ));

    let accepting = CountingTransport::accepting();
    assert!(controller.submit(&accepting).await);
    assert_eq!(failing.calls(), 1);
    assert_eq!(accepting.calls(), 1);
    assert_eq!(controller.state().phase(), WizardPhase::Succeeded);
}

/// Under the cap an oversized file rejects the whole selection
#[test]
fn test_capped_policy_rejects_oversized_selection() {
    let mut controller = WizardController::new(WizardOptions {
        file_policy: FileSizePolicy::MaxBytes(8),
        ..WizardOptions::default()
    });
    controller.submit_step1(NAME).unwrap();
    controller.submit_step2(DESCRIPTION).unwrap();

    let result = controller.select_files(vec![
        SelectedFile::in_memory("fits.txt", vec![0; 8]),
        SelectedFile::in_memory("big.txt", vec![0; 9]),
    ]);
    assert!(matches!(result, Err(WizardError::Validation(_))));
    assert!(controller.state().selected_files.is_empty());

    controller
        .select_files(vec![SelectedFile::in_memory("fits.txt", vec![0; 8])])
        .unwrap();
    assert_eq!(controller.state().selected_files.len(), 1);
}

/// A file that grows past the cap after selection is refused at submit time
#[tokio::test]
async fn test_capped_policy_rechecks_size_on_submit() {
    let file = temp_file(b"tiny");
    let mut controller = WizardController::new(WizardOptions {
        file_policy: FileSizePolicy::MaxBytes(8),
        ..WizardOptions::default()
    });
    controller.submit_step1(NAME).unwrap();
    controller.submit_step2(DESCRIPTION).unwrap();
    controller
        .select_files(vec![SelectedFile::from_path(file.path()).unwrap()])
        .unwrap();

    let mut grown = OpenOptions::new().append(true).open(file.path()).unwrap();
    grown.write_all(&[b'x'; 100]).unwrap();
    grown.flush().unwrap();

    controller.advance_with_files().unwrap();
    let transport = CountingTransport::accepting();
    assert!(controller.submit(&transport).await);

    assert_eq!(transport.calls(), 0);
    assert!(matches!(
        &controller.state().submission_status,
        SubmissionStatus::Failed(reason) if reason.contains(FILE_TOO_LARGE)
    ));
    assert_eq!(controller.step(), WizardStep::Review);
}

/// Without the cap large files are accepted
#[test]
fn test_default_policy_accepts_large_files() {
    let mut controller = at_file_step();
    let mut huge = SelectedFile::in_memory("huge.bin", Vec::new());
    huge.size = 50 * 1024 * 1024;
    controller.select_files(vec![huge]).unwrap();
    controller.advance_with_files().unwrap();
    assert_eq!(controller.step(), WizardStep::Review);
}

/// Start over after success yields a fresh session
#[tokio::test]
async fn test_reset_after_success() {
    let mut controller = at_file_step();
    controller.advance_skipping_files().unwrap();
    let transport = CountingTransport::accepting();
    controller.submit(&transport).await;

    assert!(controller.reset());
    assert_eq!(controller.step(), WizardStep::ProjectName);
    assert!(controller.state().project_name.is_empty());
    assert_eq!(controller.state().submission_status, SubmissionStatus::Idle);
    assert!(controller.state().receipt.is_none());
}
