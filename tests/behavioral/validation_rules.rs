// ABOUTME: Behavioral tests for step validation rules and messages

use analysis_wizard::wizard::validation::{
    DESCRIPTION_REQUIRED, DESCRIPTION_TOO_SHORT, FILE_TOO_LARGE, PROJECT_NAME_REQUIRED,
    PROJECT_NAME_TOO_SHORT,
};
use analysis_wizard::wizard::{
    validate, Field, FileSizePolicy, SelectedFile, StepFields, StepValidator, WizardStep,
};
use proptest::prelude::*;

/// Name validity depends only on the trimmed character count
#[test]
fn test_project_name_threshold() {
    let cases = [
        ("", Some(PROJECT_NAME_REQUIRED)),
        ("    ", Some(PROJECT_NAME_REQUIRED)),
        ("A", Some(PROJECT_NAME_TOO_SHORT)),
        ("  AB  ", Some(PROJECT_NAME_TOO_SHORT)),
        ("ABC", None),
        ("  ABC  ", None),
        // Counted in characters, not bytes
        ("éé", Some(PROJECT_NAME_TOO_SHORT)),
        ("ééé", None),
    ];

    for (input, expected) in cases {
        let result = validate(WizardStep::ProjectName, &StepFields::project_name(input));
        assert_eq!(
            result.error_for(Field::ProjectName),
            expected,
            "unexpected result for {input:?}"
        );
        assert_eq!(result.is_valid(), expected.is_none());
    }
}

#[test]
fn test_description_threshold() {
    let cases = [
        ("", Some(DESCRIPTION_REQUIRED)),
        ("\t\n ", Some(DESCRIPTION_REQUIRED)),
        ("123456789", Some(DESCRIPTION_TOO_SHORT)),
        ("   123456789   ", Some(DESCRIPTION_TOO_SHORT)),
        ("1234567890", None),
    ];

    for (input, expected) in cases {
        let result = validate(
            WizardStep::AnalysisDescription,
            &StepFields::analysis_description(input),
        );
        assert_eq!(
            result.error_for(Field::AnalysisDescription),
            expected,
            "unexpected result for {input:?}"
        );
    }
}

/// A step only checks its own fields
#[test]
fn test_steps_ignore_other_fields() {
    let fields = StepFields {
        project_name: Some("ABC"),
        analysis_description: Some("short"),
        files: &[],
    };
    assert!(validate(WizardStep::ProjectName, &fields).is_valid());
    assert!(validate(WizardStep::FileAttachment, &fields).is_valid());
    assert!(!validate(WizardStep::AnalysisDescription, &fields).is_valid());
}

/// Review reports every failing field at once
#[test]
fn test_review_reports_all_fields() {
    let oversized = [SelectedFile::in_memory("big.bin", vec![0; 10])];
    let fields = StepFields {
        project_name: Some("A"),
        analysis_description: None,
        files: &oversized,
    };

    let result = StepValidator::new(FileSizePolicy::MaxBytes(4)).validate(WizardStep::Review, &fields);
    assert_eq!(result.error_for(Field::ProjectName), Some(PROJECT_NAME_TOO_SHORT));
    assert_eq!(result.error_for(Field::AnalysisDescription), Some(DESCRIPTION_REQUIRED));
    assert_eq!(result.error_for(Field::Files), Some(FILE_TOO_LARGE));

    // The first error follows field order
    let first = result.first_error().unwrap();
    assert_eq!(first.field, Field::ProjectName);
}

#[test]
fn test_file_policy_boundaries() {
    let policy = FileSizePolicy::MaxBytes(5);
    let exact = [SelectedFile::in_memory("a", vec![0; 5])];
    let over = [SelectedFile::in_memory("a", vec![0; 5]), SelectedFile::in_memory("b", vec![0; 6])];

    assert!(policy.first_violation(&exact).is_none());
    assert_eq!(policy.first_violation(&over).map(|f| f.name.as_str()), Some("b"));
    assert!(FileSizePolicy::Unlimited.first_violation(&over).is_none());
    assert!(validate(WizardStep::FileAttachment, &StepFields::files(&over)).is_valid());
}

fn expected_message(
    input: &str,
    min: usize,
    required: &'static str,
    too_short: &'static str,
) -> Option<&'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Some(required)
    } else if trimmed.chars().count() < min {
        Some(too_short)
    } else {
        None
    }
}

proptest! {
    /// Any string: valid exactly when the trimmed text has at least 3 characters
    #[test]
    fn prop_project_name_rule_holds_for_any_string(input in any::<String>()) {
        let result = validate(WizardStep::ProjectName, &StepFields::project_name(&input));
        let expected = expected_message(&input, 3, PROJECT_NAME_REQUIRED, PROJECT_NAME_TOO_SHORT);

        prop_assert_eq!(result.is_valid(), input.trim().chars().count() >= 3);
        prop_assert_eq!(result.error_for(Field::ProjectName), expected);
    }

    #[test]
    fn prop_description_rule_holds_for_any_string(input in any::<String>()) {
        let result = validate(
            WizardStep::AnalysisDescription,
            &StepFields::analysis_description(&input),
        );
        let expected = expected_message(&input, 10, DESCRIPTION_REQUIRED, DESCRIPTION_TOO_SHORT);

        prop_assert_eq!(result.is_valid(), input.trim().chars().count() >= 10);
        prop_assert_eq!(result.error_for(Field::AnalysisDescription), expected);
    }

    /// Surrounding whitespace never counts towards the minimum
    #[test]
    fn prop_padding_does_not_change_the_outcome(
        body in "\\S{0,14}",
        left in "[ \t\n\u{3000}]{0,3}",
        right in "[ \t\n\u{3000}]{0,3}",
    ) {
        let padded = format!("{left}{body}{right}");
        let len = body.chars().count();

        let name = validate(WizardStep::ProjectName, &StepFields::project_name(&padded));
        prop_assert_eq!(name.is_valid(), len >= 3);
        prop_assert_eq!(name.error_for(Field::ProjectName) == Some(PROJECT_NAME_REQUIRED), len == 0);

        let description = validate(
            WizardStep::AnalysisDescription,
            &StepFields::analysis_description(&padded),
        );
        prop_assert_eq!(description.is_valid(), len >= 10);
        prop_assert_eq!(
            description.error_for(Field::AnalysisDescription) == Some(DESCRIPTION_REQUIRED),
            len == 0
        );
    }
}
