//! Identifier classification tests

use shelfscan::models::{IdentifierSource, QueryKind, RecognitionResult};
use shelfscan::services::IdentifierClassifier;
use shelfscan::ScanError;
use shelfscan_common::config::IsbnValidation;

fn code(payload: &str) -> RecognitionResult {
    RecognitionResult::DecodedCode(payload.to_string())
}

fn text(text: &str) -> RecognitionResult {
    RecognitionResult::RecognizedText {
        text: text.to_string(),
        language: "eng".to_string(),
    }
}

#[test]
fn test_bookland_barcodes_become_isbn_queries() {
    let classifier = IdentifierClassifier::default();
    for payload in ["9784061519677", "9791032305690"] {
        let query = classifier
            .classify(&code(payload), IdentifierSource::Barcode)
            .unwrap();
        assert_eq!(query.kind(), QueryKind::Isbn);
        assert_eq!(query.value(), payload);
    }
}

#[test]
fn test_other_barcodes_rejected() {
    let classifier = IdentifierClassifier::default();
    for payload in ["4901234567894", "0012345678905", "192", "abc"] {
        let err = classifier
            .classify(&code(payload), IdentifierSource::Barcode)
            .unwrap_err();
        assert!(
            matches!(err, ScanError::ClassificationFailure { origin: IdentifierSource::Barcode, .. }),
            "{} should be rejected",
            payload
        );
    }
}

#[test]
fn test_lenient_digit_threshold() {
    let classifier = IdentifierClassifier::new(IsbnValidation::Lenient);

    // 9 digits
    assert!(classifier
        .classify(&text("ISBN 4-06-151967"), IdentifierSource::IsbnText)
        .is_err());

    // 10 digits
    let query = classifier
        .classify(&text("ISBN 4-06-151967-7"), IdentifierSource::IsbnText)
        .unwrap();
    assert_eq!(query.value(), "4061519677");
}

#[test]
fn test_strict_rejects_short_runs() {
    let classifier = IdentifierClassifier::new(IsbnValidation::Strict);
    assert!(classifier
        .classify(&text("C3055 ¥2400E"), IdentifierSource::IsbnText)
        .is_err());
}

#[test]
fn test_title_text_trimmed() {
    let classifier = IdentifierClassifier::default();

    let query = classifier
        .classify(&text("  吾輩は猫である\n"), IdentifierSource::TitleText)
        .unwrap();
    assert_eq!(query.kind(), QueryKind::Title);
    assert_eq!(query.search_term(), "intitle:吾輩は猫である");

    assert!(classifier
        .classify(&text(" \n "), IdentifierSource::TitleText)
        .is_err());
}

#[test]
fn test_manual_entry() {
    let classifier = IdentifierClassifier::default();
    assert_eq!(classifier.manual_query(""), Err(ScanError::EmptyManualEntry));
    assert_eq!(
        classifier.manual_query(" こころ ").unwrap().search_term(),
        "intitle:こころ"
    );
}
