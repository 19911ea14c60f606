use faq_chatbot::dataset::convert_to_jsonl;
use faq_chatbot::AppError;
use std::fs;

#[test]
fn converts_records_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("faq.json");
    let output = dir.path().join("faq.jsonl");
    fs::write(&input, r#"{"questions": [{"a":1},{"b":2}]}"#).unwrap();

    let report = convert_to_jsonl(&input, &output).unwrap();
    assert_eq!(report.records, 2);
    assert!(!report.empty);
    assert_eq!(fs::read_to_string(&output).unwrap(), "{\"a\": 1}\n{\"b\": 2}\n");
}

#[test]
fn unicode_is_written_as_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("faq.json");
    let output = dir.path().join("faq.jsonl");
    fs::write(&input, r#"{"questions": [{"prompt": "¿Horario?", "completion": "9–5"}]}"#).unwrap();

    convert_to_jsonl(&input, &output).unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "{\"prompt\": \"¿Horario?\", \"completion\": \"9–5\"}\n"
    );
}

#[test]
fn empty_list_yields_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("faq.json");
    let output = dir.path().join("faq.jsonl");
    fs::write(&input, r#"{"questions": []}"#).unwrap();

    let report = convert_to_jsonl(&input, &output).unwrap();
    assert_eq!(report.records, 0);
    assert!(report.empty);
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn missing_key_is_a_warning_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("faq.json");
    let output = dir.path().join("faq.jsonl");
    fs::write(&input, r#"{"answers": [1]}"#).unwrap();

    assert!(convert_to_jsonl(&input, &output).unwrap().empty);
    assert!(output.exists());
}

#[test]
fn missing_input_is_not_found_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("faq.jsonl");

    let err = convert_to_jsonl(dir.path().join("nope.json"), &output).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn malformed_json_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("faq.json");
    let output = dir.path().join("faq.jsonl");
    fs::write(&input, r#"{"questions": [{"a":1},"#).unwrap();
    fs::write(&output, "{\"old\": true}\n").unwrap();

    let err = convert_to_jsonl(&input, &output).unwrap_err();
    assert!(matches!(err, AppError::Parse(_)));
    assert!(err.to_string().starts_with("Failed to parse JSON. Details:"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "{\"old\": true}\n");
}

#[test]
fn rerun_replaces_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("faq.json");
    let output = dir.path().join("faq.jsonl");
    fs::write(&output, "stale\nstale\nstale\n").unwrap();
    fs::write(&input, r#"{"questions": [{"q": "x"}]}"#).unwrap();

    convert_to_jsonl(&input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "{\"q\": \"x\"}\n");
}

#[test]
fn numbers_are_copied_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("faq.json");
    let output = dir.path().join("faq.jsonl");
    fs::write(
        &input,
        r#"{"questions": [{"id": 123456789012345678901234567890, "p": 0.1, "n": -7, "e": 1.5e300}]}"#,
    )
    .unwrap();

    convert_to_jsonl(&input, &output).unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "{\"id\": 123456789012345678901234567890, \"p\": 0.1, \"n\": -7, \"e\": 1.5e300}\n"
    );
}
