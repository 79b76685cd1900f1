//! Tests for response loading and envelope checks.

use std::io::Write;

use estat_ingest::{IngestError, check_response, parse_response, read_response};

fn response_json(status: i64, total: u64) -> String {
    format!(
        r#"{{
  "GET_STATS_DATA": {{
    "RESULT": {{"STATUS": {status}, "ERROR_MSG": "正常に終了しました。"}},
    "STATISTICAL_DATA": {{
      "RESULT_INF": {{"TOTAL_NUMBER": {total}}},
      "CLASS_INF": {{"CLASS_OBJ": [
        {{"@id": "cat01", "@name": "男女別", "CLASS": [
          {{"@code": "1", "@name": "男"}},
          {{"@code": "2", "@name": "女"}}
        ]}}
      ]}},
      "DATA_INF": {{"VALUE": [
        {{"@cat01": "1", "@unit": "人", "$": "100"}},
        {{"@cat01": "2", "@unit": "人", "$": "120"}}
      ]}}
    }}
  }}
}}"#
    )
}

#[test]
fn accepts_successful_response_within_limit() {
    let response = parse_response(&response_json(0, 2)).expect("parse");
    let data = check_response(&response, 10_000).expect("check");
    assert_eq!(data.values().len(), 2);
}

#[test]
fn rejects_rows_over_limit() {
    let response = parse_response(&response_json(0, 25_000)).expect("parse");
    let err = check_response(&response, 10_000).unwrap_err();
    assert!(matches!(
        err,
        IngestError::RowLimitExceeded {
            total: 25_000,
            limit: 10_000
        }
    ));
}

#[test]
fn limit_is_inclusive() {
    let response = parse_response(&response_json(0, 10_000)).expect("parse");
    assert!(check_response(&response, 10_000).is_ok());
}

#[test]
fn surfaces_api_error_message() {
    let json = r#"{"GET_STATS_DATA": {"RESULT": {"STATUS": 100, "ERROR_MSG": "正しく処理されませんでした。"}}}"#;
    let response = parse_response(json).expect("parse");
    let err = check_response(&response, 10_000).unwrap_err();
    match err {
        IngestError::ApiStatus { status, message } => {
            assert_eq!(status, 100);
            assert_eq!(message, "正しく処理されませんでした。");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn success_without_statistical_data_is_an_error() {
    let json = r#"{"GET_STATS_DATA": {"RESULT": {"STATUS": 0}}}"#;
    let response = parse_response(json).expect("parse");
    assert!(matches!(
        check_response(&response, 10_000),
        Err(IngestError::MissingStatisticalData)
    ));
}

#[test]
fn rejects_other_payloads() {
    let err = parse_response(r#"{"GET_META_INFO": {}}"#).unwrap_err();
    assert!(matches!(err, IngestError::NotStatsData));
}

#[test]
fn missing_class_name_is_a_parse_error() {
    let json = r#"{"GET_STATS_DATA": {"RESULT": {"STATUS": 0}, "STATISTICAL_DATA": {
        "CLASS_INF": {"CLASS_OBJ": {"@id": "cat01", "CLASS": {"@code": "1", "@name": "男"}}},
        "DATA_INF": {"VALUE": []}}}}"#;
    let err = parse_response(json).unwrap_err();
    assert!(matches!(err, IngestError::Parse(_)));
    assert!(err.to_string().contains("@name"), "{err}");
}

#[test]
fn reads_response_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(response_json(0, 2).as_bytes())
        .expect("write response");
    let response = read_response(file.path()).expect("read");
    assert!(response.result().is_success());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");
    let err = read_response(&path).unwrap_err();
    assert!(matches!(err, IngestError::FileRead { .. }));
    assert!(err.to_string().contains("absent.json"));
}
