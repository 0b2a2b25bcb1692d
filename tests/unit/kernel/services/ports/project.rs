use super::*;
use crate::models::BoxKind;

#[test]
fn save_request_serializes_wire_shape() {
    let request = SaveRequest {
        name: "demo".to_string(),
        data: vec![HierarchyNode {
            id: 1,
            title: "main.py".to_string(),
            kind: BoxKind::File,
            code: String::new(),
            children: Vec::new(),
        }],
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["name"], "demo");
    assert_eq!(value["data"][0]["type"], "file");
    assert_eq!(value["data"][0]["title"], "main.py");
}

#[test]
fn responses_map_success_flag() {
    let ok: SaveResponse =
        serde_json::from_str(r#"{"success":true,"message":"Project saved as demo.boxcode"}"#)
            .unwrap();
    assert_eq!(ok.into_result().unwrap(), "Project saved as demo.boxcode");

    let rejected: LoadResponse =
        serde_json::from_str(r#"{"success":false,"message":"boom"}"#).unwrap();
    assert_eq!(
        rejected.into_result().unwrap_err(),
        ProjectError::Rejected("boom".to_string())
    );

    let listed: ListResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
    assert!(listed.into_result().unwrap().is_empty());
}

#[test]
fn network_error_display_is_prefixed() {
    let err = ProjectError::Network("connection refused".to_string());
    assert_eq!(err.to_string(), "Network error: connection refused");
    assert_eq!(ProjectError::Rejected("x".to_string()).to_string(), "x");
}
