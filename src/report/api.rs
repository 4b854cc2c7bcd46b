use crate::api::ApiResponse;
use crate::report::model::ParsedReport;
use crate::report::parser::parse_test_cases;
use axum::Json;
use serde::Deserialize;

pub async fn parse_report(Json(payload): Json<ParseReportRequest>) -> ApiResponse<ParsedReport> {
    ApiResponse(ParsedReport::new(parse_test_cases(&payload.content)))
}

#[derive(Deserialize, Clone)]
pub struct ParseReportRequest {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::response::IntoResponse;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn parses_posted_report() {
        let payload = ParseReportRequest {
            content: "TEST CASE ID: TC-001\nTEST CASE NAME: Logout\nTYPE: Functional\nTEST STEPS:\nStep 1: Tap logout\n"
                .to_string(),
        };
        let ApiResponse(report) = parse_report(Json(payload)).await;
        assert_eq!(report.test_case_count, 1);
        assert_eq!(report.test_cases[0].name, "Logout");
    }

    #[tokio::test]
    async fn serializes_type_field_name() {
        let payload = ParseReportRequest {
            content: "### Test Case\nTEST CASE NAME: Rotate screen\nTYPE: UI\n".to_string(),
        };
        let response = parse_report(Json(payload)).await.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["test_case_count"], json!(1));
        assert_eq!(value["test_cases"][0]["id"], json!("TC-001"));
        assert_eq!(value["test_cases"][0]["type"], json!("UI"));
        assert_eq!(value["test_cases"][0]["steps"], json!(""));
    }

    #[tokio::test]
    async fn unstructured_text_yields_no_cases() {
        let payload = ParseReportRequest {
            content: "The model could not help with this request.".to_string(),
        };
        let ApiResponse(report) = parse_report(Json(payload)).await;
        assert_eq!(report, ParsedReport::new(vec![]));
    }
}
