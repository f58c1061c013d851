// Turning tool outcomes into envelope-carrying tool results

use crate::protocol::{CallToolResult, ToolContent};
use locintel_core::{normalize_value, Envelope, GraphQlResponse, IntoResponseNode};
use locintel_sdk::{LocintelError, LocintelResult};

/// Wrap an envelope as a single pretty-printed text block.
pub fn envelope_result(envelope: &Envelope) -> CallToolResult {
    CallToolResult {
        content: vec![ToolContent::text(envelope.to_json_string())],
        is_error: if envelope.is_success() { None } else { Some(true) },
    }
}

pub fn success(data: impl IntoResponseNode) -> CallToolResult {
    envelope_result(&Envelope::ok(normalize_value(data)))
}

pub fn failure(message: impl Into<String>) -> CallToolResult {
    envelope_result(&Envelope::err(message))
}

pub fn from_error(err: &LocintelError) -> CallToolResult {
    let envelope = match err.details() {
        Some(details) => Envelope::err_with_details(err.to_string(), details.clone()),
        None => Envelope::err(err.to_string()),
    };
    envelope_result(&envelope)
}

pub fn respond<T: IntoResponseNode>(result: LocintelResult<T>) -> CallToolResult {
    match result {
        Ok(data) => success(data),
        Err(e) => from_error(&e),
    }
}

/// GraphQL answers with no data and a list of errors are failures; partial data is success.
pub fn respond_graphql(result: LocintelResult<GraphQlResponse>) -> CallToolResult {
    match result {
        Ok(response) if response.is_failure() => {
            let details = normalize_value(response.errors.clone());
            envelope_result(&Envelope::err_with_details(response.error_summary(), details))
        }
        other => respond(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locintel_core::{Envelope, ValidationError};
    use serde_json::json;

    fn envelope_of(result: &CallToolResult) -> Envelope {
        serde_json::from_str(&result.text()).unwrap()
    }

    #[test]
    fn test_success_normalizes_data() {
        let result = success(json!({"lat": 42.36, "lon": -71.06}));
        assert_eq!(result.is_error, None);
        assert_eq!(envelope_of(&result), Envelope::ok(json!({"lat": 42.36, "lon": -71.06})));
    }

    #[test]
    fn test_api_error_keeps_details() {
        let err = LocintelError::from_response(400, r#"{"errors":[{"errorCode":"E1","errorDescription":"Bad"}]}"#);
        let result = from_error(&err);

        assert_eq!(result.is_error, Some(true));
        let envelope = envelope_of(&result);
        assert_eq!(envelope.error.as_deref(), Some("API Error: 400 - Bad (E1)"));
        assert_eq!(envelope.details.unwrap()["errors"][0]["errorCode"], "E1");
    }

    #[test]
    fn test_validation_error_envelope() {
        let err: LocintelError = ValidationError::Empty { field: "address" }.into();
        let envelope = envelope_of(&respond::<serde_json::Value>(Err(err)));
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("address must not be empty"));
        assert!(envelope.details.is_none());
    }

    #[test]
    fn test_graphql_failure_and_partial_success() {
        let failed: GraphQlResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{"message": "Address not found"}, {"message": "Timeout"}]
        }))
        .unwrap();
        let envelope = envelope_of(&respond_graphql(Ok(failed)));
        assert_eq!(envelope.error.as_deref(), Some("Address not found; Timeout"));
        assert_eq!(envelope.details.unwrap()[1]["message"], "Timeout");

        let partial: GraphQlResponse = serde_json::from_value(json!({
            "data": {"getByAddress": null},
            "errors": [{"message": "field unavailable"}]
        }))
        .unwrap();
        let envelope = envelope_of(&respond_graphql(Ok(partial)));
        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap()["errors"][0]["message"], "field unavailable");
    }
}
