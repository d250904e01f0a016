//! Normalization of raw responses into typed results.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::RawResponse;

/// Turn a raw response into a typed value or a typed error.
///
/// - 204 and empty 2xx bodies become `Ok(None)`
/// - other 2xx bodies are parsed into `T`; a parse failure is an
///   [`ApiError::Decode`] carrying the real status
/// - non-2xx responses become [`ApiError::Http`] with the server's own
///   `error` message when the body provides one
pub fn normalize<T: DeserializeOwned>(response: &RawResponse) -> Result<Option<T>, ApiError> {
    if !response.is_success() {
        return Err(error_from_response(response));
    }
    if response.status == 204 || response.body.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(&response.body) {
        Ok(value) => Ok(Some(value)),
        Err(e) => Err(ApiError::Decode {
            status: response.status,
            message: e.to_string(),
        }),
    }
}

/// Build the error for a non-2xx response.
///
/// The server reports failures as `{"error": "..."}`. When the body does
/// not match that shape (proxies, panics) the status alone carries the
/// message and the raw body is kept as details.
fn error_from_response(response: &RawResponse) -> ApiError {
    let details: Option<Value> = serde_json::from_str(&response.body).ok();
    let message = details
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("request failed with status {}", response.status));

    ApiError::Http {
        status: response.status,
        message,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        id: i64,
        title: String,
    }

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_parses_2xx_body() {
        let raw = response(200, &json!({"id": 3, "title": "write docs"}).to_string());
        let item: Option<Item> = normalize(&raw).unwrap();
        assert_eq!(
            item,
            Some(Item {
                id: 3,
                title: "write docs".to_string()
            })
        );
    }

    #[test]
    fn test_204_is_none() {
        let raw = response(204, "");
        let item: Option<Item> = normalize(&raw).unwrap();
        assert_eq!(item, None);
    }

    #[test]
    fn test_empty_200_body_is_none() {
        let raw = response(200, "  ");
        let item: Option<Item> = normalize(&raw).unwrap();
        assert_eq!(item, None);
    }

    #[test]
    fn test_unparseable_2xx_is_decode_error() {
        let raw = response(200, "<html>gateway</html>");
        let result: Result<Option<Item>, _> = normalize(&raw);
        assert!(matches!(result, Err(ApiError::Decode { status: 200, .. })));
    }

    #[test]
    fn test_error_body_message_is_extracted() {
        let raw = response(404, &json!({"error": "task not found"}).to_string());
        let result: Result<Option<Item>, _> = normalize(&raw);
        match result {
            Err(ApiError::Http {
                status,
                message,
                details,
            }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "task not found");
                assert_eq!(details, Some(json!({"error": "task not found"})));
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_error_body_falls_back_to_status() {
        let raw = response(502, "Bad Gateway");
        let result: Result<Option<Item>, _> = normalize(&raw);
        match result {
            Err(ApiError::Http {
                status,
                message,
                details,
            }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "request failed with status 502");
                assert_eq!(details, None);
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn test_json_error_body_without_error_field() {
        let raw = response(500, &json!({"message": "boom"}).to_string());
        let result: Result<Option<Item>, _> = normalize(&raw);
        match result {
            Err(ApiError::Http {
                message, details, ..
            }) => {
                assert_eq!(message, "request failed with status 500");
                assert_eq!(details, Some(json!({"message": "boom"})));
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }
}
