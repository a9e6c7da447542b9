//! API Response wrapper

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize = ()> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl ApiResponse<()> {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            data: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_data(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct View {
        user: Option<serde_json::Value>,
    }

    #[test]
    fn test_plain_response_shape() {
        let body = serde_json::to_value(ApiResponse::ok("Session updated")).unwrap();
        assert_eq!(body, json!({"success": true, "message": "Session updated"}));
    }

    #[test]
    fn test_data_is_flattened() {
        let body = serde_json::to_value(ApiResponse::with_data("Session loaded", View { user: None })).unwrap();
        assert_eq!(body, json!({"success": true, "message": "Session loaded", "user": null}));
    }
}
