// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the tourist-chatbot endpoints.

use serde::{Deserialize, Serialize};

/// Every data-bearing response wraps its payload in `{"response": ...}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub response: T,
}

/// Body of `get-user-message`.
#[derive(Debug, Serialize)]
pub struct HistoryRequest<'a> {
    pub phone: &'a str,
    pub language: &'a str,
}

/// Body of `send-message` and `user-location`.
#[derive(Debug, Serialize)]
pub struct UserMessageRequest<'a> {
    pub user_phone: &'a str,
    pub message: &'a str,
}

/// Body of `sample-response` and `rephrase-message`.
#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    pub message: &'a str,
}

/// Body of `delete-escalated_chat`.
#[derive(Debug, Serialize)]
pub struct ResolveRequest<'a> {
    pub phone: &'a str,
}

/// Body of `save-token`.
#[derive(Debug, Serialize)]
pub struct SaveTokenRequest<'a> {
    pub token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_token_omits_missing_user() {
        let body = SaveTokenRequest {
            token: "tok",
            user_id: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"token": "tok"})
        );
    }

    #[test]
    fn envelope_requires_response_key() {
        let err = serde_json::from_str::<Envelope<Vec<String>>>(r#"{"data": []}"#);
        assert!(err.is_err());
    }
}
