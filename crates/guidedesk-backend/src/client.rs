// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the tourist-chatbot backend.
//!
//! [`HttpBackend`] implements [`TicketBackend`] over JSON request/response
//! calls. It does not retry: the ticket poller re-fetching on its interval is
//! the only retry-like behavior in the system.

use std::time::Duration;

use async_trait::async_trait;
use guidedesk_config::model::BackendConfig;
use guidedesk_core::{ChatMessage, GuideDeskError, Ticket, TicketBackend};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::endpoints;
use crate::types::{
    Envelope, HistoryRequest, ResolveRequest, SaveTokenRequest, TextRequest, UserMessageRequest,
};

/// reqwest-backed [`TicketBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a client for `config.base_url`.
    ///
    /// No request timeout is set unless `config.request_timeout_secs` is.
    pub fn new(config: &BackendConfig) -> Result<Self, GuideDeskError> {
        let base_url = config.base_url.trim();
        if base_url.is_empty() {
            return Err(GuideDeskError::Config(
                "backend.base_url is required".into(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("guidedesk/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            GuideDeskError::Config(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    /// Base URL with exactly one trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn execute(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<String, GuideDeskError> {
        let response = request.send().await.map_err(|e| GuideDeskError::Network {
            endpoint: endpoint.to_string(),
            source: Box::new(e),
        })?;

        let status = response.status();
        debug!(endpoint, status = %status, "backend response received");

        let body = response.text().await.map_err(|e| GuideDeskError::Network {
            endpoint: endpoint.to_string(),
            source: Box::new(e),
        })?;

        if !status.is_success() {
            return Err(GuideDeskError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// POSTs `body` and unwraps the `{"response": ...}` envelope.
    async fn post_for<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, GuideDeskError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let raw = self
            .execute(endpoint, self.client.post(self.url(endpoint)).json(body))
            .await?;
        unwrap_envelope(endpoint, &raw)
    }

    /// POSTs `body` and ignores the acknowledgement payload.
    async fn post_ack<B>(&self, endpoint: &'static str, body: &B) -> Result<(), GuideDeskError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(endpoint, self.client.post(self.url(endpoint)).json(body))
            .await
            .map(|_| ())
    }
}

fn normalize_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

fn unwrap_envelope<T: DeserializeOwned>(endpoint: &str, raw: &str) -> Result<T, GuideDeskError> {
    serde_json::from_str::<Envelope<T>>(raw)
        .map(|envelope| envelope.response)
        .map_err(|e| GuideDeskError::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
}

#[async_trait]
impl TicketBackend for HttpBackend {
    async fn list_escalated_tickets(&self) -> Result<Vec<Ticket>, GuideDeskError> {
        let endpoint = endpoints::ESCALATED_CHATS;
        let raw = self
            .execute(endpoint, self.client.get(self.url(endpoint)))
            .await?;
        unwrap_envelope(endpoint, &raw)
    }

    async fn save_push_token(
        &self,
        token: &str,
        user_id: Option<&str>,
    ) -> Result<(), GuideDeskError> {
        self.post_ack(endpoints::SAVE_TOKEN, &SaveTokenRequest { token, user_id })
            .await
    }

    async fn fetch_messages(
        &self,
        phone: &str,
        language: &str,
    ) -> Result<Vec<ChatMessage>, GuideDeskError> {
        self.post_for(
            endpoints::USER_MESSAGES,
            &HistoryRequest { phone, language },
        )
        .await
    }

    async fn send_message(&self, phone: &str, message: &str) -> Result<(), GuideDeskError> {
        self.post_ack(
            endpoints::SEND_MESSAGE,
            &UserMessageRequest {
                user_phone: phone,
                message,
            },
        )
        .await
    }

    async fn resolve_ticket(&self, phone: &str) -> Result<(), GuideDeskError> {
        let endpoint = endpoints::RESOLVE_TICKET;
        self.execute(
            endpoint,
            self.client
                .delete(self.url(endpoint))
                .json(&ResolveRequest { phone }),
        )
        .await
        .map(|_| ())
    }

    async fn sample_responses(&self, message: &str) -> Result<Vec<String>, GuideDeskError> {
        // The backend sends `null` when it has nothing to suggest.
        let suggestions: Option<Vec<String>> = self
            .post_for(endpoints::SAMPLE_RESPONSE, &TextRequest { message })
            .await?;
        Ok(suggestions.unwrap_or_default())
    }

    async fn rephrase_message(&self, message: &str) -> Result<String, GuideDeskError> {
        self.post_for(endpoints::REPHRASE_MESSAGE, &TextRequest { message })
            .await
    }

    async fn request_location(&self, phone: &str, reason: &str) -> Result<(), GuideDeskError> {
        self.post_ack(
            endpoints::USER_LOCATION,
            &UserMessageRequest {
                user_phone: phone,
                message: reason,
            },
        )
        .await
    }
}
