// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock tourist-chatbot backend for deterministic testing.
//!
//! `MockBackend` implements `TicketBackend` in memory. It records every call,
//! serves scripted chat histories, can fail chosen endpoints, and can hold
//! history fetches or suggestion requests in flight until released.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use guidedesk_core::{ChatMessage, GuideDeskError, Ticket, TicketBackend};
use tokio::sync::{Mutex, Semaphore};

/// Backend operation, used to select failures and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListTickets,
    SavePushToken,
    FetchMessages,
    SendMessage,
    ResolveTicket,
    SampleResponses,
    RephraseMessage,
    RequestLocation,
}

impl Endpoint {
    fn name(self) -> &'static str {
        match self {
            Endpoint::ListTickets => "mock/get-escalated-chats",
            Endpoint::SavePushToken => "mock/save-token",
            Endpoint::FetchMessages => "mock/get-user-message",
            Endpoint::SendMessage => "mock/send-message",
            Endpoint::ResolveTicket => "mock/delete-escalated_chat",
            Endpoint::SampleResponses => "mock/sample-response",
            Endpoint::RephraseMessage => "mock/rephrase-message",
            Endpoint::RequestLocation => "mock/user-location",
        }
    }
}

/// One recorded backend call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    ListTickets,
    SavePushToken {
        token: String,
        user_id: Option<String>,
    },
    FetchMessages {
        phone: String,
        language: String,
    },
    SendMessage {
        phone: String,
        message: String,
    },
    ResolveTicket {
        phone: String,
    },
    SampleResponses {
        message: String,
    },
    RephraseMessage {
        message: String,
    },
    RequestLocation {
        phone: String,
        reason: String,
    },
}

impl BackendCall {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            BackendCall::ListTickets => Endpoint::ListTickets,
            BackendCall::SavePushToken { .. } => Endpoint::SavePushToken,
            BackendCall::FetchMessages { .. } => Endpoint::FetchMessages,
            BackendCall::SendMessage { .. } => Endpoint::SendMessage,
            BackendCall::ResolveTicket { .. } => Endpoint::ResolveTicket,
            BackendCall::SampleResponses { .. } => Endpoint::SampleResponses,
            BackendCall::RephraseMessage { .. } => Endpoint::RephraseMessage,
            BackendCall::RequestLocation { .. } => Endpoint::RequestLocation,
        }
    }
}

/// In-memory [`TicketBackend`].
///
/// Chat histories are served from a FIFO queue; the last one keeps being
/// served once the queue is down to a single entry. With nothing queued an
/// empty history is returned.
pub struct MockBackend {
    calls: Arc<Mutex<Vec<BackendCall>>>,
    histories: Arc<Mutex<VecDeque<Vec<ChatMessage>>>>,
    tickets: Arc<Mutex<Vec<Ticket>>>,
    suggestions: Arc<Mutex<Vec<String>>>,
    rephrased: Arc<Mutex<Option<String>>>,
    failing: Arc<Mutex<HashSet<Endpoint>>>,
    fetch_gate: Arc<Mutex<Option<Arc<Semaphore>>>>,
    held_gates: Arc<Mutex<Vec<Arc<Semaphore>>>>,
    suggestion_gate: Arc<Mutex<Option<Arc<Semaphore>>>>,
    held_suggestion_gates: Arc<Mutex<Vec<Arc<Semaphore>>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            histories: Arc::new(Mutex::new(VecDeque::new())),
            tickets: Arc::new(Mutex::new(Vec::new())),
            suggestions: Arc::new(Mutex::new(Vec::new())),
            rephrased: Arc::new(Mutex::new(None)),
            failing: Arc::new(Mutex::new(HashSet::new())),
            fetch_gate: Arc::new(Mutex::new(None)),
            held_gates: Arc::new(Mutex::new(Vec::new())),
            suggestion_gate: Arc::new(Mutex::new(None)),
            held_suggestion_gates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a chat history for the next fetch.
    pub async fn push_history(&self, messages: Vec<ChatMessage>) {
        self.histories.lock().await.push_back(messages);
    }

    pub async fn set_tickets(&self, tickets: Vec<Ticket>) {
        *self.tickets.lock().await = tickets;
    }

    pub async fn set_suggestions(&self, suggestions: Vec<String>) {
        *self.suggestions.lock().await = suggestions;
    }

    /// Fixed rephrase result. Without one, rephrase echoes its input.
    pub async fn set_rephrased(&self, text: &str) {
        *self.rephrased.lock().await = Some(text.to_string());
    }

    /// Make `endpoint` fail with a network error until [`recover`](Self::recover).
    pub async fn fail(&self, endpoint: Endpoint) {
        self.failing.lock().await.insert(endpoint);
    }

    pub async fn recover(&self, endpoint: Endpoint) {
        self.failing.lock().await.remove(&endpoint);
    }

    /// Hold every history fetch issued from now on, after it is recorded.
    pub async fn hold_fetches(&self) {
        let gate = Arc::new(Semaphore::new(0));
        self.held_gates.lock().await.push(Arc::clone(&gate));
        *self.fetch_gate.lock().await = Some(gate);
    }

    /// Let new fetches through while already-held ones stay held.
    pub async fn stop_holding(&self) {
        self.fetch_gate.lock().await.take();
    }

    /// Let held and future fetches complete.
    pub async fn release_fetches(&self) {
        self.fetch_gate.lock().await.take();
        for gate in self.held_gates.lock().await.drain(..) {
            gate.close();
        }
    }

    /// Hold suggestion requests issued from now on, after they are recorded.
    pub async fn hold_suggestions(&self) {
        let gate = Arc::new(Semaphore::new(0));
        self.held_suggestion_gates
            .lock()
            .await
            .push(Arc::clone(&gate));
        *self.suggestion_gate.lock().await = Some(gate);
    }

    pub async fn stop_holding_suggestions(&self) {
        self.suggestion_gate.lock().await.take();
    }

    pub async fn release_suggestions(&self) {
        self.suggestion_gate.lock().await.take();
        for gate in self.held_suggestion_gates.lock().await.drain(..) {
            gate.close();
        }
    }

    pub async fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().await.clone()
    }

    pub async fn calls_to(&self, endpoint: Endpoint) -> Vec<BackendCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| call.endpoint() == endpoint)
            .cloned()
            .collect()
    }

    pub async fn count(&self, endpoint: Endpoint) -> usize {
        self.calls_to(endpoint).await.len()
    }

    /// Yields until at least `n` calls to `endpoint` were recorded.
    pub async fn wait_for(&self, endpoint: Endpoint, n: usize) {
        while self.count(endpoint).await < n {
            tokio::task::yield_now().await;
        }
    }

    async fn record(&self, call: BackendCall) -> Result<(), GuideDeskError> {
        let endpoint = call.endpoint();
        self.calls.lock().await.push(call);
        if self.failing.lock().await.contains(&endpoint) {
            return Err(GuideDeskError::Network {
                endpoint: endpoint.name().to_string(),
                source: Box::new(std::io::Error::other("mock backend unreachable")),
            });
        }
        Ok(())
    }

    /// Serves the next queued history.
    async fn next_history(&self) -> Vec<ChatMessage> {
        let mut histories = self.histories.lock().await;
        if histories.len() > 1 {
            histories.pop_front().unwrap_or_default()
        } else {
            histories.front().cloned().unwrap_or_default()
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketBackend for MockBackend {
    async fn list_escalated_tickets(&self) -> Result<Vec<Ticket>, GuideDeskError> {
        self.record(BackendCall::ListTickets).await?;
        Ok(self.tickets.lock().await.clone())
    }

    async fn save_push_token(
        &self,
        token: &str,
        user_id: Option<&str>,
    ) -> Result<(), GuideDeskError> {
        self.record(BackendCall::SavePushToken {
            token: token.to_string(),
            user_id: user_id.map(str::to_string),
        })
        .await
    }

    async fn fetch_messages(
        &self,
        phone: &str,
        language: &str,
    ) -> Result<Vec<ChatMessage>, GuideDeskError> {
        let gate = self.fetch_gate.lock().await.clone();
        let recorded = self
            .record(BackendCall::FetchMessages {
                phone: phone.to_string(),
                language: language.to_string(),
            })
            .await;
        if let Some(gate) = gate {
            // Closed on release; acquire then fails immediately.
            let _ = gate.acquire().await;
        }
        recorded?;
        Ok(self.next_history().await)
    }

    async fn send_message(&self, phone: &str, message: &str) -> Result<(), GuideDeskError> {
        self.record(BackendCall::SendMessage {
            phone: phone.to_string(),
            message: message.to_string(),
        })
        .await
    }

    async fn resolve_ticket(&self, phone: &str) -> Result<(), GuideDeskError> {
        self.record(BackendCall::ResolveTicket {
            phone: phone.to_string(),
        })
        .await?;
        self.tickets.lock().await.retain(|t| t.phone != phone);
        Ok(())
    }

    async fn sample_responses(&self, message: &str) -> Result<Vec<String>, GuideDeskError> {
        let gate = self.suggestion_gate.lock().await.clone();
        let recorded = self
            .record(BackendCall::SampleResponses {
                message: message.to_string(),
            })
            .await;
        if let Some(gate) = gate {
            let _ = gate.acquire().await;
        }
        recorded?;
        Ok(self.suggestions.lock().await.clone())
    }

    async fn rephrase_message(&self, message: &str) -> Result<String, GuideDeskError> {
        self.record(BackendCall::RephraseMessage {
            message: message.to_string(),
        })
        .await?;
        Ok(self
            .rephrased
            .lock()
            .await
            .clone()
            .unwrap_or_else(|| message.to_string()))
    }

    async fn request_location(&self, phone: &str, reason: &str) -> Result<(), GuideDeskError> {
        self.record(BackendCall::RequestLocation {
            phone: phone.to_string(),
            reason: reason.to_string(),
        })
        .await
    }
}
