// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ticket sync client: one mounted ticket's chat, draft, and actions.
//!
//! A [`TicketSyncClient`] is mounted for a single ticket (keyed by the
//! tourist's phone) on behalf of the logged-in guide. It keeps a local
//! [`TicketView`] in step with the backend and submits guide actions. Backend
//! failures are logged and swallowed here; callers get an outcome enum
//! instead of an error.
//!
//! Every history fetch is tagged with a sequence number when it is issued.
//! A response is applied only if its tag is newer than the one already shown,
//! so a slow poll cannot overwrite the list fetched right after a send.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use guidedesk_config::model::{RephraseFailurePolicy, SyncConfig};
use guidedesk_core::{
    AuthenticatedUser, ChatMessage, Coordinates, GuideDeskError, MessageKind, TicketBackend,
};
use guidedesk_session::SessionStore;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::poller::{self, PollHandle};
use crate::reconcile::{FullReplace, Reconciler};

const DEFAULT_LANGUAGE: &str = "english";

/// Local state of a mounted ticket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketView {
    /// Reconciled chat history, in backend order.
    pub messages: Vec<ChatMessage>,
    pub draft: String,
    /// Candidate replies for the latest tourist message.
    pub suggestions: Vec<String>,
    /// Sequence tag of the fetch currently displayed; 0 before the first one.
    pub applied_seq: u64,
    suggested_for: Option<ReplyTarget>,
}

/// The tourist message a set of suggestions answers.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReplyTarget {
    text: String,
    timestamp: String,
}

impl TicketView {
    /// Coordinates of the most recent location share in the thread.
    pub fn latest_location(&self) -> Option<Coordinates> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.kind == MessageKind::Location)
            .and_then(ChatMessage::coordinates)
    }

    /// Text of the last message when it came from the tourist.
    pub fn last_user_text(&self) -> Option<&str> {
        let last = self.messages.last()?;
        if last.is_from_user() {
            last.text.as_deref()
        } else {
            None
        }
    }

    fn reply_target(&self) -> Option<ReplyTarget> {
        let last = self.messages.last()?;
        if !last.is_from_user() {
            return None;
        }
        Some(ReplyTarget {
            text: last.text.clone()?,
            timestamp: last.timestamp.clone(),
        })
    }
}

/// Result of [`TicketSyncClient::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Delivered; carries the text actually sent (after any rephrasing).
    Sent { message: String },
    /// Nothing to send: the text was empty after trimming.
    Skipped,
    /// A backend call failed. Already logged; the draft is kept.
    Failed,
}

/// Where the caller should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    TicketList,
}

/// Result of [`TicketSyncClient::resolve_ticket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The ticket is closed and the client unmounted.
    Resolved(Navigation),
    /// The backend did not confirm. Already logged; the ticket stays mounted.
    Failed,
}

/// Result of [`TicketSyncClient::request_location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationRequestOutcome {
    Requested,
    /// Empty reason; nothing was sent.
    Skipped,
    Failed,
}

/// Configures and mounts a [`TicketSyncClient`].
pub struct TicketSyncBuilder {
    backend: Arc<dyn TicketBackend>,
    phone: String,
    language: String,
    config: SyncConfig,
    reconciler: Arc<dyn Reconciler>,
    parent: Option<CancellationToken>,
}

impl TicketSyncBuilder {
    /// Language sent with every history fetch. Defaults to `english`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default [`FullReplace`] reconciliation.
    pub fn reconciler(mut self, reconciler: Arc<dyn Reconciler>) -> Self {
        self.reconciler = reconciler;
        self
    }

    /// Unmounts the client (and stops its pollers) when `parent` is cancelled.
    pub fn cancel_with(mut self, parent: &CancellationToken) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Mounts the ticket for the guide logged in on `session`.
    ///
    /// Fails with [`GuideDeskError::NotAuthenticated`] when nobody is.
    pub fn mount(self, session: &SessionStore) -> Result<TicketSyncClient, GuideDeskError> {
        let user = session
            .current_user()
            .ok_or(GuideDeskError::NotAuthenticated)?;
        let lifecycle = match &self.parent {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        let (view, _) = watch::channel(TicketView::default());

        info!(phone = %self.phone, user_id = %user.id, "ticket mounted");
        Ok(TicketSyncClient {
            inner: Arc::new(Inner {
                backend: self.backend,
                phone: self.phone,
                language: self.language,
                user,
                config: self.config,
                reconciler: self.reconciler,
                view,
                next_seq: AtomicU64::new(0),
                lifecycle,
            }),
        })
    }
}

struct Inner {
    backend: Arc<dyn TicketBackend>,
    phone: String,
    language: String,
    user: AuthenticatedUser,
    config: SyncConfig,
    reconciler: Arc<dyn Reconciler>,
    view: watch::Sender<TicketView>,
    next_seq: AtomicU64,
    lifecycle: CancellationToken,
}

/// Keeps one ticket's chat in sync with the backend.
///
/// Cheap to clone; clones share the same view and lifecycle.
#[derive(Clone)]
pub struct TicketSyncClient {
    inner: Arc<Inner>,
}

impl TicketSyncClient {
    pub fn builder(backend: Arc<dyn TicketBackend>, phone: impl Into<String>) -> TicketSyncBuilder {
        TicketSyncBuilder {
            backend,
            phone: phone.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            config: SyncConfig::default(),
            reconciler: Arc::new(FullReplace),
            parent: None,
        }
    }

    pub fn phone(&self) -> &str {
        &self.inner.phone
    }

    /// The guide this ticket was mounted for.
    pub fn user(&self) -> &AuthenticatedUser {
        &self.inner.user
    }

    pub fn view(&self) -> TicketView {
        self.inner.view.borrow().clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.view.borrow().messages.clone()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.inner.view.borrow().suggestions.clone()
    }

    pub fn latest_location(&self) -> Option<Coordinates> {
        self.inner.view.borrow().latest_location()
    }

    /// Receiver notified on every view change.
    pub fn subscribe(&self) -> watch::Receiver<TicketView> {
        self.inner.view.subscribe()
    }

    /// Stops every poller started from this client.
    pub fn unmount(&self) {
        if !self.inner.lifecycle.is_cancelled() {
            info!(phone = %self.inner.phone, "ticket unmounted");
        }
        self.inner.lifecycle.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.inner.lifecycle.is_cancelled()
    }

    /// Fetches the chat history and applies it to the view.
    ///
    /// A failed fetch is logged and the previous list stays in place.
    /// Returns the list shown after the attempt.
    pub async fn fetch_messages(&self) -> Vec<ChatMessage> {
        if let Some((seq, incoming)) = self.fetch_tagged().await {
            self.apply(seq, incoming).await;
        }
        self.messages()
    }

    /// Issues one tagged fetch without touching the view.
    pub(crate) async fn fetch_tagged(&self) -> Option<(u64, Vec<ChatMessage>)> {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        match self
            .inner
            .backend
            .fetch_messages(&self.inner.phone, &self.inner.language)
            .await
        {
            Ok(messages) => {
                debug!(phone = %self.inner.phone, seq, count = messages.len(), "chat history fetched");
                Some((seq, messages))
            }
            Err(e) => {
                warn!(phone = %self.inner.phone, seq, error = %e, "failed to fetch chat history");
                None
            }
        }
    }

    /// Applies a tagged fetch if it is newer than the one displayed.
    ///
    /// Fetches suggestions when the newest message is a tourist message that
    /// has not been answered with suggestions yet.
    pub(crate) async fn apply(&self, seq: u64, incoming: Vec<ChatMessage>) -> bool {
        let reconciler = Arc::clone(&self.inner.reconciler);
        let applied = self.inner.view.send_if_modified(|view| {
            if seq <= view.applied_seq {
                return false;
            }
            view.messages = reconciler.reconcile(&view.messages, incoming);
            view.applied_seq = seq;
            if view.last_user_text().is_none() {
                view.suggestions.clear();
                view.suggested_for = None;
            }
            true
        });

        if !applied {
            debug!(phone = %self.inner.phone, seq, "discarding stale chat history");
            return false;
        }

        let pending = {
            let view = self.inner.view.borrow();
            view.reply_target()
                .filter(|target| view.suggested_for.as_ref() != Some(target))
        };
        if let Some(target) = pending {
            self.fetch_suggestions(&target.text).await;
        }
        true
    }

    /// Asks the backend for candidate replies to `last_user_message`.
    ///
    /// The suggestions are stored in the view only if `last_user_message` is
    /// still the last message when they arrive; a reply or a newer tourist
    /// message landing in the meantime makes them stale. On failure an empty
    /// list is returned and the view is left alone.
    pub async fn fetch_suggestions(&self, last_user_message: &str) -> Vec<String> {
        match self.inner.backend.sample_responses(last_user_message).await {
            Ok(suggestions) => {
                debug!(phone = %self.inner.phone, count = suggestions.len(), "suggestions fetched");
                let stored = suggestions.clone();
                let kept = self.inner.view.send_if_modified(|view| {
                    match view.reply_target() {
                        Some(target) if target.text == last_user_message => {
                            view.suggestions = stored;
                            view.suggested_for = Some(target);
                            true
                        }
                        _ => false,
                    }
                });
                if !kept {
                    debug!(phone = %self.inner.phone, "discarding suggestions for a superseded message");
                }
                suggestions
            }
            Err(e) => {
                warn!(phone = %self.inner.phone, error = %e, "failed to fetch suggestions");
                Vec::new()
            }
        }
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.view.send_modify(|view| view.draft = text);
    }

    pub fn draft(&self) -> String {
        self.inner.view.borrow().draft.clone()
    }

    /// Copies suggestion `index` into the draft. Returns false if out of range.
    pub fn use_suggestion(&self, index: usize) -> bool {
        self.inner.view.send_if_modified(|view| match view.suggestions.get(index) {
            Some(suggestion) => {
                view.draft = suggestion.clone();
                true
            }
            None => false,
        })
    }

    /// Sends the current draft.
    pub async fn send_draft(&self) -> SendOutcome {
        let draft = self.draft();
        self.send_message(&draft).await
    }

    /// Sends a guide reply to the tourist.
    ///
    /// Whitespace-only text is skipped without any backend call. When
    /// rephrasing is enabled the text goes through the rephrase endpoint
    /// first; if that fails the configured [`RephraseFailurePolicy`] decides
    /// between sending the text as typed and giving up. After a successful
    /// send the draft is cleared and the history is fetched immediately.
    pub async fn send_message(&self, raw_text: &str) -> SendOutcome {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!(phone = %self.inner.phone, "skipping empty reply");
            return SendOutcome::Skipped;
        }

        let message = if self.inner.config.rephrase_outgoing {
            match self.rephrase(text).await {
                Some(message) => message,
                None => return SendOutcome::Failed,
            }
        } else {
            text.to_string()
        };

        if let Err(e) = self
            .inner
            .backend
            .send_message(&self.inner.phone, &message)
            .await
        {
            warn!(phone = %self.inner.phone, error = %e, "failed to send reply");
            return SendOutcome::Failed;
        }

        info!(phone = %self.inner.phone, user_id = %self.inner.user.id, "reply sent");
        self.inner.view.send_modify(|view| view.draft.clear());
        self.fetch_messages().await;
        SendOutcome::Sent { message }
    }

    /// Returns the text to send, or `None` when the send must be abandoned.
    async fn rephrase(&self, text: &str) -> Option<String> {
        match self.inner.backend.rephrase_message(text).await {
            Ok(rephrased) if !rephrased.trim().is_empty() => Some(rephrased),
            Ok(_) => {
                debug!(phone = %self.inner.phone, "rephrase returned nothing, sending as typed");
                Some(text.to_string())
            }
            Err(e) => match self.inner.config.rephrase_failure {
                RephraseFailurePolicy::SendOriginal => {
                    warn!(phone = %self.inner.phone, error = %e, "rephrase failed, sending as typed");
                    Some(text.to_string())
                }
                RephraseFailurePolicy::Abort => {
                    warn!(phone = %self.inner.phone, error = %e, "rephrase failed, reply not sent");
                    None
                }
            },
        }
    }

    /// Closes the ticket on the backend.
    ///
    /// On success the client is unmounted and the caller is told to return to
    /// the ticket list. On failure nothing changes and polling continues.
    pub async fn resolve_ticket(&self) -> ResolveOutcome {
        match self.inner.backend.resolve_ticket(&self.inner.phone).await {
            Ok(()) => {
                info!(phone = %self.inner.phone, user_id = %self.inner.user.id, "ticket resolved");
                self.unmount();
                ResolveOutcome::Resolved(Navigation::TicketList)
            }
            Err(e) => {
                warn!(phone = %self.inner.phone, error = %e, "failed to resolve ticket");
                ResolveOutcome::Failed
            }
        }
    }

    /// Asks the tourist to share their location, then refreshes the history.
    pub async fn request_location(&self, reason: &str) -> LocationRequestOutcome {
        let reason = reason.trim();
        if reason.is_empty() {
            debug!(phone = %self.inner.phone, "skipping location request without reason");
            return LocationRequestOutcome::Skipped;
        }

        match self
            .inner
            .backend
            .request_location(&self.inner.phone, reason)
            .await
        {
            Ok(()) => {
                info!(phone = %self.inner.phone, "location requested");
                self.fetch_messages().await;
                LocationRequestOutcome::Requested
            }
            Err(e) => {
                warn!(phone = %self.inner.phone, error = %e, "failed to request location");
                LocationRequestOutcome::Failed
            }
        }
    }

    /// Starts polling at the configured interval.
    pub fn start_polling(&self) -> PollHandle {
        let interval = Duration::from_millis(self.inner.config.poll_interval_ms);
        self.start_polling_every(interval)
    }

    /// Starts a poller: fetch, wait `interval`, repeat, until stopped or unmounted.
    pub fn start_polling_every(&self, interval: Duration) -> PollHandle {
        poller::spawn(self.clone(), interval, self.inner.lifecycle.child_token())
    }
}
