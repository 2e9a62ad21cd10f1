// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merging a fetched chat history into the local view.

use guidedesk_core::ChatMessage;

/// Combines the currently displayed list with a freshly fetched one.
///
/// Implementations must be pure: the sync client may call them while holding
/// the view lock.
pub trait Reconciler: Send + Sync {
    fn reconcile(&self, current: &[ChatMessage], incoming: Vec<ChatMessage>) -> Vec<ChatMessage>;
}

/// Discards the current list and shows the backend's list verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullReplace;

impl Reconciler for FullReplace {
    fn reconcile(&self, _current: &[ChatMessage], incoming: Vec<ChatMessage>) -> Vec<ChatMessage> {
        incoming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guidedesk_core::MessageKind;

    #[test]
    fn full_replace_returns_incoming_verbatim() {
        let current = vec![
            ChatMessage::text(MessageKind::User, "a", "T1"),
            ChatMessage::text(MessageKind::Agent, "b", "T2"),
        ];
        let incoming = vec![ChatMessage::text(MessageKind::User, "c", "T3")];
        assert_eq!(FullReplace.reconcile(&current, incoming.clone()), incoming);
    }

    #[test]
    fn full_replace_accepts_empty_history() {
        let current = vec![ChatMessage::text(MessageKind::User, "a", "T1")];
        assert!(FullReplace.reconcile(&current, Vec::new()).is_empty());
    }
}
