// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dashboard's list of escalated tickets.

use std::sync::Arc;

use guidedesk_core::{Ticket, TicketBackend};
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub tickets: Vec<Ticket>,
    /// True while a refresh is in flight.
    pub loading: bool,
}

/// Escalated tickets awaiting a guide, refreshed on demand.
pub struct TicketBoard {
    backend: Arc<dyn TicketBackend>,
    state: watch::Sender<BoardState>,
}

impl TicketBoard {
    pub fn new(backend: Arc<dyn TicketBackend>) -> Self {
        let (state, _) = watch::channel(BoardState::default());
        Self { backend, state }
    }

    /// Replaces the list with the backend's current one.
    ///
    /// A failed fetch is logged and the previous list is kept. Returns the
    /// list shown afterwards.
    pub async fn refresh(&self) -> Vec<Ticket> {
        self.state.send_modify(|state| state.loading = true);

        let fetched = self.backend.list_escalated_tickets().await;
        self.state.send_modify(|state| {
            state.loading = false;
            match fetched {
                Ok(tickets) => {
                    debug!(count = tickets.len(), "escalated tickets fetched");
                    state.tickets = tickets;
                }
                Err(e) => warn!(error = %e, "failed to fetch escalated tickets"),
            }
        });
        self.tickets()
    }

    pub fn tickets(&self) -> Vec<Ticket> {
        self.state.borrow().tickets.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.state.subscribe()
    }
}
