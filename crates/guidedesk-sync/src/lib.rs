// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend synchronization for GuideDesk.
//!
//! # Components
//!
//! - [`TicketSyncClient`] - one mounted ticket: chat polling, replies, resolve
//! - [`PollHandle`] - owner of a running chat poller
//! - [`Reconciler`] - how a fetched history replaces the displayed one
//! - [`TicketBoard`] - the escalated-ticket list
//! - [`PushRegistrar`] / [`NotificationRelay`] - push token and foreground messages

pub mod board;
pub mod poller;
pub mod push;
pub mod reconcile;
pub mod ticket;

pub use board::{BoardState, TicketBoard};
pub use poller::PollHandle;
pub use push::{
    NotificationRelay, PresentedNotification, PushRegistrar, PushRegistration, handle_background,
};
pub use reconcile::{FullReplace, Reconciler};
pub use ticket::{
    LocationRequestOutcome, Navigation, ResolveOutcome, SendOutcome, TicketSyncBuilder,
    TicketSyncClient, TicketView,
};
