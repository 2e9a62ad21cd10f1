// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-interval chat polling as a cancellable task.
//!
//! The loop is fetch, wait, repeat. A stop request never interrupts a fetch
//! already on the wire: the fetch finishes, its result is dropped, and the
//! loop exits without scheduling another one. There is no backoff; an
//! unreachable backend is retried at the same interval until stopped.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::ticket::TicketSyncClient;

/// Owner of a running poller.
///
/// Dropping the handle stops the poller.
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Requests the poller to stop. Safe to call any number of times.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits for the poller task to exit.
    ///
    /// Only returns once the poller was stopped, either through
    /// [`stop`](Self::stop) or by unmounting the ticket.
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

pub(crate) fn spawn(
    client: TicketSyncClient,
    interval: Duration,
    token: CancellationToken,
) -> PollHandle {
    let task_token = token.clone();
    let task = tokio::spawn(async move {
        run(client, interval, task_token).await;
    });
    PollHandle {
        token,
        task: Some(task),
    }
}

async fn run(client: TicketSyncClient, interval: Duration, token: CancellationToken) {
    info!(
        phone = %client.phone(),
        interval_ms = interval.as_millis() as u64,
        "ticket poller started"
    );

    while !token.is_cancelled() {
        let fetched = client.fetch_tagged().await;
        if token.is_cancelled() {
            debug!(phone = %client.phone(), "poller stopped during fetch, dropping result");
            break;
        }
        if let Some((seq, messages)) = fetched {
            client.apply(seq, messages).await;
        }

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!(phone = %client.phone(), "ticket poller stopped");
}
