// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits between GuideDesk and its external collaborators.
//!
//! Every trait uses `#[async_trait]` so implementations can be held as
//! `Arc<dyn Trait + Send + Sync>`.

pub mod backend;
pub mod credentials;
pub mod push;
pub mod storage;

pub use backend::TicketBackend;
pub use credentials::CredentialVerifier;
pub use push::PushMessaging;
pub use storage::KeyValueStore;
