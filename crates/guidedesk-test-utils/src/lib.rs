// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for GuideDesk integration tests.
//!
//! # Components
//!
//! - [`MockBackend`] - In-memory tourist-chatbot backend with call recording
//! - [`MockPush`] - Push SDK with injectable foreground messages
//! - [`TestHarness`] - Logged-in session plus mock backend, ready to mount tickets

pub mod harness;
pub mod mock_backend;
pub mod mock_push;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_backend::{BackendCall, Endpoint, MockBackend};
pub use mock_push::MockPush;
