// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the ticket sync client against the mock backend.

use std::time::Duration;

use guidedesk_config::model::{RephraseFailurePolicy, SyncConfig};
use guidedesk_core::{ChatMessage, GuideDeskError, MessageKind};
use guidedesk_sync::{LocationRequestOutcome, Navigation, ResolveOutcome, SendOutcome};
use guidedesk_test_utils::{BackendCall, Endpoint, TestHarness};
use tracing_test::traced_test;

const PHONE: &str = "+15550100";

fn user(text: &str, ts: &str) -> ChatMessage {
    ChatMessage::text(MessageKind::User, text, ts)
}

fn agent(text: &str, ts: &str) -> ChatMessage {
    ChatMessage::text(MessageKind::Agent, text, ts)
}

fn three_messages() -> Vec<ChatMessage> {
    vec![
        user("I lost my passport", "T1"),
        ChatMessage::text(MessageKind::AiGuide, "Let me connect you to a guide.", "T2"),
        agent("Which city are you in?", "T3"),
    ]
}

fn four_messages() -> Vec<ChatMessage> {
    let mut messages = three_messages();
    messages.push(user("Rome, near the Colosseum", "T4"));
    messages
}

fn no_rephrase() -> SyncConfig {
    SyncConfig {
        rephrase_outgoing: false,
        ..SyncConfig::default()
    }
}

#[tokio::test]
async fn mount_requires_logged_in_guide() {
    let harness = TestHarness::builder().logged_out().build().await.unwrap();
    let err = harness.mount(PHONE).err().expect("mount should fail");
    assert!(matches!(err, GuideDeskError::NotAuthenticated));
}

#[tokio::test]
async fn mounted_client_knows_its_guide() {
    let harness = TestHarness::builder()
        .logged_in_as("guide2")
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();
    assert_eq!(client.user().id, "guide2");
    assert_eq!(client.user().display_name, "Guide2");
    assert_eq!(client.phone(), PHONE);
    assert!(client.is_mounted());
}

#[tokio::test]
async fn fetch_sends_phone_and_language() {
    let harness = TestHarness::builder()
        .with_history(three_messages())
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    let messages = client.fetch_messages().await;
    assert_eq!(messages, three_messages());
    assert_eq!(
        harness.backend.calls_to(Endpoint::FetchMessages).await,
        vec![BackendCall::FetchMessages {
            phone: PHONE.into(),
            language: "english".into(),
        }]
    );
}

#[tokio::test]
async fn trailing_user_message_triggers_suggestions() {
    let harness = TestHarness::builder()
        .with_history(vec![user("Where is the museum?", "T1")])
        .with_suggestions(&["Two blocks north.", "Take the 64 bus."])
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    client.fetch_messages().await;

    assert_eq!(
        harness.backend.calls_to(Endpoint::SampleResponses).await,
        vec![BackendCall::SampleResponses {
            message: "Where is the museum?".into(),
        }]
    );
    assert_eq!(
        client.suggestions(),
        vec!["Two blocks north.", "Take the 64 bus."]
    );
}

#[tokio::test]
async fn admin_last_message_skips_suggestions() {
    let harness = TestHarness::builder()
        .with_history(vec![
            user("Where is the museum?", "T1"),
            agent("Two blocks north.", "T2"),
        ])
        .with_suggestions(&["unused"])
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    client.fetch_messages().await;

    assert_eq!(harness.backend.count(Endpoint::SampleResponses).await, 0);
    assert!(client.suggestions().is_empty());
}

#[tokio::test]
async fn suggestions_fetched_once_per_tourist_message() {
    let harness = TestHarness::builder()
        .with_history(vec![user("Where is the museum?", "T1")])
        .with_suggestions(&["Two blocks north."])
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    client.fetch_messages().await;
    client.fetch_messages().await;

    assert_eq!(harness.backend.count(Endpoint::FetchMessages).await, 2);
    assert_eq!(harness.backend.count(Endpoint::SampleResponses).await, 1);
}

#[tokio::test]
async fn repeated_text_from_tourist_gets_fresh_suggestions() {
    let harness = TestHarness::builder()
        .with_history(vec![user("ok", "T1")])
        .with_history(vec![user("ok", "T1"), user("ok", "T2")])
        .with_suggestions(&["Great, see you there."])
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    client.fetch_messages().await;
    client.fetch_messages().await;
    client.fetch_messages().await;

    assert_eq!(harness.backend.count(Endpoint::SampleResponses).await, 2);
}

#[tokio::test]
async fn late_suggestions_for_answered_message_are_dropped() {
    let harness = TestHarness::builder()
        .with_history(vec![user("Where is the museum?", "T1")])
        .with_history(vec![
            user("Where is the museum?", "T1"),
            agent("Two blocks north.", "T2"),
        ])
        .with_suggestions(&["Take the 64 bus."])
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    harness.backend.hold_suggestions().await;
    let slow = tokio::spawn({
        let client = client.clone();
        async move { client.fetch_messages().await }
    });
    harness.backend.wait_for(Endpoint::SampleResponses, 1).await;

    // The guide answers before the suggestions come back.
    client.fetch_messages().await;
    assert!(client.suggestions().is_empty());

    harness.backend.release_suggestions().await;
    slow.await.unwrap();

    assert_eq!(client.messages().last().unwrap().kind, MessageKind::Agent);
    assert!(client.suggestions().is_empty());
    assert_eq!(harness.backend.count(Endpoint::SampleResponses).await, 1);
}

#[tokio::test]
async fn late_suggestions_for_older_tourist_message_are_dropped() {
    let harness = TestHarness::builder()
        .with_history(vec![user("Where is the museum?", "T1")])
        .with_history(vec![
            user("Where is the museum?", "T1"),
            user("Never mind, found it", "T2"),
        ])
        .with_suggestions(&["Enjoy the visit!"])
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    harness.backend.hold_suggestions().await;
    let slow = tokio::spawn({
        let client = client.clone();
        async move { client.fetch_messages().await }
    });
    harness.backend.wait_for(Endpoint::SampleResponses, 1).await;
    harness.backend.stop_holding_suggestions().await;

    client.fetch_messages().await;
    assert_eq!(client.suggestions(), vec!["Enjoy the visit!"]);

    harness
        .backend
        .set_suggestions(vec!["Take the 64 bus.".into()])
        .await;
    harness.backend.release_suggestions().await;
    slow.await.unwrap();

    assert_eq!(client.suggestions(), vec!["Enjoy the visit!"]);
    assert_eq!(
        harness.backend.calls_to(Endpoint::SampleResponses).await,
        vec![
            BackendCall::SampleResponses {
                message: "Where is the museum?".into(),
            },
            BackendCall::SampleResponses {
                message: "Never mind, found it".into(),
            },
        ]
    );
}

#[tokio::test]
async fn each_fetch_replaces_the_whole_list() {
    let harness = TestHarness::builder()
        .with_history(three_messages())
        .with_history(four_messages())
        .with_sync_config(no_rephrase())
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    assert_eq!(client.fetch_messages().await.len(), 3);
    client.send_message("On my way").await;

    assert_eq!(client.messages(), four_messages());
}

#[tokio::test]
async fn older_fetch_cannot_overwrite_newer_one() {
    let harness = TestHarness::builder()
        .with_history(four_messages())
        .with_history(three_messages())
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    harness.backend.hold_fetches().await;
    let slow = tokio::spawn({
        let client = client.clone();
        async move { client.fetch_messages().await }
    });
    harness.backend.wait_for(Endpoint::FetchMessages, 1).await;
    harness.backend.stop_holding().await;

    // Issued second, answered first.
    assert_eq!(client.fetch_messages().await, four_messages());

    harness.backend.release_fetches().await;
    slow.await.unwrap();

    assert_eq!(client.messages(), four_messages());
    assert_eq!(client.view().applied_seq, 2);
}

#[tokio::test]
#[traced_test]
async fn failed_fetch_keeps_previous_list() {
    let harness = TestHarness::builder()
        .with_history(three_messages())
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();
    client.fetch_messages().await;

    harness.backend.fail(Endpoint::FetchMessages).await;
    let messages = client.fetch_messages().await;

    assert_eq!(messages, three_messages());
    assert!(logs_contain("failed to fetch chat history"));
}

#[tokio::test]
async fn whitespace_reply_makes_no_call() {
    let harness = TestHarness::builder().build().await.unwrap();
    let client = harness.mount(PHONE).unwrap();

    assert_eq!(client.send_message("   \n\t ").await, SendOutcome::Skipped);
    assert_eq!(client.send_message("").await, SendOutcome::Skipped);
    assert!(harness.backend.calls().await.is_empty());
}

#[tokio::test]
async fn reply_is_rephrased_sent_then_refetched() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .backend
        .set_rephrased("I am on my way to you now.")
        .await;
    let client = harness.mount(PHONE).unwrap();
    client.set_draft("omw");

    let outcome = client.send_draft().await;

    assert_eq!(
        outcome,
        SendOutcome::Sent {
            message: "I am on my way to you now.".into()
        }
    );
    assert_eq!(
        harness.backend.calls().await,
        vec![
            BackendCall::RephraseMessage {
                message: "omw".into()
            },
            BackendCall::SendMessage {
                phone: PHONE.into(),
                message: "I am on my way to you now.".into(),
            },
            BackendCall::FetchMessages {
                phone: PHONE.into(),
                language: "english".into(),
            },
        ]
    );
    assert!(client.draft().is_empty());
}

#[tokio::test]
async fn rephrase_disabled_sends_trimmed_text() {
    let harness = TestHarness::builder()
        .with_sync_config(no_rephrase())
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    client.send_message("  See you at the fountain  ").await;

    assert_eq!(harness.backend.count(Endpoint::RephraseMessage).await, 0);
    assert_eq!(
        harness.backend.calls_to(Endpoint::SendMessage).await,
        vec![BackendCall::SendMessage {
            phone: PHONE.into(),
            message: "See you at the fountain".into(),
        }]
    );
}

#[tokio::test]
async fn rephrase_failure_sends_original_by_default() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.backend.fail(Endpoint::RephraseMessage).await;
    let client = harness.mount(PHONE).unwrap();

    let outcome = client.send_message("omw").await;

    assert_eq!(
        outcome,
        SendOutcome::Sent {
            message: "omw".into()
        }
    );
    assert_eq!(harness.backend.count(Endpoint::SendMessage).await, 1);
}

#[tokio::test]
async fn rephrase_failure_can_abort() {
    let harness = TestHarness::builder()
        .with_sync_config(SyncConfig {
            rephrase_failure: RephraseFailurePolicy::Abort,
            ..SyncConfig::default()
        })
        .build()
        .await
        .unwrap();
    harness.backend.fail(Endpoint::RephraseMessage).await;
    let client = harness.mount(PHONE).unwrap();
    client.set_draft("omw");

    assert_eq!(client.send_draft().await, SendOutcome::Failed);
    assert_eq!(harness.backend.count(Endpoint::SendMessage).await, 0);
    assert_eq!(client.draft(), "omw");
}

#[tokio::test]
async fn failed_send_keeps_draft() {
    let harness = TestHarness::builder()
        .with_sync_config(no_rephrase())
        .build()
        .await
        .unwrap();
    harness.backend.fail(Endpoint::SendMessage).await;
    let client = harness.mount(PHONE).unwrap();
    client.set_draft("On my way");

    assert_eq!(client.send_draft().await, SendOutcome::Failed);
    assert_eq!(client.draft(), "On my way");
    assert_eq!(harness.backend.count(Endpoint::FetchMessages).await, 0);
}

#[tokio::test]
async fn picked_suggestion_becomes_draft() {
    let harness = TestHarness::builder()
        .with_history(vec![user("Where is the museum?", "T1")])
        .with_suggestions(&["Two blocks north.", "Take the 64 bus."])
        .with_sync_config(no_rephrase())
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();
    client.fetch_messages().await;

    assert!(client.use_suggestion(1));
    assert_eq!(client.draft(), "Take the 64 bus.");
    assert!(!client.use_suggestion(5));
    assert_eq!(client.draft(), "Take the 64 bus.");

    client.send_draft().await;
    assert_eq!(
        harness.backend.calls_to(Endpoint::SendMessage).await,
        vec![BackendCall::SendMessage {
            phone: PHONE.into(),
            message: "Take the 64 bus.".into(),
        }]
    );
}

#[tokio::test]
async fn resolve_issues_one_delete_and_navigates_away() {
    let harness = TestHarness::builder().build().await.unwrap();
    let client = harness.mount(PHONE).unwrap();

    let outcome = client.resolve_ticket().await;

    assert_eq!(outcome, ResolveOutcome::Resolved(Navigation::TicketList));
    assert_eq!(
        harness.backend.calls().await,
        vec![BackendCall::ResolveTicket {
            phone: PHONE.into()
        }]
    );
    assert!(!client.is_mounted());
}

#[tokio::test]
async fn failed_resolve_stays_mounted() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.backend.fail(Endpoint::ResolveTicket).await;
    let client = harness.mount(PHONE).unwrap();

    assert_eq!(client.resolve_ticket().await, ResolveOutcome::Failed);
    assert_eq!(harness.backend.count(Endpoint::ResolveTicket).await, 1);
    assert!(client.is_mounted());
}

#[tokio::test]
async fn location_request_needs_a_reason() {
    let harness = TestHarness::builder().build().await.unwrap();
    let client = harness.mount(PHONE).unwrap();

    assert_eq!(
        client.request_location("  ").await,
        LocationRequestOutcome::Skipped
    );
    assert!(harness.backend.calls().await.is_empty());
}

#[tokio::test]
async fn location_request_then_refetch_shows_latest_share() {
    let harness = TestHarness::builder()
        .with_history(vec![
            ChatMessage::location(41.8902, 12.4922, "T1"),
            user("Moved to the fountain", "T2"),
            ChatMessage::location(41.9009, 12.4833, "T3"),
        ])
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    let outcome = client.request_location("So I can meet you").await;

    assert_eq!(outcome, LocationRequestOutcome::Requested);
    assert_eq!(
        harness.backend.calls_to(Endpoint::RequestLocation).await,
        vec![BackendCall::RequestLocation {
            phone: PHONE.into(),
            reason: "So I can meet you".into(),
        }]
    );
    assert_eq!(harness.backend.count(Endpoint::FetchMessages).await, 1);

    let location = client.latest_location().expect("location shared");
    assert_eq!(location.latitude, 41.9009);
    assert_eq!(location.longitude, 12.4833);
}

#[tokio::test]
async fn failed_location_request_does_not_refetch() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.backend.fail(Endpoint::RequestLocation).await;
    let client = harness.mount(PHONE).unwrap();

    assert_eq!(
        client.request_location("So I can meet you").await,
        LocationRequestOutcome::Failed
    );
    assert_eq!(harness.backend.count(Endpoint::FetchMessages).await, 0);
}

#[tokio::test(start_paused = true)]
async fn poller_fetches_at_fixed_interval_until_stopped() {
    let harness = TestHarness::builder()
        .with_history(three_messages())
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    let handle = client.start_polling();
    tokio::time::sleep(Duration::from_millis(6_500)).await;
    // Fetches at 0 ms, 3000 ms and 6000 ms.
    assert_eq!(harness.backend.count(Endpoint::FetchMessages).await, 3);
    assert_eq!(client.messages(), three_messages());

    handle.stop();
    handle.stop();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(harness.backend.count(Endpoint::FetchMessages).await, 3);
}

#[tokio::test(start_paused = true)]
async fn poller_keeps_retrying_unreachable_backend() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.backend.fail(Endpoint::FetchMessages).await;
    let client = harness.mount(PHONE).unwrap();

    let _handle = client.start_polling_every(Duration::from_millis(1_000));
    tokio::time::sleep(Duration::from_millis(4_500)).await;

    assert_eq!(harness.backend.count(Endpoint::FetchMessages).await, 5);
    assert!(client.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn stop_during_fetch_discards_result_and_schedules_nothing() {
    let harness = TestHarness::builder()
        .with_history(three_messages())
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();
    harness.backend.hold_fetches().await;

    let handle = client.start_polling();
    harness.backend.wait_for(Endpoint::FetchMessages, 1).await;
    handle.stop();
    harness.backend.release_fetches().await;
    handle.join().await;

    assert!(client.messages().is_empty());
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(harness.backend.count(Endpoint::FetchMessages).await, 1);
}

#[tokio::test(start_paused = true)]
async fn resolve_stops_running_pollers() {
    let harness = TestHarness::builder()
        .with_history(three_messages())
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();

    let handle = client.start_polling();
    harness.backend.wait_for(Endpoint::FetchMessages, 1).await;
    client.resolve_ticket().await;
    handle.join().await;

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(harness.backend.count(Endpoint::FetchMessages).await, 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_stops_poller() {
    let harness = TestHarness::builder().build().await.unwrap();
    let client = harness.mount(PHONE).unwrap();

    let handle = client.start_polling();
    harness.backend.wait_for(Endpoint::FetchMessages, 1).await;
    drop(handle);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(harness.backend.count(Endpoint::FetchMessages).await, 1);
}

#[tokio::test]
async fn view_subscribers_see_fetched_history() {
    let harness = TestHarness::builder()
        .with_history(three_messages())
        .build()
        .await
        .unwrap();
    let client = harness.mount(PHONE).unwrap();
    let mut view = client.subscribe();

    client.fetch_messages().await;

    assert!(view.has_changed().unwrap());
    assert_eq!(view.borrow_and_update().messages, three_messages());
}
