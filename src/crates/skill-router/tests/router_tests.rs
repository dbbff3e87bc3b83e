//! Integration tests for the routing façade
//!
//! Covers:
//! - End-to-end routing of clean, reasoning-prefixed and malformed output
//! - Gate bypass without inference
//! - Inference errors, empty output and timeouts degrading to the fallback
//! - Streamed generation and the separate reasoning channel
//! - Residency being best effort

mod common;

use callgrammar::{ArgValue, Confidence, DecodeOptions, DecodeStrategy, ParseStrategy};
use common::{router, MockBackend, RecordingResidency, Reply};
use llm::Generation;
use skill_router::{Gate, RouterOptions, RoutingRequest, SkillCall};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test]
async fn test_kitchen_lights() {
    let backend = MockBackend::text(
        "<start_function_call>call:control_light{action:<escape>on<escape>,room:<escape>kitchen<escape>}<end_function_call>",
    );
    let router = router(backend.clone());

    let decision = router.route("Turn on the kitchen lights").await;

    assert_eq!(backend.calls(), 1);
    assert_eq!(decision.function_name, "control_light");
    assert_eq!(decision.arguments.get_str("action"), Some("on"));
    assert_eq!(decision.arguments.get_str("room"), Some("kitchen"));
    assert_eq!(decision.strategy, DecodeStrategy::Strict);
    assert_eq!(decision.confidence, Confidence::Clean);
    assert!(!decision.bypassed);
    assert_eq!(
        decision.skill_call().unwrap(),
        SkillCall::ControlLight {
            action: "on".to_string(),
            room: "kitchen".to_string()
        }
    );
}

#[tokio::test]
async fn test_prompt_sent_to_backend() {
    let backend = MockBackend::text("call:get_system_info{}");
    let router = router(backend.clone());

    router.route("what's the system status").await;

    let request = backend.last_request().unwrap();
    assert_eq!(request.prompt, router.prompt("what's the system status"));
    assert!(request.prompt.ends_with("<start_of_turn>model"));
    assert_eq!(request.temperature, 0.0);
    assert_eq!(request.seed, Some(42));
    assert_eq!(request.max_tokens, 150);
    assert_eq!(request.stop, ["<end_of_turn>", "<start_function_response>"]);
}

#[tokio::test]
async fn test_gibberish_bypasses_inference() {
    let backend = MockBackend::text("call:web_search{query:<escape>x<escape>}");
    let router = router(backend.clone());

    let decision = router.route("asdkjfh").await;

    assert_eq!(backend.calls(), 0);
    assert!(decision.bypassed);
    assert_eq!(decision.function_name, "passthrough");
    assert_eq!(decision.arguments.get("thinking"), Some(&ArgValue::Boolean(false)));
    assert_eq!(decision.elapsed, Duration::ZERO);
}

#[tokio::test]
async fn test_disabled_gate_always_infers() {
    let backend = MockBackend::text("call:passthrough{thinking:<escape>false<escape>}");
    let router = router(backend.clone()).with_gate(Gate::disabled());

    let decision = router.route("asdkjfh").await;

    assert_eq!(backend.calls(), 1);
    assert!(!decision.bypassed);
    assert_eq!(decision.skill_call().unwrap(), SkillCall::Passthrough { thinking: false });
}

#[tokio::test]
async fn test_reasoning_prefix_in_content() {
    let backend = MockBackend::text(
        "<think>I should turn on lights</think>call:control_light{action:<escape>on<escape>,room:<escape>den<escape>}",
    );
    let decision = router(backend).route("lights on in the den please").await;

    assert_eq!(decision.function_name, "control_light");
    assert_eq!(decision.arguments.get_str("action"), Some("on"));
    assert_eq!(decision.arguments.get_str("room"), Some("den"));
    assert!(!decision.is_fallback());
}

#[tokio::test]
async fn test_reasoning_channel_is_rewrapped() {
    // The server put the whole call in its reasoning channel
    let generation = Generation::new("").with_thinking(
        "call:set_timer{duration:<escape>10 minutes<escape>}",
    );
    let backend = MockBackend::new(Reply::Text(generation));
    let decision = router(backend).route("set a timer for ten minutes").await;

    assert_eq!(decision.function_name, "set_timer");
    assert_eq!(decision.arguments.get("seconds").and_then(ArgValue::as_i64), Some(600));
}

#[tokio::test]
async fn test_json_action_in_reasoning() {
    let generation = Generation::new("").with_thinking(
        r#"The user wants a search. {"action": "web_search", "query": "rust async"}"#,
    );
    let backend = MockBackend::new(Reply::Text(generation));
    let decision = router(backend).route("search for rust async").await;

    assert_eq!(decision.function_name, "web_search");
    assert_eq!(decision.strategy, DecodeStrategy::ThinkingJson);
    assert_eq!(decision.confidence, Confidence::Recovered);
    assert_eq!(decision.arguments.get_str("query"), Some("rust async"));
}

#[tokio::test]
async fn test_truncated_output_keeps_complete_pairs() {
    let backend = MockBackend::text(
        "<start_function_call>call:create_calendar_event{title:<escape>Dentist<escape>,date:<escape>tomorrow<escape>,time:<escape>3p",
    );
    let decision = router(backend).route("schedule the dentist tomorrow at 3pm").await;

    assert_eq!(decision.function_name, "create_calendar_event");
    assert_eq!(decision.arguments.get_str("title"), Some("Dentist"));
    assert_eq!(decision.arguments.get_str("date"), Some("2026-10-20"));
}

#[tokio::test]
async fn test_name_only_synthesizes_from_utterance() {
    let backend = MockBackend::text("add_task");
    let decision = router(backend).route("add buy milk to my todo list").await;

    assert_eq!(decision.function_name, "add_task");
    assert_eq!(decision.confidence, Confidence::Guessed);
    assert_eq!(
        decision.skill_call().unwrap(),
        SkillCall::AddTask {
            text: "add buy milk to my todo list".to_string(),
            priority: None
        }
    );
}

#[tokio::test]
async fn test_configured_strategy_order() {
    let backend = MockBackend::text("hmm set_alarm maybe");
    let options = RouterOptions {
        decode: DecodeOptions::with_order(vec![ParseStrategy::Strict]),
        ..RouterOptions::default()
    };
    let decision = router(backend).with_options(options).route("wake me at 7am").await;

    assert!(decision.is_fallback());
    assert_eq!(decision.confidence, Confidence::None);
}

// ============================================================================
// Degraded inference
// ============================================================================

#[tokio::test]
async fn test_inference_error_falls_back() {
    let backend = MockBackend::new(Reply::Fail("connection refused".to_string()));
    let decision = router(backend.clone()).route("turn off the lights").await;

    assert_eq!(backend.calls(), 1);
    assert!(decision.is_fallback());
    assert!(!decision.bypassed);
    assert_eq!(decision.function_name, "passthrough");
    assert_eq!(decision.elapsed, Duration::ZERO);
    assert_eq!(decision.confidence, Confidence::None);
}

#[tokio::test]
async fn test_empty_output_falls_back() {
    let backend = MockBackend::text("   ");
    let decision = router(backend).route("turn off the lights").await;

    assert!(decision.is_fallback());
    assert_eq!(decision.elapsed, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_falls_back() {
    let backend = MockBackend::new(Reply::Hang(Duration::from_secs(60)));
    let options = RouterOptions {
        timeout: Duration::from_secs(2),
        ..RouterOptions::default()
    };
    let decision = router(backend).with_options(options).route("search for cats").await;

    assert!(decision.is_fallback());
    assert_eq!(decision.elapsed, Duration::ZERO);
    assert_eq!(decision.confidence, Confidence::None);
}

#[tokio::test(start_paused = true)]
async fn test_slow_reply_within_timeout() {
    let backend = MockBackend::new(Reply::Hang(Duration::from_secs(1)));
    let decision = router(backend).route("search for cats").await;

    assert_eq!(decision.function_name, "web_search");
    assert_eq!(decision.arguments.get_str("query"), Some("late"));
    assert!(decision.elapsed >= Duration::from_secs(1));
}

// ============================================================================
// Streaming and residency
// ============================================================================

#[tokio::test]
async fn test_streamed_generation_is_accumulated() {
    let generation = Generation::new(
        "<start_function_call>call:set_alarm{time:<escape>7:30pm<escape>}<end_function_call>",
    )
    .with_thinking("alarm request");
    let backend = MockBackend::new(Reply::Text(generation));
    let options = RouterOptions {
        stream: true,
        ..RouterOptions::default()
    };
    let decision = router(backend).with_options(options).route("set an alarm for 7:30pm").await;

    assert_eq!(decision.function_name, "set_alarm");
    assert_eq!(decision.arguments.get_str("time"), Some("19:30"));
}

#[tokio::test]
async fn test_residency_runs_before_inference() {
    let backend = MockBackend::text("call:get_system_info{}");
    let residency = Arc::new(RecordingResidency::default());
    let router = router(backend).with_residency(residency.clone());

    let decision = router.route("system status").await;

    assert_eq!(decision.function_name, "get_system_info");
    assert_eq!(*residency.seen.lock().unwrap(), ["functiongemma:270m"]);
}

#[tokio::test]
async fn test_residency_failure_is_ignored() {
    let backend = MockBackend::text("call:get_system_info{}");
    let residency = Arc::new(RecordingResidency {
        fail: true,
        ..Default::default()
    });
    let router = router(backend.clone()).with_residency(residency);

    let decision = router.route("system status").await;

    assert_eq!(backend.calls(), 1);
    assert_eq!(decision.function_name, "get_system_info");
}

// ============================================================================
// Requests and concurrency
// ============================================================================

#[tokio::test]
async fn test_request_id_is_carried() {
    let backend = MockBackend::text("call:get_system_info{}");
    let router = router(backend);
    let request = RoutingRequest::new("system status", router.catalog().clone());

    let decision = router.route_request(&request).await;
    assert_eq!(decision.request_id, request.id);
}

#[tokio::test]
async fn test_concurrent_routes_share_one_router() {
    let backend = MockBackend::text("call:web_search{query:<escape>news<escape>}");
    let router = Arc::new(router(backend.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let router = router.clone();
            tokio::spawn(async move { router.route(&format!("search the news {}", i)).await })
        })
        .collect();

    for handle in handles {
        let decision = handle.await.unwrap();
        assert_eq!(decision.function_name, "web_search");
    }
    assert_eq!(backend.calls(), 8);
}
