//! Tests for telegram module

use super::commands::{self as texts, location_callback_data, location_request_keyboard};
use super::flow::{self, Action, Reply, ReplyKeyboard};
use super::*;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;

const INTERVAL: Duration = Duration::from_secs(30);

fn reply_of(action: Action) -> Reply {
    match action {
        Action::Send(reply) | Action::Begin { reply, .. } => reply,
        Action::Silent => panic!("expected a reply"),
    }
}

#[test]
fn test_telegram_config() {
    let config = TelegramConfig::new("test_token")
        .with_bot_username("@convoy_bot")
        .with_auto_track_interval(Duration::from_secs(45));

    assert_eq!(config.bot_token, "test_token");
    assert_eq!(config.bot_username, "convoy_bot");
    assert_eq!(config.auto_track_interval, Duration::from_secs(45));
}

#[test]
fn test_bot_username_check() {
    let config = TelegramConfig::new("token").with_bot_username("Convoy_Bot");
    assert!(config.matches_bot_username("convoy_bot"));
    assert!(config.matches_bot_username("@Convoy_Bot"));
    assert!(!config.matches_bot_username("other_bot"));
    assert!(!config.matches_bot_username(""));
}

#[test]
fn test_default_interval() {
    let config = TelegramConfig::new("token");
    assert_eq!(config.auto_track_interval, Duration::from_secs(30));
}

#[test]
fn test_parse_start_with_payload() {
    assert_eq!(
        DriverCommand::parse("/start 6f1c2a"),
        Some(DriverCommand::Start {
            driver_id: Some("6f1c2a".to_string())
        })
    );
    assert_eq!(
        DriverCommand::parse("/start@convoy_bot abc"),
        Some(DriverCommand::Start {
            driver_id: Some("abc".to_string())
        })
    );
    assert_eq!(
        DriverCommand::parse("/start"),
        Some(DriverCommand::Start { driver_id: None })
    );
}

#[test]
fn test_parse_other_commands() {
    assert_eq!(DriverCommand::parse("/stop"), Some(DriverCommand::Stop));
    assert_eq!(
        DriverCommand::parse("🔄 Start Auto Tracking"),
        Some(DriverCommand::StartAutoTracking)
    );
    assert_eq!(
        DriverCommand::parse("🛑 Stop Auto Tracking"),
        Some(DriverCommand::StopAutoTracking)
    );
    assert_eq!(DriverCommand::parse("hello"), None);
    assert_eq!(DriverCommand::parse("/help"), None);
}

#[test]
fn test_location_callback() {
    let data = location_callback_data("abc-123");
    assert_eq!(data, "loc_abc-123");
    assert_eq!(parse_location_callback(&data), Some("abc-123"));
    assert_eq!(parse_location_callback("loc_"), None);
    assert_eq!(parse_location_callback("approve:1"), None);
}

#[test]
fn test_location_request_keyboard() {
    let keyboard = location_request_keyboard();
    assert_eq!(keyboard.keyboard.len(), 1);
    assert_eq!(keyboard.keyboard[0][0].text, "📍");
}

#[test]
fn test_jobs_single_per_user() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    let first = jobs.try_start(7, &shutdown);
    assert!(first.is_some());
    assert!(jobs.try_start(7, &shutdown).is_none());
    assert!(jobs.is_tracking(7));
    assert_eq!(jobs.len(), 1);
}

#[test]
fn test_jobs_stop_cancels_token() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    let job = jobs.try_start(7, &shutdown).unwrap();
    assert!(jobs.stop(7));
    assert!(job.token.is_cancelled());
    assert!(!jobs.stop(7));
    assert!(jobs.is_empty());
}

#[test]
fn test_jobs_finish_ignores_newer_job() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    let old = jobs.try_start(7, &shutdown).unwrap();
    jobs.stop(7);
    let new = jobs.try_start(7, &shutdown).unwrap();

    jobs.finish(7, old.id);
    assert!(jobs.is_tracking(7));

    jobs.finish(7, new.id);
    assert!(!jobs.is_tracking(7));
}

#[test]
fn test_shutdown_cancels_all_jobs() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    let a = jobs.try_start(1, &shutdown).unwrap();
    let b = jobs.try_start(2, &shutdown).unwrap();
    shutdown.cancel();

    assert!(a.token.is_cancelled());
    assert!(b.token.is_cancelled());
}

#[test]
fn test_adapter_starts_idle() {
    let adapter = TelegramAdapter::new(TelegramConfig::new("123:token"));
    assert!(adapter.jobs.is_empty());
    assert_eq!(adapter.config.bot_token, "123:token");
}

#[test]
fn test_claim_opens_silent_job() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    match flow::after_claim(&jobs, &shutdown, 7, true) {
        Action::Begin {
            reply, prompt_for, ..
        } => {
            assert_eq!(reply.text, texts::LOCATION_PIN);
            assert_eq!(reply.keyboard, ReplyKeyboard::LocationRequest);
            assert_eq!(prompt_for, None);
        }
        other => panic!("unexpected action {:?}", other),
    }
    assert!(jobs.is_tracking(7));

    // A second claim by the same user stays quiet
    assert!(matches!(
        flow::after_claim(&jobs, &shutdown, 7, true),
        Action::Silent
    ));
}

#[test]
fn test_failed_claim_is_silent() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    assert!(matches!(
        flow::after_claim(&jobs, &shutdown, 7, false),
        Action::Silent
    ));
    assert!(jobs.is_empty());
}

#[test]
fn test_auto_tracking_after_claim_is_already_running() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();
    let _silent = flow::after_claim(&jobs, &shutdown, 7, true);

    let action = flow::on_text(
        &jobs,
        &shutdown,
        7,
        Some("d1"),
        Some(&DriverCommand::StartAutoTracking),
        INTERVAL,
    );
    let reply = reply_of(action);
    assert_eq!(reply.text, texts::ALREADY_RUNNING);
    assert_eq!(reply.keyboard, ReplyKeyboard::Keep);
}

#[test]
fn test_start_auto_tracking() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    let action = flow::on_text(
        &jobs,
        &shutdown,
        7,
        Some("d1"),
        Some(&DriverCommand::StartAutoTracking),
        INTERVAL,
    );
    match action {
        Action::Begin {
            reply, prompt_for, ..
        } => {
            assert!(reply.text.contains("every 30 seconds"));
            assert_eq!(reply.keyboard, ReplyKeyboard::Stop);
            assert_eq!(prompt_for.as_deref(), Some("d1"));
        }
        other => panic!("unexpected action {:?}", other),
    }
    assert!(jobs.is_tracking(7));
}

#[test]
fn test_stop_auto_tracking() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();
    let job = jobs.try_start(7, &shutdown).unwrap();

    let action = flow::on_text(
        &jobs,
        &shutdown,
        7,
        Some("d1"),
        Some(&DriverCommand::StopAutoTracking),
        INTERVAL,
    );
    let reply = reply_of(action);
    assert_eq!(reply.text, texts::AUTO_TRACKING_STOPPED);
    assert_eq!(reply.keyboard, ReplyKeyboard::Idle);
    assert!(job.token.is_cancelled());
    assert!(!jobs.is_tracking(7));
}

#[test]
fn test_stop_auto_tracking_when_idle() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    let action = flow::on_text(
        &jobs,
        &shutdown,
        7,
        Some("d1"),
        Some(&DriverCommand::StopAutoTracking),
        INTERVAL,
    );
    assert_eq!(reply_of(action).text, texts::NOT_RUNNING);
}

#[test]
fn test_unregistered_user_buttons() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    for command in [
        Some(DriverCommand::StartAutoTracking),
        Some(DriverCommand::StopAutoTracking),
        None,
    ] {
        let action = flow::on_text(&jobs, &shutdown, 7, None, command.as_ref(), INTERVAL);
        assert_eq!(reply_of(action).text, texts::NOT_REGISTERED);
    }
    assert!(jobs.is_empty());
}

#[test]
fn test_registered_free_text_is_ignored() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    let action = flow::on_text(&jobs, &shutdown, 7, Some("d1"), None, INTERVAL);
    assert!(matches!(action, Action::Silent));
}

#[test]
fn test_stop_command_cancels_job() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();
    let job = jobs.try_start(7, &shutdown).unwrap();

    let reply = flow::on_stop(&jobs, 7, Some(true));
    assert_eq!(reply.text, texts::TRACKING_STOPPED);
    assert_eq!(reply.keyboard, ReplyKeyboard::Remove);
    assert!(job.token.is_cancelled());
    assert!(jobs.is_empty());
}

#[test]
fn test_stop_command_replies() {
    let jobs = AutoTrackingJobs::new();

    assert_eq!(flow::on_stop(&jobs, 7, None).text, texts::NOT_TRACKED);
    assert_eq!(flow::on_stop(&jobs, 7, Some(false)).text, texts::STOP_FAILED);
}

#[tokio::test]
async fn test_undelivered_reply_releases_job() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    let action = flow::on_text(
        &jobs,
        &shutdown,
        7,
        Some("d1"),
        Some(&DriverCommand::StartAutoTracking),
        INTERVAL,
    );
    let delivered = flow::deliver(&jobs, 7, action, |_| async {
        Err::<(), _>(std::io::Error::other("bot blocked by user"))
    })
    .await;

    assert!(delivered.is_err());
    assert!(!jobs.is_tracking(7));

    // The user can try again
    let retry = flow::on_text(
        &jobs,
        &shutdown,
        7,
        Some("d1"),
        Some(&DriverCommand::StartAutoTracking),
        INTERVAL,
    );
    assert!(matches!(retry, Action::Begin { .. }));
}

#[tokio::test]
async fn test_delivered_reply_keeps_job() {
    let jobs = AutoTrackingJobs::new();
    let shutdown = CancellationToken::new();

    let action = flow::on_text(
        &jobs,
        &shutdown,
        7,
        Some("d1"),
        Some(&DriverCommand::StartAutoTracking),
        INTERVAL,
    );
    let delivered = flow::deliver(&jobs, 7, action, |_| async { Ok::<(), std::io::Error>(()) })
        .await
        .unwrap();

    let (job, driver_id) = delivered.unwrap();
    assert_eq!(driver_id, "d1");
    assert!(!job.token.is_cancelled());
    assert!(jobs.is_tracking(7));
}

#[test]
fn test_report_time_capped_at_now() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let sent = Utc.with_ymd_and_hms(2024, 5, 1, 11, 50, 0).unwrap();
    let edited = Utc.with_ymd_and_hms(2024, 5, 1, 11, 58, 0).unwrap();
    let ahead = Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap();

    assert_eq!(flow::report_time(sent, None, now), sent);
    assert_eq!(flow::report_time(sent, Some(edited), now), edited);
    assert_eq!(flow::report_time(sent, Some(ahead), now), now);
    assert_eq!(flow::report_time(ahead, None, now), now);
}

/// Bot pointed at a local Bot API stand-in that records called methods
async fn recording_bot() -> (Bot, Arc<Mutex<Vec<String>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = calls.clone();
    let app = axum::Router::new().fallback(move |uri: axum::http::Uri| {
        let recorded = recorded.clone();
        async move {
            let method = uri.path().rsplit('/').next().unwrap_or_default();
            recorded.lock().unwrap().push(method.to_ascii_lowercase());
            axum::Json(serde_json::json!({ "ok": true, "result": true }))
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let bot = Bot::new("123:token").set_api_url(format!("http://{}/", addr).parse().unwrap());
    (bot, calls)
}

fn callback_query(data: Option<&str>) -> CallbackQuery {
    serde_json::from_value(serde_json::json!({
        "id": "cb-1",
        "from": { "id": 7, "is_bot": false, "first_name": "Dana" },
        "chat_instance": "ci-1",
        "data": data,
    }))
    .unwrap()
}

#[tokio::test]
async fn test_every_callback_is_answered() {
    let (bot, calls) = recording_bot().await;

    for data in [Some("loc_abc"), Some("approve:1"), None] {
        TelegramAdapter::handle_callback(bot.clone(), callback_query(data))
            .await
            .unwrap();
    }

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|method| method == "answercallbackquery"));
}
