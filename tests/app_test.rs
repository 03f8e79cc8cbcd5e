mod common;

use common::{jio_row, numbers, ScriptedTransport, Step};
use mnp_checker::error::InputError;
use mnp_checker::{App, AppError, Config};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn test_config(dir: &tempfile::TempDir) -> Config {
    Config {
        output_log_file: dir.path().join("run.txt").to_string_lossy().to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_start_requires_credential() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::initialize(test_config(&dir)).unwrap();

    let err = assert_err!(app.start("   ", "9100000001").await);
    assert!(matches!(err, AppError::Input(InputError::MissingCredential)));
}

#[tokio::test]
async fn test_start_requires_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::initialize(test_config(&dir)).unwrap();

    let err = assert_err!(app.start("cookie", " ,\n , ").await);
    assert!(matches!(err, AppError::Input(InputError::NoNumbers)));
    assert!(!app.is_running());
}

#[tokio::test]
async fn test_initialize_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        min_cooldown: 9.0,
        max_cooldown: 1.0,
        ..test_config(&dir)
    };
    assert!(matches!(App::initialize(config), Err(AppError::Config(_))));
}

#[tokio::test(start_paused = true)]
async fn test_run_collects_rows_and_writes_log() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let log_path = config.output_log_file.clone();
    let app = App::initialize(config).unwrap();

    let transport = ScriptedTransport::new()
        .script("9100000001", vec![Step::missing(), Step::ok_rows(&jio_row("9100000001"))])
        .script("9100000002", vec![Step::status(503, "")]);

    let report = assert_ok!(
        app.run_with(transport, numbers(&["9100000001", "9100000002"]))
            .await
    );

    assert!(!report.cancelled);
    assert_eq!(report.total, 2);
    assert_eq!(report.success_count(), 1);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].attempt, 2);
    assert_eq!(report.rows[1].operator, "Error 503");

    let log = std::fs::read_to_string(log_path).unwrap();
    assert!(log.contains("Checking 1/2 Attempt 1: 9100000001"));
    assert!(log.contains("No JSON found for number 9100000001"));
    assert!(log.contains("Checking 1/2 Attempt 2: 9100000001"));
    assert!(log.contains("Failed request for number 9100000002 with status 503"));
    assert!(log.contains("Bulk search completed."));
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_running_batch() {
    let dir = tempfile::tempdir().unwrap();
    let app = Arc::new(App::initialize(test_config(&dir)).unwrap());

    let transport = ScriptedTransport::new().script("9100000001", vec![Step::missing()]);
    let runner = app.clone();
    let handle = tokio::spawn(async move {
        runner
            .run_with(transport, numbers(&["9100000001", "9100000002"]))
            .await
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(app.is_running());

    // 已有运行时再次启动会被拒绝
    let err = assert_err!(
        app.run_with(ScriptedTransport::new(), numbers(&["9100000003"]))
            .await
    );
    assert!(matches!(err, AppError::Input(InputError::AlreadyRunning)));

    app.stop();

    let report = assert_ok!(assert_ok!(handle.await));
    assert!(report.cancelled);
    assert!(report.results.is_empty());
    assert!(!app.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_run_begins_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let app = Arc::new(App::initialize(test_config(&dir)).unwrap());

    let transport = ScriptedTransport::new().script("9100000001", vec![Step::missing()]);
    let calls = transport.clone();
    let runner = app.clone();
    let handle = tokio::spawn(async move {
        runner
            .run_with(transport, numbers(&["9100000001"]))
            .await
    });

    // 后台任务尚未被调度
    app.stop();

    let report = assert_ok!(assert_ok!(handle.await));
    assert!(report.cancelled);
    assert!(report.results.is_empty());
    assert!(calls.calls().is_empty());
    assert!(!app.is_running());

    // 下一次运行使用新的取消信号
    let transport = ScriptedTransport::new()
        .script("9100000002", vec![Step::ok_rows(&jio_row("9100000002"))]);
    let report = assert_ok!(app.run_with(transport, numbers(&["9100000002"])).await);
    assert!(!report.cancelled);
    assert_eq!(report.success_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_run_stops_worker_and_frees_app() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::initialize(test_config(&dir)).unwrap();

    let transport = ScriptedTransport::new().script("9100000001", vec![Step::missing()]);
    let calls = transport.clone();

    let outcome = tokio::time::timeout(
        Duration::from_secs(1),
        app.run_with(transport, numbers(&["9100000001"])),
    )
    .await;
    assert!(outcome.is_err());
    assert!(!app.is_running());

    let calls_at_drop = calls.calls().len();
    assert_eq!(calls_at_drop, 1);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(calls.calls().len(), calls_at_drop);

    let transport = ScriptedTransport::new()
        .script("9100000002", vec![Step::ok_rows(&jio_row("9100000002"))]);
    let report = assert_ok!(app.run_with(transport, numbers(&["9100000002"])).await);
    assert!(!report.cancelled);
    assert_eq!(report.success_count(), 1);
}
