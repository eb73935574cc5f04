mod common;

use common::MockTransport;
use enovates::charger::Charger;
use enovates::driver::{DriverSettings, EnovatesDriver};
use std::sync::Arc;
use std::time::Duration;

fn driver(mock: &Arc<MockTransport>) -> EnovatesDriver {
    EnovatesDriver::new(mock.clone(), &|| true, DriverSettings::default()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn polls_status_every_thirty_seconds() {
    let mock = Arc::new(MockTransport::new());
    let d = driver(&mock);

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(mock.reads_at(301), 0);

    tokio::time::sleep(Duration::from_secs(66)).await;
    assert_eq!(mock.reads_at(301), 3);
    assert!(mock.reads().iter().all(|r| *r == (301, 1)));
    assert!(mock.writes().is_empty());

    d.close().await;
}

#[tokio::test(start_paused = true)]
async fn failed_polls_are_swallowed_and_retried() {
    let mock = Arc::new(MockTransport::new());
    mock.set_failing(true);
    let d = driver(&mock);

    tokio::time::sleep(Duration::from_secs(65)).await;
    assert_eq!(mock.reads_at(301), 2);
    assert!(d.keepalive_running());

    // Invalid mode 3 values are swallowed too
    mock.set_failing(false);
    mock.set(301, &[9]);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(mock.reads_at(301), 3);
    assert!(d.keepalive_running());

    d.close().await;
}

#[tokio::test(start_paused = true)]
async fn close_stops_polling() {
    let mock = Arc::new(MockTransport::new());
    let d = driver(&mock);

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(mock.reads_at(301), 1);

    d.close().await;
    assert!(!d.keepalive_running());

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(mock.reads_at(301), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_driver_stops_polling() {
    let mock = Arc::new(MockTransport::new());
    drop(driver(&mock));

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(mock.reads_at(301), 0);
}
