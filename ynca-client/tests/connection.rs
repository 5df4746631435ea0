mod common;

use common::{DeviceHandle, FakeDevice, MODEL_NAME, wait_until};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_test::assert_ok;
use ynca_client::{Connection, ConnectionBuilder, Direction, LinkState};
use ynca_core::{Message, Status};

const KEEP_ALIVE: &str = "@SYS:MODELNAME=?";

async fn connect(device: FakeDevice) -> (Connection, DeviceHandle) {
    let (transport, handle) = device.spawn();
    let conn = ConnectionBuilder::new()
        .transport(Box::new(transport))
        .communication_log_size(16)
        .connect()
        .await
        .unwrap();
    (conn, handle)
}

fn collect_messages(conn: &Connection) -> Arc<Mutex<Vec<Message>>> {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    conn.register_listener(move |msg: &Message| sink.lock().push(msg.clone()));
    messages
}

#[tokio::test(start_paused = true)]
async fn test_two_keep_alives_on_connect() {
    let (conn, device) = connect(FakeDevice::new()).await;
    device.wait_for_lines(2).await;
    assert_eq!(device.received(), vec![KEEP_ALIVE, KEEP_ALIVE]);
    // Probes are not counted as commands
    assert_eq!(conn.commands_sent(), 0);
    conn.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_commands_are_spaced() {
    let (conn, device) = connect(FakeDevice::new()).await;

    for function in ["PWR", "VOL", "MUTE", "INP", "SOUNDPRG"] {
        assert_ok!(conn.get("MAIN", function));
    }
    assert_eq!(conn.commands_sent(), 5);

    device.wait_for_lines(7).await;
    let received = device.received();
    assert_eq!(received[2], "@MAIN:PWR=?");
    assert_eq!(received[6], "@MAIN:SOUNDPRG=?");

    let times = device.arrival_times();
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(100));
    }
    conn.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_keep_alive_after_idle_interval() {
    let (conn, device) = connect(FakeDevice::new()).await;
    let messages = collect_messages(&conn);

    device.wait_for_lines(2).await;
    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(device.count(KEEP_ALIVE), 2);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(device.count(KEEP_ALIVE), 3);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(
        messages.lock().is_empty(),
        "keep-alive responses must not reach listeners"
    );
    conn.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_manual_model_query_is_delivered() {
    let (conn, device) = connect(FakeDevice::new()).await;
    device.wait_for_lines(2).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let messages = collect_messages(&conn);
    assert_ok!(conn.get("SYS", "MODELNAME"));
    wait_until(|| !messages.lock().is_empty()).await;

    assert_eq!(
        messages.lock()[0],
        Message::new("SYS", "MODELNAME", MODEL_NAME)
    );
    conn.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_unsolicited_update_before_keep_alive_response() {
    let (conn, device) = connect(FakeDevice::new()).await;
    let messages = collect_messages(&conn);

    device.send("@MAIN:PWR=On");
    device.wait_for_lines(2).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(*messages.lock(), vec![Message::new("MAIN", "PWR", "On")]);
    conn.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_pending_keep_alive_survives_other_lines() {
    let (conn, device) = connect(FakeDevice::silent()).await;
    let messages = collect_messages(&conn);
    let model_line = format!("@SYS:MODELNAME={}", MODEL_NAME);

    device.wait_for_lines(2).await;
    // Both probes are unanswered; an unrelated line arrives first
    device.send("@MAIN:VOL=-20.0");
    device.send(&model_line);
    device.send("@MAIN:MUTE=Off");
    wait_until(|| messages.lock().len() == 2).await;
    assert_eq!(
        *messages.lock(),
        vec![
            Message::new("MAIN", "VOL", "-20.0"),
            Message::new("MAIN", "MUTE", "Off"),
        ]
    );

    // A manual query owns the next response
    assert_ok!(conn.get("SYS", "MODELNAME"));
    device.wait_for_lines(3).await;
    device.send(&model_line);
    wait_until(|| messages.lock().len() == 3).await;
    assert!(messages.lock()[2].is_keep_alive_response());
    conn.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_listeners_each_receive_every_message() {
    let (conn, device) = connect(FakeDevice::new()).await;
    device.wait_for_lines(2).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let order = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second"] {
        let order = Arc::clone(&order);
        conn.register_listener(move |msg: &Message| {
            order.lock().push((name, msg.value.clone()));
        });
    }

    device.send("@MAIN:PWR=On");
    device.send("@UNDEFINED");
    device.send("@MAIN:VOL=-40.0");
    wait_until(|| order.lock().len() == 6).await;

    let order = order.lock().clone();
    assert_eq!(
        order,
        vec![
            ("first", Some("On".to_string())),
            ("second", Some("On".to_string())),
            ("first", None),
            ("second", None),
            ("first", Some("-40.0".to_string())),
            ("second", Some("-40.0".to_string())),
        ]
    );
    conn.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_unregister_listener_and_error_status_delivery() {
    let (conn, device) = connect(FakeDevice::new()).await;
    device.wait_for_lines(2).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let messages = collect_messages(&conn);
    let other = collect_messages(&conn);

    device.send("@MAIN:PWR=On");
    wait_until(|| messages.lock().len() == 1 && other.lock().len() == 1).await;

    let id = conn.register_listener(|_: &Message| {});
    assert!(conn.unregister_listener(id));
    assert!(!conn.unregister_listener(id));

    device.send("@RESTRICTED");
    wait_until(|| messages.lock().len() == 2).await;
    assert_eq!(messages.lock()[1].status, Status::Restricted);
    conn.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_close_is_idempotent_and_silent() {
    let disconnects = Arc::new(AtomicUsize::new(0));
    let (transport, device) = FakeDevice::new().spawn();
    let conn = {
        let disconnects = Arc::clone(&disconnects);
        ConnectionBuilder::new()
            .transport(Box::new(transport))
            .on_disconnect(move || {
                disconnects.fetch_add(1, Ordering::SeqCst);
            })
            .connect()
            .await
            .unwrap()
    };
    device.wait_for_lines(2).await;

    conn.close().await;
    conn.close().await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(*conn.link_state().borrow(), LinkState::Closed);
    assert_eq!(disconnects.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_device_disconnect_notifies_once() {
    let disconnects = Arc::new(AtomicUsize::new(0));
    let (transport, device) = FakeDevice::new().spawn();
    let conn = {
        let disconnects = Arc::clone(&disconnects);
        ConnectionBuilder::new()
            .transport(Box::new(transport))
            .on_disconnect(move || {
                disconnects.fetch_add(1, Ordering::SeqCst);
            })
            .connect()
            .await
            .unwrap()
    };
    device.wait_for_lines(2).await;

    device.disconnect();
    wait_until(|| !conn.is_connected()).await;
    assert_eq!(*conn.link_state().borrow(), LinkState::Disconnected);

    conn.close().await;
    conn.close().await;
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_communication_log_records_both_directions() {
    let (conn, device) = connect(FakeDevice::new()).await;
    device.wait_for_lines(2).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let log = conn.communication_log();
    assert!(
        log.iter()
            .any(|e| e.direction == Direction::Sent && e.line == KEEP_ALIVE)
    );
    assert!(
        log.iter()
            .any(|e| e.direction == Direction::Received && e.line.starts_with("@SYS:MODELNAME="))
    );
    conn.close().await;
}
