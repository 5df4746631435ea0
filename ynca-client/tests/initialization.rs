mod common;

use common::{DeviceHandle, FakeDevice, wait_until};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};
use ynca_client::{InitSettings, Subunit, Ynca};
use ynca_core::{SubunitId, YncaError};
use ynca_function::enums::{InitVolLvlState, Input, Pwr, Scene};
use ynca_function::subunits::zone::InitVolLvl;
use ynca_function::subunits::{media, sys, tun, zone};

fn ynca_for(device: FakeDevice) -> (Ynca, DeviceHandle) {
    let (transport, handle) = device.spawn();
    let ynca = Ynca::builder("socket://127.0.0.1:50000")
        .transport(Box::new(transport))
        .build()
        .unwrap();
    (ynca, handle)
}

async fn initialized_receiver() -> (Ynca, DeviceHandle) {
    let (mut ynca, device) = ynca_for(FakeDevice::receiver());
    assert_ok!(ynca.initialize().await);
    (ynca, device)
}

#[tokio::test(start_paused = true)]
async fn test_silent_receiver_fails_initialization() {
    let (mut ynca, _device) = ynca_for(FakeDevice::silent());

    let result = ynca.initialize().await;
    assert!(matches!(result, Err(YncaError::InitializationFailed(_))));
    assert!(!ynca.is_initialized());
    assert_eq!(ynca.subunits().count(), 0);
    assert!(ynca.connection().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_subunit_failure_rolls_back_created_subunits() {
    // Discovery and SYS get their marker, MAIN never does
    let device = FakeDevice::new()
        .respond("@MAIN:AVAIL=?", &["@MAIN:AVAIL=Ready"])
        .answer_times("@SYS:VERSION=?", 2);
    let (mut ynca, device) = ynca_for(device);

    let result = ynca.initialize().await;
    assert!(
        matches!(&result, Err(YncaError::InitializationFailed(msg)) if msg.contains("MAIN")),
        "unexpected result {:?}",
        result
    );
    assert_eq!(device.count("@SYS:PWR=?"), 1);
    assert_eq!(device.count("@MAIN:PWR=?"), 1);
    assert!(!ynca.is_initialized());
    assert_eq!(ynca.subunits().count(), 0);
    assert!(ynca.sys().is_none());
    assert!(ynca.connection().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_link_drop_fails_subunit_initialization_at_once() {
    let (mut ynca, _device) = ynca_for(FakeDevice::receiver().hang_up_on("@SYS:VERSION=?", 2));

    let start = Instant::now();
    let result = ynca.initialize().await;
    assert!(
        matches!(&result, Err(YncaError::InitializationFailed(msg)) if msg.contains("connection lost")),
        "unexpected result {:?}",
        result
    );
    // SYS alone would wait 4.5 s after a 2.7 s discovery
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(ynca.subunits().count(), 0);
    assert!(ynca.connection().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_discovers_and_initializes_present_subunits() {
    let (mut ynca, device) = initialized_receiver().await;

    let present: BTreeSet<SubunitId> = ynca.subunits().map(Subunit::id).collect();
    assert_eq!(
        present,
        BTreeSet::from([SubunitId::Sys, SubunitId::Main, SubunitId::NetRadio])
    );
    assert!(ynca.subunits().all(Subunit::is_initialized));
    assert!(ynca.tun().is_none());

    let main = ynca.main().unwrap();
    assert_eq!(assert_ok!(main.get(&zone::PWR)), Some(Pwr::On));
    assert_eq!(assert_ok!(main.get(&zone::VOL)), Some(-30.5));
    assert_eq!(assert_ok!(main.get(&zone::INP)), Some(Input::NetRadio));
    assert_eq!(
        assert_ok!(main.get(&zone::INITVOLLVL)),
        Some(InitVolLvl::State(InitVolLvlState::Mute))
    );
    // Answered with @UNDEFINED
    assert_eq!(assert_ok!(main.get(&zone::MUTE)), None);

    let system = ynca.sys().unwrap();
    assert_eq!(
        assert_ok!(system.get(&sys::MODELNAME)),
        Some(common::MODEL_NAME.to_string())
    );
    assert_eq!(
        assert_ok!(system.get(&sys::INPNAMEHDMI1)),
        Some("Blu-ray".to_string())
    );
    assert_eq!(assert_ok!(system.get_raw("INPNAMEAV1")), Some("Console".to_string()));

    let netradio = ynca.netradio().unwrap();
    assert_eq!(
        assert_ok!(netradio.get(&media::SONG)),
        Some("Some Song".to_string())
    );
    assert_eq!(assert_ok!(netradio.get(&media::ALBUM)), Some(String::new()));

    // Shared initializer is requested once
    assert_eq!(device.count("@NETRADIO:METAINFO=?"), 1);
    assert_eq!(device.count("@SYS:INPNAME=?"), 1);
    // Subunits that are not present are probed but never initialized
    assert_eq!(device.count("@TUN:AVAIL=?"), 1);
    assert_eq!(device.count("@TUN:BAND=?"), 0);

    ynca.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_initialize_twice_is_a_usage_error() {
    let (mut ynca, _device) = initialized_receiver().await;

    let result = ynca.initialize().await;
    assert!(matches!(result, Err(YncaError::Usage(_))));
    assert!(ynca.is_initialized());

    let main = ynca.main().unwrap();
    let result = main.initialize().await;
    assert!(matches!(result, Err(YncaError::Usage(_))));

    ynca.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_direction_and_membership_are_checked() {
    let (mut ynca, _device) = initialized_receiver().await;
    let main = ynca.main().unwrap();
    let netradio = ynca.netradio().unwrap();

    assert!(matches!(main.get(&zone::SCENE), Err(YncaError::Usage(_))));
    assert!(matches!(
        netradio.set(&media::SONG, "Other Song".to_string()),
        Err(YncaError::Usage(_))
    ));
    assert!(matches!(main.get(&tun::BAND), Err(YncaError::Usage(_))));
    assert!(matches!(main.get_raw("NOSUCHFUNCTION"), Err(YncaError::Usage(_))));
    assert_err!(main.set_raw("VOL", "loud"));

    ynca.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_set_sends_converted_value() {
    let (mut ynca, device) = initialized_receiver().await;
    let main = ynca.main().unwrap();

    assert_ok!(main.set(&zone::VOL, -20.0));
    assert_ok!(main.set(&zone::SCENE, Scene::Scene2));
    assert_ok!(main.set_raw("MUTE", "On"));

    wait_until(|| device.count("@MAIN:MUTE=On") == 1).await;
    assert_eq!(device.count("@MAIN:VOL=-20.0"), 1);
    assert_eq!(device.count("@MAIN:SCENE=Scene 2"), 1);

    // Fire-and-forget: the cache waits for the receiver's report
    assert_eq!(assert_ok!(main.get(&zone::VOL)), Some(-30.5));

    ynca.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_update_callbacks_after_initialization() {
    let (mut ynca, device) = initialized_receiver().await;
    let main = ynca.main().unwrap();

    let updates = Arc::new(Mutex::new(Vec::new()));
    let callback = {
        let updates = Arc::clone(&updates);
        main.register_update_callback(move |function, value| {
            updates.lock().push((function.to_string(), value.to_string()));
        })
    };

    device.send("@MAIN:VOL=-25.0");
    device.send("@ZONE2:VOL=-10.0");
    device.send("@MAIN:PWR=Standby");
    wait_until(|| updates.lock().len() == 2).await;

    assert_eq!(
        *updates.lock(),
        vec![
            ("VOL".to_string(), "-25.0".to_string()),
            ("PWR".to_string(), "Standby".to_string()),
        ]
    );
    assert_eq!(assert_ok!(main.get(&zone::VOL)), Some(-25.0));

    assert!(main.unregister_update_callback(callback));
    device.send("@MAIN:VOL=-26.0");
    wait_until(|| main.get(&zone::VOL).ok().flatten() == Some(-26.0)).await;
    assert_eq!(updates.lock().len(), 2);

    ynca.close().await;
}

#[test]
fn test_builder_rejects_invalid_margin_factor() {
    for margin_factor in [-1.0, f64::NAN, 0.0] {
        let result = Ynca::builder("socket://127.0.0.1:50000")
            .init_settings(InitSettings {
                margin_factor,
                ..InitSettings::default()
            })
            .build();
        assert!(matches!(result, Err(YncaError::Usage(_))));
    }
}

#[tokio::test(start_paused = true)]
async fn test_reinitialize_after_close_opens_transport_again() {
    let (transport, device) = FakeDevice::receiver().spawn();
    let mut ynca = Ynca::builder("socket://127.0.0.1:50000")
        .transport(Box::new(transport))
        .init_settings(InitSettings::default())
        .build()
        .unwrap();

    assert_ok!(ynca.initialize().await);
    ynca.close().await;
    assert!(!ynca.is_initialized());

    // The duplex stream is single use
    let result = ynca.initialize().await;
    assert!(matches!(result, Err(YncaError::Connection(_))));
    assert!(!ynca.is_initialized());
    drop(device);
}
