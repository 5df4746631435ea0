//! Scripted receiver on the far end of an in-memory duplex stream

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::sync::mpsc;
use tokio::time::Instant;
use ynca_core::{YncaError, YncaResult};
use ynca_transport::{TransportLayer, YncaStream};

pub const MODEL_NAME: &str = "RX-A1060";
pub const VERSION: &str = "1.80/2.01";

/// Transport handing out one end of a duplex stream
pub struct DuplexTransport {
    stream: Option<DuplexStream>,
}

#[async_trait]
impl TransportLayer for DuplexTransport {
    async fn open(&mut self) -> YncaResult<Box<dyn YncaStream>> {
        self.stream
            .take()
            .map(|s| Box::new(s) as Box<dyn YncaStream>)
            .ok_or_else(|| YncaError::not_connected("duplex stream already used"))
    }

    fn description(&self) -> String {
        "duplex".to_string()
    }
}

enum Control {
    Send(String),
    Disconnect,
}

/// Request/response script of the fake receiver
pub struct FakeDevice {
    responses: HashMap<String, Vec<String>>,
    limits: HashMap<String, usize>,
    hang_up: Option<(String, usize)>,
    silent: bool,
}

impl FakeDevice {
    /// Device answering the keep-alive and synchronization queries
    pub fn new() -> Self {
        let model = format!("@SYS:MODELNAME={}", MODEL_NAME);
        let version = format!("@SYS:VERSION={}", VERSION);
        Self {
            responses: HashMap::new(),
            limits: HashMap::new(),
            hang_up: None,
            silent: false,
        }
        .respond("@SYS:MODELNAME=?", &[model.as_str()])
        .respond("@SYS:VERSION=?", &[version.as_str()])
    }

    /// Device that never answers anything
    pub fn silent() -> Self {
        Self {
            responses: HashMap::new(),
            limits: HashMap::new(),
            hang_up: None,
            silent: true,
        }
    }

    /// Answer `request` with `lines`; unknown requests get `@UNDEFINED`
    pub fn respond(mut self, request: &str, lines: &[&str]) -> Self {
        self.responses.insert(
            request.to_string(),
            lines.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    /// Answer `request` only the first `times` times it arrives
    pub fn answer_times(mut self, request: &str, times: usize) -> Self {
        self.limits.insert(request.to_string(), times);
        self
    }

    /// Drop the link when `request` arrives for the `nth` time
    pub fn hang_up_on(mut self, request: &str, nth: usize) -> Self {
        self.hang_up = Some((request.to_string(), nth));
        self
    }

    /// A receiver with a main zone, net radio and a few system functions
    pub fn receiver() -> Self {
        Self::new()
            .respond("@MAIN:AVAIL=?", &["@MAIN:AVAIL=Ready"])
            .respond("@NETRADIO:AVAIL=?", &["@NETRADIO:AVAIL=Not Ready"])
            .respond("@SYS:PWR=?", &["@SYS:PWR=On"])
            .respond(
                "@SYS:INPNAME=?",
                &["@SYS:INPNAMEHDMI1=Blu-ray", "@SYS:INPNAMEAV1=Console"],
            )
            .respond("@MAIN:PWR=?", &["@MAIN:PWR=On"])
            .respond("@MAIN:VOL=?", &["@MAIN:VOL=-30.5"])
            .respond("@MAIN:INP=?", &["@MAIN:INP=NET RADIO"])
            .respond("@MAIN:INITVOLLVL=?", &["@MAIN:INITVOLLVL=Mute"])
            .respond("@NETRADIO:PLAYBACKINFO=?", &["@NETRADIO:PLAYBACKINFO=Play"])
            .respond(
                "@NETRADIO:METAINFO=?",
                &[
                    "@NETRADIO:STATION=Radio Paradise",
                    "@NETRADIO:ALBUM=",
                    "@NETRADIO:SONG=Some Song",
                ],
            )
    }

    /// Start the device task
    pub fn spawn(self) -> (DuplexTransport, DeviceHandle) {
        let (client, device) = tokio::io::duplex(64 * 1024);
        let received = Arc::new(Mutex::new(Vec::new()));
        let (control_tx, control_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_device(device, self, Arc::clone(&received), control_rx));

        (
            DuplexTransport {
                stream: Some(client),
            },
            DeviceHandle {
                received,
                control: control_tx,
            },
        )
    }
}

async fn run_device(
    stream: DuplexStream,
    script: FakeDevice,
    received: Arc<Mutex<Vec<(Instant, String)>>>,
    mut control: mpsc::UnboundedReceiver<Control>,
) {
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();
    let mut seen: HashMap<String, usize> = HashMap::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                received.lock().push((Instant::now(), line.clone()));
                let count = {
                    let seen = seen.entry(line.clone()).or_insert(0);
                    *seen += 1;
                    *seen
                };
                if script.hang_up.as_ref().is_some_and(|(req, nth)| *req == line && *nth == count) {
                    break;
                }
                let exhausted = script.limits.get(&line).is_some_and(|limit| count > *limit);
                if script.silent || exhausted {
                    continue;
                }
                let reply = script
                    .responses
                    .get(&line)
                    .cloned()
                    .unwrap_or_else(|| vec!["@UNDEFINED".to_string()]);
                for reply_line in reply {
                    if writer.write_all(format!("{}\r\n", reply_line).as_bytes()).await.is_err() {
                        return;
                    }
                }
            }
            control = control.recv() => match control {
                Some(Control::Send(line)) => {
                    if writer.write_all(format!("{}\r\n", line).as_bytes()).await.is_err() {
                        return;
                    }
                }
                Some(Control::Disconnect) | None => break,
            },
        }
    }
}

/// Test side of the fake device
pub struct DeviceHandle {
    received: Arc<Mutex<Vec<(Instant, String)>>>,
    control: mpsc::UnboundedSender<Control>,
}

impl DeviceHandle {
    /// Lines received so far, in order
    pub fn received(&self) -> Vec<String> {
        self.received.lock().iter().map(|(_, l)| l.clone()).collect()
    }

    /// Arrival times of received lines
    pub fn arrival_times(&self) -> Vec<Instant> {
        self.received.lock().iter().map(|(t, _)| *t).collect()
    }

    pub fn count(&self, line: &str) -> usize {
        self.received.lock().iter().filter(|(_, l)| l == line).count()
    }

    /// Send an unsolicited line to the client
    pub fn send(&self, line: &str) {
        let _ = self.control.send(Control::Send(line.to_string()));
    }

    /// Drop the link from the device side
    pub fn disconnect(&self) {
        let _ = self.control.send(Control::Disconnect);
    }

    pub async fn wait_for_lines(&self, n: usize) {
        wait_until(|| self.received.lock().len() >= n).await;
    }
}

/// Poll `condition` every 10 ms of (possibly paused) tokio time
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}
