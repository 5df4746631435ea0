//! Top-level API
//!
//! [`Ynca`] connects to a receiver, finds out which subunits it has and
//! initializes each of them.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use ynca_client::Ynca;
//! use ynca_function::subunits::zone;
//!
//! # async fn run() -> ynca_core::YncaResult<()> {
//! let mut ynca = Ynca::builder("socket://192.168.1.50:50000")
//!     .on_disconnect(|| eprintln!("receiver went away"))
//!     .build()?;
//! ynca.initialize().await?;
//!
//! if let Some(main) = ynca.main() {
//!     println!("Volume: {:?}", main.get(&zone::VOL)?);
//! }
//!
//! ynca.close().await;
//! # Ok(())
//! # }
//! ```

use crate::connection::{
    Connection, ConnectionBuilder, ConnectionSettings, LogEntry, builder::DisconnectNotifier,
};
use crate::subunit::Subunit;
use crate::sync::{InitSettings, wait_for_marker};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use ynca_core::protocol::{AVAILABLE_FUNCTION, SYNC_FUNCTION, SYNC_SUBUNIT};
use ynca_core::{Message, Status, SubunitId, YncaError, YncaResult};
use ynca_transport::TransportLayer;

/// Builder for [`Ynca`]
pub struct YncaBuilder {
    connection: ConnectionBuilder,
    init: InitSettings,
}

impl YncaBuilder {
    pub fn new(address: &str) -> Self {
        Self {
            connection: ConnectionBuilder::new().address(address),
            init: InitSettings::default(),
        }
    }

    /// Use a ready-made transport instead of the address
    pub fn transport(mut self, transport: Box<dyn TransportLayer>) -> Self {
        self.connection = self.connection.transport(transport);
        self
    }

    pub fn connection_settings(mut self, settings: ConnectionSettings) -> Self {
        self.connection = self.connection.settings(settings);
        self
    }

    pub fn init_settings(mut self, init: InitSettings) -> Self {
        self.init = init;
        self
    }

    pub fn communication_log_size(mut self, size: usize) -> Self {
        self.connection = self.connection.communication_log_size(size);
        self
    }

    pub fn on_disconnect<F>(mut self, notifier: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.connection = self.connection.on_disconnect(notifier);
        self
    }

    /// Resolve the address; nothing is opened yet
    ///
    /// # Errors
    /// - `YncaError::InvalidAddress` if the address cannot be parsed
    /// - `YncaError::Usage` if the init margin factor is not a finite number
    ///   of at least 1
    pub fn build(self) -> YncaResult<Ynca> {
        if !self.init.is_valid() {
            return Err(YncaError::Usage(format!(
                "Init margin factor must be a finite number of at least 1, got {}",
                self.init.margin_factor
            )));
        }
        let (transport, settings, disconnect_notifier) = self.connection.into_parts()?;
        Ok(Ynca {
            transport,
            settings,
            disconnect_notifier,
            init: self.init,
            connection: None,
            subunits: BTreeMap::new(),
        })
    }
}

/// A receiver and its subunits
pub struct Ynca {
    transport: Box<dyn TransportLayer>,
    settings: ConnectionSettings,
    disconnect_notifier: Option<DisconnectNotifier>,
    init: InitSettings,
    connection: Option<Connection>,
    subunits: BTreeMap<SubunitId, Subunit>,
}

impl Ynca {
    pub fn builder(address: &str) -> YncaBuilder {
        YncaBuilder::new(address)
    }

    /// Connect, discover the present subunits and initialize them
    ///
    /// On failure everything created so far is closed again and the call
    /// may be retried.
    ///
    /// # Errors
    /// - `YncaError::Usage` if already initialized
    /// - `YncaError::Connection` / `YncaError::ConnectionFailed` if the link
    ///   cannot be set up
    /// - `YncaError::InitializationFailed` if discovery or a subunit does not
    ///   synchronize in time
    pub async fn initialize(&mut self) -> YncaResult<()> {
        if self.connection.is_some() {
            return Err(YncaError::Usage("Ynca is already initialized".to_string()));
        }

        let connection = Connection::open(
            self.transport.as_mut(),
            self.settings.clone(),
            self.disconnect_notifier.clone(),
        )
        .await?;

        match self.setup_subunits(&connection).await {
            Ok(subunits) => {
                info!(
                    "Initialized {} with subunits {:?}",
                    connection.description(),
                    subunits.keys().collect::<Vec<_>>()
                );
                self.subunits = subunits;
                self.connection = Some(connection);
                Ok(())
            }
            Err(e) => {
                warn!("Initialization of {} failed: {}", connection.description(), e);
                connection.close().await;
                Err(e)
            }
        }
    }

    async fn setup_subunits(
        &self,
        connection: &Connection,
    ) -> YncaResult<BTreeMap<SubunitId, Subunit>> {
        let present = discover(connection, &self.init).await?;

        let mut subunits: BTreeMap<SubunitId, Subunit> = BTreeMap::new();
        for id in present {
            let subunit = Subunit::new(id, connection.clone(), self.init);
            if let Err(e) = subunit.initialize().await {
                subunit.close();
                for created in subunits.values() {
                    created.close();
                }
                return Err(e);
            }
            subunits.insert(id, subunit);
        }
        Ok(subunits)
    }

    pub fn is_initialized(&self) -> bool {
        self.connection.is_some()
    }

    pub fn subunit(&self, id: SubunitId) -> Option<&Subunit> {
        self.subunits.get(&id)
    }

    /// Present subunits, ordered by id
    pub fn subunits(&self) -> impl Iterator<Item = &Subunit> {
        self.subunits.values()
    }

    pub fn sys(&self) -> Option<&Subunit> {
        self.subunit(SubunitId::Sys)
    }

    pub fn main(&self) -> Option<&Subunit> {
        self.subunit(SubunitId::Main)
    }

    pub fn zone2(&self) -> Option<&Subunit> {
        self.subunit(SubunitId::Zone2)
    }

    pub fn zone3(&self) -> Option<&Subunit> {
        self.subunit(SubunitId::Zone3)
    }

    pub fn zone4(&self) -> Option<&Subunit> {
        self.subunit(SubunitId::Zone4)
    }

    pub fn tun(&self) -> Option<&Subunit> {
        self.subunit(SubunitId::Tun)
    }

    pub fn dab(&self) -> Option<&Subunit> {
        self.subunit(SubunitId::Dab)
    }

    pub fn netradio(&self) -> Option<&Subunit> {
        self.subunit(SubunitId::NetRadio)
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Snapshot of the diagnostic log; empty before initialization
    pub fn communication_log(&self) -> Vec<LogEntry> {
        self.connection
            .as_ref()
            .map(Connection::communication_log)
            .unwrap_or_default()
    }

    /// Close all subunits and the connection; safe to call repeatedly
    pub async fn close(&mut self) {
        for subunit in self.subunits.values() {
            subunit.close();
        }
        self.subunits.clear();
        if let Some(connection) = self.connection.take() {
            connection.close().await;
        }
    }
}

impl fmt::Debug for Ynca {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ynca")
            .field("transport", &self.transport.description())
            .field("connection", &self.connection)
            .field("subunits", &self.subunits.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Find the subunits that answer the availability query
///
/// `SYS` never answers it and is always part of the result.
pub(crate) async fn discover(
    connection: &Connection,
    init: &InitSettings,
) -> YncaResult<BTreeSet<SubunitId>> {
    let found = Arc::new(Mutex::new(BTreeSet::new()));
    let (tx, rx) = oneshot::channel();
    let marker = Mutex::new(Some(tx));

    let listener = {
        let found = Arc::clone(&found);
        connection.register_listener(move |message: &Message| {
            if message.status == Status::Ok
                && message.function.as_deref() == Some(AVAILABLE_FUNCTION)
            {
                if let Some(id) = message
                    .subunit
                    .as_deref()
                    .and_then(|s| SubunitId::from_string(s).ok())
                {
                    found.lock().insert(id);
                }
            }
            if message.is_sync_marker() {
                if let Some(tx) = marker.lock().take() {
                    let _ = tx.send(());
                }
            }
        })
    };

    let result = sweep(connection, init, rx).await;
    connection.unregister_listener(listener);
    result?;

    let mut present = found.lock().clone();
    present.insert(SubunitId::Sys);
    info!("Discovered subunits {:?}", present);
    Ok(present)
}

async fn sweep(
    connection: &Connection,
    init: &InitSettings,
    marker: oneshot::Receiver<()>,
) -> YncaResult<()> {
    let link = connection.link_state();
    let start = connection.commands_sent();

    for id in SubunitId::ALL {
        if id != SubunitId::Sys {
            connection.get(id.as_str(), AVAILABLE_FUNCTION)?;
        }
    }
    connection.get(SYNC_SUBUNIT, SYNC_FUNCTION)?;

    let issued = connection.commands_sent().saturating_sub(start);
    let timeout: Duration = init.timeout_for(issued, connection.settings().command_spacing);
    debug!("Discovery: {} requests queued, waiting up to {:?}", issued, timeout);

    wait_for_marker(marker, link, timeout, "Discovery").await
}
