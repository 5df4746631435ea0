//! Subunit engine
//!
//! One [`Subunit`] per present subunit of the receiver. It listens to every
//! message on the connection, keeps the last raw value of each function in
//! its schema and converts values on access.

use crate::connection::{Connection, ListenerId};
use crate::sync::{InitSettings, wait_for_marker};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::oneshot;
use ynca_core::protocol::{SYNC_FUNCTION, SYNC_SUBUNIT};
use ynca_core::{Message, Status, SubunitId, YncaError, YncaResult};
use ynca_function::{Converter, Function, FunctionSpec, SubunitSchema, schema_for};

/// Called with the function name and new raw value after every update
pub type UpdateCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Handle returned by update callback registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// State touched by the connection's reader task
struct State {
    id: SubunitId,
    schema: &'static SubunitSchema,
    cache: RwLock<HashMap<&'static str, String>>,
    callbacks: RwLock<Vec<(CallbackId, UpdateCallback)>>,
    next_callback: AtomicU64,
    initialized: AtomicBool,
    sync: Mutex<Option<oneshot::Sender<()>>>,
}

impl State {
    fn new(id: SubunitId) -> Self {
        Self {
            id,
            schema: schema_for(id),
            cache: RwLock::new(HashMap::new()),
            callbacks: RwLock::new(Vec::new()),
            next_callback: AtomicU64::new(0),
            initialized: AtomicBool::new(false),
            sync: Mutex::new(None),
        }
    }

    fn on_message(&self, message: &Message) {
        self.apply(message);

        // The marker is a timing pulse for every subunit, whoever it is addressed to
        if message.is_sync_marker() {
            if let Some(tx) = self.sync.lock().take() {
                let _ = tx.send(());
            }
        }
    }

    fn apply(&self, message: &Message) {
        // Failed requests are not echoed, so errors cannot be attributed
        if message.status != Status::Ok || message.subunit.as_deref() != Some(self.id.as_str()) {
            return;
        }
        let (Some(function), Some(value)) = (message.function.as_deref(), message.value.as_deref())
        else {
            return;
        };

        let Some(spec) = self.readable(function) else {
            debug!("{}: ignoring unknown function {}", self.id, function);
            return;
        };
        if let Err(e) = spec.validate(value) {
            warn!("{}: ignoring {}={:?}: {}", self.id, function, value, e);
            return;
        }

        let name = spec.descriptor().name();
        self.cache.write().insert(name, value.to_string());

        if self.initialized.load(Ordering::SeqCst) {
            let callbacks: Vec<UpdateCallback> = self
                .callbacks
                .read()
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect();
            for callback in callbacks {
                callback(name, value);
            }
        }
    }

    fn readable(&self, function: &str) -> Option<&'static dyn FunctionSpec> {
        self.schema.functions().iter().copied().find(|f| {
            let descriptor = f.descriptor();
            descriptor.name() == function && descriptor.cmd().can_get()
        })
    }
}

/// One logical subunit of the receiver
///
/// # Usage Example
///
/// ```rust,no_run
/// use ynca_client::{Subunit, InitSettings};
/// use ynca_core::SubunitId;
/// use ynca_function::subunits::zone;
///
/// # async fn run(conn: ynca_client::Connection) -> ynca_core::YncaResult<()> {
/// let main = Subunit::new(SubunitId::Main, conn, InitSettings::default());
/// main.initialize().await?;
///
/// if let Some(volume) = main.get(&zone::VOL)? {
///     main.set(&zone::VOL, volume + 1.0)?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct Subunit {
    state: Arc<State>,
    connection: Connection,
    listener: ListenerId,
    init: InitSettings,
}

impl Subunit {
    /// Create a subunit and start caching its messages
    pub fn new(id: SubunitId, connection: Connection, init: InitSettings) -> Self {
        let state = Arc::new(State::new(id));
        let weak = Arc::downgrade(&state);
        let listener = connection.register_listener(move |message: &Message| {
            if let Some(state) = weak.upgrade() {
                state.on_message(message);
            }
        });

        Self {
            state,
            connection,
            listener,
            init,
        }
    }

    pub fn id(&self) -> SubunitId {
        self.state.id
    }

    pub fn schema(&self) -> &'static SubunitSchema {
        self.state.schema
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized.load(Ordering::SeqCst)
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Request the initial value of every function and wait for the answers
    ///
    /// One GET is queued per distinct initializer, followed by the
    /// synchronization marker. Update callbacks fire only after this
    /// returns successfully.
    ///
    /// # Errors
    /// - `YncaError::Usage` if already initialized or initializing
    /// - `YncaError::InitializationFailed` if the marker is not seen in time
    ///   or the link drops
    /// - `YncaError::Connection` if the link is already down
    pub async fn initialize(&self) -> YncaResult<()> {
        if self.is_initialized() {
            return Err(YncaError::Usage(format!(
                "Subunit {} is already initialized",
                self.state.id
            )));
        }

        let marker = {
            let mut sync = self.state.sync.lock();
            if sync.is_some() {
                return Err(YncaError::Usage(format!(
                    "Subunit {} is already being initialized",
                    self.state.id
                )));
            }
            let (tx, rx) = oneshot::channel();
            *sync = Some(tx);
            rx
        };

        let result = self.request_initial_values(marker).await;
        self.state.sync.lock().take();
        result?;

        self.state.initialized.store(true, Ordering::SeqCst);
        info!("Subunit {} initialized", self.state.id);
        Ok(())
    }

    async fn request_initial_values(&self, marker: oneshot::Receiver<()>) -> YncaResult<()> {
        let id = self.state.id.as_str();
        let link = self.connection.link_state();
        let start = self.connection.commands_sent();

        for name in self.state.schema.initializers() {
            // The marker query itself answers VERSION
            if id == SYNC_SUBUNIT && name == SYNC_FUNCTION {
                continue;
            }
            self.connection.get(id, name)?;
        }
        self.connection.get(SYNC_SUBUNIT, SYNC_FUNCTION)?;

        let issued = self.connection.commands_sent().saturating_sub(start);
        let timeout = self
            .init
            .timeout_for(issued, self.connection.settings().command_spacing);
        debug!("Subunit {}: {} requests queued, waiting up to {:?}", id, issued, timeout);

        wait_for_marker(marker, link, timeout, &format!("Subunit {}", id)).await
    }

    /// Cached value of a function, `None` if nothing was received yet
    ///
    /// # Errors
    /// - `YncaError::Usage` if the function is write-only or not part of
    ///   this subunit
    /// - `YncaError::Conversion` if the cached value does not convert
    pub fn get<C: Converter>(&self, function: &Function<C>) -> YncaResult<Option<C::Value>> {
        self.check_member(function)?;
        self.check_readable(function.descriptor().name(), function.descriptor().cmd().can_get())?;

        let cache = self.state.cache.read();
        cache
            .get(function.name())
            .map(|raw| function.converter().to_value(raw))
            .transpose()
    }

    /// Send a new value for a function
    ///
    /// Fire-and-forget: the cache changes only when the receiver reports
    /// the new value.
    ///
    /// # Errors
    /// - `YncaError::Usage` if the function is read-only or not part of this
    ///   subunit
    /// - `YncaError::Conversion` if the value cannot be written
    pub fn set<C: Converter>(&self, function: &Function<C>, value: C::Value) -> YncaResult<()> {
        self.check_member(function)?;
        self.check_writable(function.name(), function.descriptor().cmd().can_put())?;

        let raw = function.converter().to_str(&value)?;
        self.connection.put(self.state.id.as_str(), function.name(), &raw)
    }

    /// Cached raw value, by protocol name or identifier alias
    pub fn get_raw(&self, key: &str) -> YncaResult<Option<String>> {
        let spec = self.lookup(key)?;
        let descriptor = spec.descriptor();
        self.check_readable(descriptor.name(), descriptor.cmd().can_get())?;
        Ok(self.state.cache.read().get(descriptor.name()).cloned())
    }

    /// Send a raw value, by protocol name or identifier alias
    ///
    /// The value must convert with the function's converter.
    pub fn set_raw(&self, key: &str, value: &str) -> YncaResult<()> {
        let spec = self
            .state
            .schema
            .functions()
            .iter()
            .copied()
            .find(|f| f.descriptor().matches(key) && f.descriptor().cmd().can_put())
            .map_or_else(|| self.lookup(key), Ok)?;
        let descriptor = spec.descriptor();
        self.check_writable(descriptor.name(), descriptor.cmd().can_put())?;
        spec.validate(value)?;
        self.connection.put(self.state.id.as_str(), descriptor.name(), value)
    }

    /// Drop a cached value
    pub fn forget(&self, key: &str) -> YncaResult<Option<String>> {
        let name = self.lookup(key)?.descriptor().name();
        Ok(self.state.cache.write().remove(name))
    }

    pub fn register_update_callback<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        let id = CallbackId(self.state.next_callback.fetch_add(1, Ordering::Relaxed));
        self.state.callbacks.write().push((id, Arc::new(callback)));
        id
    }

    pub fn unregister_update_callback(&self, id: CallbackId) -> bool {
        let mut callbacks = self.state.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(callback_id, _)| *callback_id != id);
        callbacks.len() != before
    }

    /// Stop listening to the connection and drop all update callbacks
    pub fn close(&self) {
        if self.connection.unregister_listener(self.listener) {
            debug!("Subunit {} closed", self.state.id);
        }
        self.state.callbacks.write().clear();
        self.state.sync.lock().take();
    }

    fn lookup(&self, key: &str) -> YncaResult<&'static dyn FunctionSpec> {
        self.state.schema.find(key).ok_or_else(|| {
            YncaError::Usage(format!(
                "Subunit {} has no function {:?}",
                self.state.id, key
            ))
        })
    }

    fn check_member<C: Converter>(&self, function: &Function<C>) -> YncaResult<()> {
        let known = self
            .state
            .schema
            .functions()
            .iter()
            .any(|f| f.descriptor() == function.descriptor());
        if known {
            Ok(())
        } else {
            Err(YncaError::Usage(format!(
                "Subunit {} has no function {}",
                self.state.id,
                function.name()
            )))
        }
    }

    fn check_readable(&self, name: &str, can_get: bool) -> YncaResult<()> {
        if can_get {
            Ok(())
        } else {
            Err(YncaError::Usage(format!(
                "{}:{} does not support GET",
                self.state.id, name
            )))
        }
    }

    fn check_writable(&self, name: &str, can_put: bool) -> YncaResult<()> {
        if can_put {
            Ok(())
        } else {
            Err(YncaError::Usage(format!(
                "{}:{} does not support PUT",
                self.state.id, name
            )))
        }
    }
}

impl Drop for Subunit {
    fn drop(&mut self) {
        self.connection.unregister_listener(self.listener);
    }
}

impl fmt::Debug for Subunit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subunit")
            .field("id", &self.state.id)
            .field("initialized", &self.is_initialized())
            .field("cached", &self.state.cache.read().len())
            .finish()
    }
}
