//! Hand-off of a chosen recommendation to the host.
//!
//! The host exposes named variables (sinks) and a follow-on workflow
//! (trigger). Initiating a transfer writes five values, one per sink, then
//! fires the trigger. Failures are contained here: they are logged and the
//! caller only sees that no request was issued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use stockshift_core::TransferId;
use stockshift_transfers::TransferRecommendation;

use crate::config::SinkNames;

/// Status written for every freshly initiated transfer.
pub const WAREHOUSE_REVIEW: &str = "Warehouse Review";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("sink {sink} rejected value: {reason}")]
    Sink { sink: String, reason: String },

    #[error("action trigger failed: {0}")]
    Trigger(String),
}

impl DispatchError {
    pub fn sink(sink: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Sink {
            sink: sink.into(),
            reason: reason.into(),
        }
    }
}

/// Scalar written to a host variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Number(f64),
    Text(String),
}

impl core::fmt::Display for ControlValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The five values of a transfer request, in the order they are written.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Control {
    ShortageKey,
    ExcessKey,
    TransferQty,
    TransferId,
    Status,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Self::ShortageKey,
        Self::ExcessKey,
        Self::TransferQty,
        Self::TransferId,
        Self::Status,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ShortageKey => "shortage_key",
            Self::ExcessKey => "excess_key",
            Self::TransferQty => "transfer_qty",
            Self::TransferId => "transfer_id",
            Self::Status => "status",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// A host variable that accepts one value at a time.
pub trait ControlSink: Send + Sync + 'static {
    fn set(&self, value: &ControlValue) -> Result<(), DispatchError>;
}

/// The follow-on workflow started after all values are written.
pub trait ActionTrigger: Send + Sync + 'static {
    fn fire(&self) -> Result<(), DispatchError>;
}

impl<F> ControlSink for F
where
    F: Fn(&ControlValue) -> Result<(), DispatchError> + Send + Sync + 'static,
{
    fn set(&self, value: &ControlValue) -> Result<(), DispatchError> {
        self(value)
    }
}

impl<F> ActionTrigger for F
where
    F: Fn() -> Result<(), DispatchError> + Send + Sync + 'static,
{
    fn fire(&self) -> Result<(), DispatchError> {
        self()
    }
}

/// Transfer request as handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub transfer_id: TransferId,
    pub shortage_store_key: String,
    pub excess_store_key: String,
    pub quantity: f64,
    pub status: String,
}

impl TransferRequest {
    pub fn new(rec: &TransferRecommendation, transfer_id: TransferId) -> Self {
        Self {
            transfer_id,
            shortage_store_key: rec.shortage_store_key.clone(),
            excess_store_key: rec.excess_store_key.clone(),
            quantity: rec.recommended_transfer_qty,
            status: WAREHOUSE_REVIEW.to_string(),
        }
    }

    /// Value written for `control`.
    ///
    /// Store keys always go out as text: a numeric key cell arrives in its
    /// canonical rendering (`101.0` is written as `"101"`).
    pub fn value(&self, control: Control) -> ControlValue {
        match control {
            Control::ShortageKey => ControlValue::Text(self.shortage_store_key.clone()),
            Control::ExcessKey => ControlValue::Text(self.excess_store_key.clone()),
            Control::TransferQty => ControlValue::Number(self.quantity),
            Control::TransferId => ControlValue::Text(self.transfer_id.to_string()),
            Control::Status => ControlValue::Text(self.status.clone()),
        }
    }
}

/// Routes transfer requests to the configured sinks and trigger.
#[derive(Default)]
pub struct TransferDispatcher {
    sinks: [Option<Box<dyn ControlSink>>; 5],
    trigger: Option<Box<dyn ActionTrigger>>,
}

impl core::fmt::Debug for TransferDispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let wired: Vec<&str> = Control::ALL
            .into_iter()
            .filter(|c| self.sinks[c.slot()].is_some())
            .map(Control::name)
            .collect();
        f.debug_struct("TransferDispatcher")
            .field("sinks", &wired)
            .field("trigger", &self.trigger.is_some())
            .finish()
    }
}

impl TransferDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, control: Control, sink: impl ControlSink) -> Self {
        self.sinks[control.slot()] = Some(Box::new(sink));
        self
    }

    pub fn with_trigger(mut self, trigger: impl ActionTrigger) -> Self {
        self.trigger = Some(Box::new(trigger));
        self
    }

    /// Dispatcher whose sinks and trigger only log, named after `names`.
    pub fn logging(names: &SinkNames) -> Self {
        let mut dispatcher = Self::new().with_trigger(LoggingTrigger);
        let wiring = [
            (Control::ShortageKey, &names.shortage_key),
            (Control::ExcessKey, &names.excess_key),
            (Control::TransferQty, &names.transfer_qty),
            (Control::TransferId, &names.transfer_id),
            (Control::Status, &names.status),
        ];
        for (control, name) in wiring {
            if let Some(name) = name {
                dispatcher = dispatcher.with_sink(control, LoggingControlSink::new(name.clone()));
            }
        }
        dispatcher
    }

    /// Write every value, then fire the trigger. Stops at the first failure;
    /// values already written stay written.
    pub fn dispatch(&self, request: &TransferRequest) -> Result<(), DispatchError> {
        for control in Control::ALL {
            let Some(sink) = &self.sinks[control.slot()] else {
                debug!(control = control.name(), "sink not configured; skipping");
                continue;
            };
            let value = request.value(control);
            debug!(control = control.name(), value = %value, "setting control");
            sink.set(&value)?;
        }

        match &self.trigger {
            Some(trigger) => {
                info!(transfer_id = %request.transfer_id, "triggering transfer action");
                trigger.fire()
            }
            None => {
                debug!("no action trigger configured");
                Ok(())
            }
        }
    }

    /// Issue a transfer request for `rec` with a freshly minted id.
    ///
    /// Returns the request on success. Failures are logged and swallowed.
    pub fn initiate(&self, rec: &TransferRecommendation) -> Option<TransferRequest> {
        let request = TransferRequest::new(rec, TransferId::generate());
        info!(
            transfer_id = %request.transfer_id,
            shortage_store = %request.shortage_store_key,
            excess_store = %request.excess_store_key,
            quantity = request.quantity,
            "initiating transfer request"
        );
        match self.dispatch(&request) {
            Ok(()) => Some(request),
            Err(e) => {
                error!(transfer_id = %request.transfer_id, error = %e, "transfer request failed");
                None
            }
        }
    }
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryControlSink {
    inner: Mutex<Vec<ControlValue>>,
}

impl InMemoryControlSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<ControlValue> {
        self.inner.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<ControlValue> {
        self.inner.lock().ok().and_then(|v| v.last().cloned())
    }
}

impl ControlSink for InMemoryControlSink {
    fn set(&self, value: &ControlValue) -> Result<(), DispatchError> {
        self.inner
            .lock()
            .map_err(|_| DispatchError::sink("in-memory", "lock poisoned"))?
            .push(value.clone());
        Ok(())
    }
}

/// Trigger that only counts how often it fired.
#[derive(Debug, Default)]
pub struct CountingTrigger {
    fired: AtomicU64,
}

impl CountingTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.fired.load(Ordering::SeqCst)
    }
}

impl ActionTrigger for CountingTrigger {
    fn fire(&self) -> Result<(), DispatchError> {
        self.fired.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Sink that writes each value to the log under the host variable name.
#[derive(Debug, Clone)]
pub struct LoggingControlSink {
    name: String,
}

impl LoggingControlSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ControlSink for LoggingControlSink {
    fn set(&self, value: &ControlValue) -> Result<(), DispatchError> {
        info!(variable = %self.name, value = %value, "control value set");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoggingTrigger;

impl ActionTrigger for LoggingTrigger {
    fn fire(&self) -> Result<(), DispatchError> {
        info!("transfer action triggered");
        Ok(())
    }
}
