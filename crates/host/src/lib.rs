//! `stockshift-host`
//!
//! Host-side wiring: environment configuration, the card driver that runs
//! the transfer pipeline on each refresh, and dispatch of a chosen
//! recommendation to named host variables plus a follow-on trigger.

pub mod config;
pub mod dispatch;
pub mod driver;

pub use config::{ConfigError, ContainerPadding, HostConfig, SinkNames};
pub use dispatch::{
    ActionTrigger, Control, ControlSink, ControlValue, CountingTrigger, DispatchError,
    InMemoryControlSink, LoggingControlSink, LoggingTrigger, TransferDispatcher, TransferRequest,
    WAREHOUSE_REVIEW,
};
pub use driver::{TransferCard, TransferCardDriver};
