//! # MachineWatch Status
//!
//! Polls a control-system status source, decodes each snapshot into a
//! [`DerivedState`], compares it with the previous cycle and emits one typed
//! [`StatusEvent`] per changed field, plus the per-cycle heartbeat.
//!
//! ## Modules
//!
//! - [`source`] - status source interface
//! - [`decode`] - G/M-code strings, modal flags and homing summaries
//! - [`derived`] - the decoded per-cycle state
//! - [`diff`] - change detection and the forced-refresh catalogue
//! - [`events`] - notification catalogue and typed channels
//! - [`fields`] - enumerated field access
//! - [`watcher`] - [`StatusWatcher`]
//! - [`sim`] - in-memory status source

pub mod decode;
pub mod derived;
pub mod diff;
pub mod events;
pub mod fields;
pub mod sim;
pub mod source;
pub mod watcher;

pub use decode::{format_gcodes, format_mcodes, HomingSummary, ModalFlags};
pub use derived::DerivedState;
pub use diff::{diff_states, forced_events};
pub use events::{ChannelFilter, StatusChannel, StatusEvent, StatusSignals};
pub use fields::{FieldValue, StatusField};
pub use sim::{SimStatusHandle, SimStatusSource};
pub use source::StatusSource;
pub use watcher::{
    CycleOutcome, StatusWatcher, WatcherOptions, DEFAULT_JOG_RATE,
    DEFAULT_OVERRIDE_LIMIT_JOINTS, DEFAULT_STATUS_INTERVAL,
};
