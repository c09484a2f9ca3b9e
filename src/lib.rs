//! Automatic solenoid triggers for the Mata Hari pinball controller.
//!
//! Run the command line tool like this: `RUST_LOG=debug cargo run -- replay hits.txt`

#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod db;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod ids;
pub mod replay;
pub mod solenoids;
pub mod triggers;

pub use error::{ConfigError, ReplayError};
pub use ids::{Lamp, Solenoid, Switch};
pub use triggers::{ActuatorCommand, Tick, Trigger, TriggerClass, TriggerRule, TriggerTable};
