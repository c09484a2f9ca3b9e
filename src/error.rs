use std::path::PathBuf;

use crate::ids::Switch;
use crate::triggers::Tick;

/// Rejected trigger configuration. Any of these stops the controller from
/// starting.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("switch {0} has more than one trigger rule")]
    DuplicateSwitch(Switch),

    #[error("switch {0} is listed as both a priority and a debounced trigger")]
    ConflictingClass(Switch),

    #[error("trigger for switch {0} has a zero fire duration")]
    ZeroDuration(Switch),

    #[error("unknown switch `{0}`")]
    UnknownSwitch(String),

    #[error("unknown solenoid `{0}`")]
    UnknownSolenoid(String),

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid trigger file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Problems with a switch event script.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("line {line}: tick {tick} is earlier than the previous event at {previous}")]
    OutOfOrder {
        line: usize,
        tick: Tick,
        previous: Tick,
    },

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
