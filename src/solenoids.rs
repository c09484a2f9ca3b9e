use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::ids::Solenoid;
use crate::triggers::{ActuatorCommand, Tick};

/// Bookkeeping for energized coils, the way the solenoid driver sees it.
///
/// A pulse runs its full length once started: a second command for a coil
/// that is still energized is dropped, not merged. The only way to cut a
/// pulse short is [`PulseSchedule::all_off`].
#[derive(Debug, Default)]
pub struct PulseSchedule {
    active: IndexMap<Solenoid, Tick>,
}

impl PulseSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the pulse. Returns `false` if the coil is already energized.
    pub fn energize(&mut self, command: ActuatorCommand) -> bool {
        if let Some(stop_tick) = self.active.get(&command.solenoid) {
            trace!(
                "solenoid {} already energized until {}, dropping command at {}",
                command.solenoid, stop_tick, command.start_tick
            );
            return false;
        }
        debug!(
            "solenoid {} on at {} until {}",
            command.solenoid, command.start_tick, command.stop_tick
        );
        self.active.insert(command.solenoid, command.stop_tick);
        true
    }

    /// Releases every pulse whose stop tick has been reached.
    pub fn release_due(&mut self, now: Tick) -> Vec<Solenoid> {
        let mut released = Vec::new();
        self.active.retain(|solenoid, stop_tick| {
            if *stop_tick <= now {
                released.push(*solenoid);
                false
            } else {
                true
            }
        });
        for solenoid in &released {
            debug!("solenoid {} off at {}", solenoid, now);
        }
        released
    }

    /// Drops every coil at once, for slam tilt and power down.
    pub fn all_off(&mut self) -> Vec<Solenoid> {
        if !self.active.is_empty() {
            warn!("forcing {} solenoid(s) off", self.active.len());
        }
        self.active.drain(..).map(|(solenoid, _)| solenoid).collect()
    }

    pub fn is_energized(&self, solenoid: Solenoid) -> bool {
        self.active.contains_key(&solenoid)
    }

    /// Earliest tick at which an energized coil is due for release.
    pub fn next_release(&self) -> Option<Tick> {
        self.active.values().copied().min()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }
}
