//! The auto-fire trigger table.
//!
//! A trigger ties a switch to a solenoid pulse that fires without asking the
//! game rules first. Priority triggers fire on the raw closure, before the
//! debounce window has passed, so slings and pop bumpers kick back
//! immediately. Debounced triggers wait for a confirmed closure, which keeps
//! chimes and rollovers from double firing on contact bounce.

use std::time::Duration;

use indexmap::IndexMap;
use log::debug;

use crate::error::ConfigError;
use crate::ids::{Solenoid, Switch};

/// One period of the 120 Hz real time clock.
pub type Tick = u64;

pub const TICKS_PER_SECOND: u32 = 120;

pub fn ticks_to_duration(ticks: Tick) -> Duration {
    Duration::from_secs(ticks) / TICKS_PER_SECOND
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TriggerClass {
    /// Fires on the first raw detection of a closure.
    Priority,
    /// Fires once the closure has been confirmed by the debounce filter.
    Debounced,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TriggerRule {
    pub switch: Switch,
    pub solenoid: Solenoid,
    pub fire_duration_ticks: u16,
}

impl TriggerRule {
    pub const fn new(switch: Switch, solenoid: Solenoid, fire_duration_ticks: u16) -> Self {
        TriggerRule {
            switch,
            solenoid,
            fire_duration_ticks,
        }
    }

    pub fn fire_duration(&self) -> Duration {
        ticks_to_duration(self.fire_duration_ticks as Tick)
    }

    /// Command that energizes the rule's solenoid from `current_tick` for
    /// exactly `fire_duration_ticks`, cut short only at the end of the clock.
    pub fn on_trigger(&self, current_tick: Tick) -> ActuatorCommand {
        ActuatorCommand {
            solenoid: self.solenoid,
            start_tick: current_tick,
            stop_tick: current_tick.saturating_add(self.fire_duration_ticks as Tick),
        }
    }
}

/// A rule together with the class it was declared in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub class: TriggerClass,
    pub rule: TriggerRule,
}

/// Request for the solenoid driver: energize `solenoid` at `start_tick`,
/// release it at `stop_tick`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ActuatorCommand {
    pub solenoid: Solenoid,
    pub start_tick: Tick,
    pub stop_tick: Tick,
}

impl ActuatorCommand {
    pub fn duration_ticks(&self) -> Tick {
        self.stop_tick - self.start_tick
    }
}

/// Validated, read-only set of trigger rules.
///
/// Built once at startup. Construction fails on duplicates, cross-class
/// conflicts and zero durations, so a table that exists is a table that is
/// safe to drive coils with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerTable {
    triggers: IndexMap<Switch, Trigger>,
}

impl TriggerTable {
    pub fn new(priority: &[TriggerRule], debounced: &[TriggerRule]) -> Result<Self, ConfigError> {
        let mut triggers: IndexMap<Switch, Trigger> =
            IndexMap::with_capacity(priority.len() + debounced.len());

        for (class, rules) in [
            (TriggerClass::Priority, priority),
            (TriggerClass::Debounced, debounced),
        ] {
            for rule in rules {
                if rule.fire_duration_ticks == 0 {
                    return Err(ConfigError::ZeroDuration(rule.switch));
                }
                if let Some(existing) = triggers.get(&rule.switch) {
                    return Err(if existing.class == class {
                        ConfigError::DuplicateSwitch(rule.switch)
                    } else {
                        ConfigError::ConflictingClass(rule.switch)
                    });
                }
                debug!(
                    "trigger {:?}: switch {} -> solenoid {} for {} ticks",
                    class, rule.switch, rule.solenoid, rule.fire_duration_ticks
                );
                triggers.insert(rule.switch, Trigger { class, rule: *rule });
            }
        }

        Ok(TriggerTable { triggers })
    }

    pub fn lookup(&self, switch: Switch) -> Option<TriggerRule> {
        self.triggers.get(&switch).map(|trigger| trigger.rule)
    }

    /// Lookup by the raw number a switch scanner reports. Numbers outside the
    /// switch namespace simply have no trigger.
    pub fn lookup_id(&self, switch_id: u32) -> Option<TriggerRule> {
        Switch::from_id(switch_id).and_then(|switch| self.lookup(switch))
    }

    pub fn trigger(&self, switch: Switch) -> Option<Trigger> {
        self.triggers.get(&switch).copied()
    }

    pub fn priority(&self) -> impl Iterator<Item = &TriggerRule> {
        self.of_class(TriggerClass::Priority)
    }

    pub fn debounced(&self) -> impl Iterator<Item = &TriggerRule> {
        self.of_class(TriggerClass::Debounced)
    }

    fn of_class(&self, class: TriggerClass) -> impl Iterator<Item = &TriggerRule> {
        self.triggers
            .values()
            .filter(move |trigger| trigger.class == class)
            .map(|trigger| &trigger.rule)
    }

    /// Longest pulse any rule can produce.
    pub fn max_fire_duration_ticks(&self) -> u16 {
        self.triggers
            .values()
            .map(|trigger| trigger.rule.fire_duration_ticks)
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
