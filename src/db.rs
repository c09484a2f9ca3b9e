use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::ids::{Solenoid, Switch};
use crate::triggers::{TriggerRule, TriggerTable};

pub type SwitchIndex = IndexMap<&'static str, Switch>;
pub type SolenoidIndex = IndexMap<&'static str, Solenoid>;

/// Pulse length for slings and pop bumpers, 1/30th of a second.
pub const KICKER_PULSE_TICKS: u16 = 4;

// Mata Hari (Bally, 1978)
pub const PRIORITY_TRIGGERS: &[TriggerRule] = &[
    TriggerRule::new(Switch::LeftSling, Solenoid::LeftSling, KICKER_PULSE_TICKS),
    TriggerRule::new(Switch::RightSling, Solenoid::RightSling, KICKER_PULSE_TICKS),
    TriggerRule::new(Switch::Bumper1, Solenoid::Bumper1, KICKER_PULSE_TICKS),
    TriggerRule::new(Switch::Bumper2, Solenoid::Bumper2, KICKER_PULSE_TICKS),
    TriggerRule::new(Switch::Bumper3, Solenoid::Bumper3, KICKER_PULSE_TICKS),
    TriggerRule::new(Switch::Bumper4, Solenoid::Bumper4, KICKER_PULSE_TICKS),
];

// The chimes are rung by the game rules, nothing is wired to fire on its own
// after debounce.
pub const DEBOUNCED_TRIGGERS: &[TriggerRule] = &[];

pub fn mata_hari_triggers() -> Result<TriggerTable, ConfigError> {
    TriggerTable::new(PRIORITY_TRIGGERS, DEBOUNCED_TRIGGERS)
}

lazy_static! {
    pub static ref SWITCHES_BY_NAME: SwitchIndex = {
        let mut m = IndexMap::new();
        for switch in Switch::ALL {
            m.insert(switch.name(), *switch);
        }
        m
    };

    pub static ref SOLENOIDS_BY_NAME: SolenoidIndex = {
        let mut m = IndexMap::new();
        for solenoid in Solenoid::ALL {
            m.insert(solenoid.name(), *solenoid);
        }
        m
    };
}

/// Resolves a switch written either as its number or as its name.
pub fn find_switch(key: &str) -> Option<Switch> {
    match key.parse::<u32>() {
        Ok(id) => Switch::from_id(id),
        Err(_) => SWITCHES_BY_NAME.get(key).copied(),
    }
}

pub fn find_solenoid(key: &str) -> Option<Solenoid> {
    match key.parse::<u32>() {
        Ok(id) => Solenoid::from_id(id),
        Err(_) => SOLENOIDS_BY_NAME.get(key).copied(),
    }
}
