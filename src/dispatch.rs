//! Scan loop side of the trigger table.
//!
//! The dispatcher sits between the switch scanner and the solenoid driver.
//! Raw events go in, actuator commands come out: priority triggers on the
//! first detection, debounced triggers when the closure is confirmed.

use log::{debug, warn};

use crate::debounce::{SwitchDebouncer, SwitchEvent};
use crate::ids::Switch;
use crate::triggers::{ActuatorCommand, Tick, TriggerClass, TriggerTable};

/// Result of one scan tick.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanOutput {
    /// Commands for debounced triggers confirmed this tick, with the switch
    /// that caused them.
    pub commands: Vec<(Switch, ActuatorCommand)>,
    /// Every closure confirmed this tick, for the game rules.
    pub closures: Vec<Switch>,
}

pub struct TriggerDispatcher<'a> {
    table: &'a TriggerTable,
    debouncer: SwitchDebouncer,
}

impl<'a> TriggerDispatcher<'a> {
    pub fn new(table: &'a TriggerTable, debounce_ticks: Tick) -> Self {
        TriggerDispatcher {
            table,
            debouncer: SwitchDebouncer::new(debounce_ticks),
        }
    }

    pub fn debouncer(&self) -> &SwitchDebouncer {
        &self.debouncer
    }

    /// Handles a raw edge from the scanner. Only priority triggers can fire
    /// here, and only on the first detection of a closure.
    pub fn on_switch_event(&mut self, event: SwitchEvent) -> Option<ActuatorCommand> {
        let Some(switch) = Switch::from_id(event.switch_id) else {
            warn!(
                "ignoring {:?} edge from unknown switch {} at tick {}",
                event.edge, event.switch_id, event.tick
            );
            return None;
        };

        if !self.debouncer.observe(switch, event.edge, event.tick) {
            return None;
        }

        let trigger = self.table.trigger(switch)?;
        if trigger.class != TriggerClass::Priority {
            return None;
        }
        let command = trigger.rule.on_trigger(event.tick);
        debug!(
            "priority trigger: switch {} fires solenoid {} for ticks {}..{}",
            switch, command.solenoid, command.start_tick, command.stop_tick
        );
        Some(command)
    }

    /// Advances the debounce filter to `now`.
    pub fn on_tick(&mut self, now: Tick) -> ScanOutput {
        let closures = self.debouncer.poll(now);
        let commands = closures
            .iter()
            .filter_map(|switch| self.table.trigger(*switch))
            .filter(|trigger| trigger.class == TriggerClass::Debounced)
            .map(|trigger| {
                let command = trigger.rule.on_trigger(now);
                debug!(
                    "debounced trigger: switch {} fires solenoid {} for ticks {}..{}",
                    trigger.rule.switch, command.solenoid, command.start_tick, command.stop_tick
                );
                (trigger.rule.switch, command)
            })
            .collect();
        ScanOutput { commands, closures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mata_hari_triggers;
    use crate::ids::Solenoid;
    use crate::triggers::TriggerRule;

    fn chime_table() -> TriggerTable {
        TriggerTable::new(
            &[TriggerRule::new(Switch::LeftSling, Solenoid::LeftSling, 4)],
            &[TriggerRule::new(Switch::TopALane, Solenoid::Chime10, 3)],
        )
        .unwrap()
    }

    #[test]
    fn left_sling_fires_on_first_detection() {
        let table = mata_hari_triggers().unwrap();
        let mut dispatcher = TriggerDispatcher::new(&table, 2);

        let command = dispatcher
            .on_switch_event(SwitchEvent::closed(Switch::LeftSling.id(), 1000))
            .unwrap();
        assert_eq!(command.solenoid, Solenoid::LeftSling);
        assert_eq!((command.start_tick, command.stop_tick), (1000, 1004));
    }

    #[test]
    fn priority_switch_does_not_fire_again_on_confirmation() {
        let table = mata_hari_triggers().unwrap();
        let mut dispatcher = TriggerDispatcher::new(&table, 2);
        dispatcher.on_switch_event(SwitchEvent::closed(Switch::Bumper1.id(), 500));

        let output = dispatcher.on_tick(502);
        assert!(output.commands.is_empty());
        assert_eq!(output.closures, vec![Switch::Bumper1]);
    }

    #[test]
    fn undefined_switch_produces_nothing() {
        let table = mata_hari_triggers().unwrap();
        let mut dispatcher = TriggerDispatcher::new(&table, 2);
        assert_eq!(dispatcher.on_switch_event(SwitchEvent::closed(9999, 10)), None);
        assert_eq!(dispatcher.on_tick(20), ScanOutput::default());
    }

    #[test]
    fn debounced_switch_waits_for_confirmation() {
        let table = chime_table();
        let mut dispatcher = TriggerDispatcher::new(&table, 2);

        assert_eq!(
            dispatcher.on_switch_event(SwitchEvent::closed(Switch::TopALane.id(), 40)),
            None
        );
        assert!(dispatcher.on_tick(41).commands.is_empty());

        let output = dispatcher.on_tick(42);
        assert_eq!(output.closures, vec![Switch::TopALane]);
        assert_eq!(
            output.commands,
            vec![(
                Switch::TopALane,
                ActuatorCommand {
                    solenoid: Solenoid::Chime10,
                    start_tick: 42,
                    stop_tick: 45,
                }
            )]
        );
    }

    #[test]
    fn bounce_suppresses_debounced_trigger() {
        let table = chime_table();
        let mut dispatcher = TriggerDispatcher::new(&table, 2);
        dispatcher.on_switch_event(SwitchEvent::closed(Switch::TopALane.id(), 40));
        dispatcher.on_switch_event(SwitchEvent::opened(Switch::TopALane.id(), 41));
        assert_eq!(dispatcher.on_tick(42), ScanOutput::default());
    }

    #[test]
    fn bounce_on_priority_switch_fires_again() {
        let table = chime_table();
        let mut dispatcher = TriggerDispatcher::new(&table, 2);
        let id = Switch::LeftSling.id();
        assert!(dispatcher.on_switch_event(SwitchEvent::closed(id, 10)).is_some());
        assert!(dispatcher.on_switch_event(SwitchEvent::closed(id, 10)).is_none());
        dispatcher.on_switch_event(SwitchEvent::opened(id, 11));
        assert!(dispatcher.on_switch_event(SwitchEvent::closed(id, 11)).is_some());
    }

    #[test]
    fn switch_without_trigger_still_reaches_game_rules() {
        let table = mata_hari_triggers().unwrap();
        let mut dispatcher = TriggerDispatcher::new(&table, 2);
        assert_eq!(
            dispatcher.on_switch_event(SwitchEvent::closed(Switch::Saucer.id(), 3)),
            None
        );
        let output = dispatcher.on_tick(5);
        assert!(output.commands.is_empty());
        assert_eq!(output.closures, vec![Switch::Saucer]);
    }
}
