//! Replays a script of switch events through the dispatcher and a pulse
//! schedule, tick by tick.
//!
//! Script format, one event per line:
//!
//! ```text
//! # tick switch edge
//! 1000 LeftSling closed
//! 1003 35 open
//! ```

use std::path::Path;

use log::{info, warn};

use crate::{
    db::find_switch,
    debounce::{Edge, SwitchEvent},
    dispatch::TriggerDispatcher,
    error::ReplayError,
    ids::{Solenoid, Switch},
    solenoids::PulseSchedule,
    triggers::{ActuatorCommand, Tick, TriggerClass, TriggerTable},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayRecord {
    Fired {
        class: TriggerClass,
        switch: Switch,
        command: ActuatorCommand,
    },
    /// A trigger fired while its coil was still energized.
    Dropped {
        switch: Switch,
        command: ActuatorCommand,
    },
    Released {
        solenoid: Solenoid,
        tick: Tick,
    },
    Confirmed {
        switch: Switch,
        tick: Tick,
    },
    /// Event for a number outside the switch namespace.
    Ignored {
        switch_id: u32,
        tick: Tick,
    },
    SlamTilt {
        tick: Tick,
        released: Vec<Solenoid>,
    },
}

pub fn parse_events(script: &str) -> Result<Vec<SwitchEvent>, ReplayError> {
    let mut events = Vec::new();
    let mut previous: Option<Tick> = None;

    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        let &[tick, switch, edge] = fields.as_slice() else {
            return Err(ReplayError::Parse {
                line,
                reason: format!("expected `<tick> <switch> <closed|open>`, got `{}`", content),
            });
        };

        let tick: Tick = tick.parse().map_err(|_| ReplayError::Parse {
            line,
            reason: format!("invalid tick `{}`", tick),
        })?;
        // Unknown numbers are kept, the dispatcher has to cope with them.
        let switch_id = match switch.parse::<u32>() {
            Ok(id) => id,
            Err(_) => find_switch(switch)
                .ok_or_else(|| ReplayError::Parse {
                    line,
                    reason: format!("unknown switch `{}`", switch),
                })?
                .id(),
        };
        let edge = match edge.to_ascii_lowercase().as_str() {
            "closed" | "close" | "1" => Edge::Closed,
            "open" | "opened" | "0" => Edge::Opened,
            other => {
                return Err(ReplayError::Parse {
                    line,
                    reason: format!("invalid edge `{}`", other),
                });
            }
        };

        if let Some(previous) = previous {
            if tick < previous {
                return Err(ReplayError::OutOfOrder {
                    line,
                    tick,
                    previous,
                });
            }
        }
        previous = Some(tick);

        events.push(SwitchEvent {
            switch_id,
            edge,
            tick,
        });
    }

    Ok(events)
}

pub fn load_events(path: &Path) -> Result<Vec<SwitchEvent>, ReplayError> {
    let script = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_events(&script)
}

/// Runs `events` (sorted by tick) from the first event's tick until every
/// pulse is released and every pending closure resolved.
///
/// Coils due at a tick are released before that tick's events are handled,
/// so a pulse covers `[start_tick, stop_tick)`. Idle stretches are skipped.
pub fn run(
    table: &TriggerTable,
    debounce_ticks: Tick,
    events: &[SwitchEvent],
) -> Vec<ReplayRecord> {
    let mut records = Vec::new();
    let Some(first) = events.first() else {
        return records;
    };

    let mut dispatcher = TriggerDispatcher::new(table, debounce_ticks);
    let mut schedule = PulseSchedule::new();
    let mut remaining = events.iter().peekable();
    let mut now = first.tick;

    loop {
        release(&mut schedule, &mut records, now);

        while let Some(event) = remaining.next_if(|event| event.tick <= now) {
            let Some(switch) = Switch::from_id(event.switch_id) else {
                records.push(ReplayRecord::Ignored {
                    switch_id: event.switch_id,
                    tick: event.tick,
                });
                dispatcher.on_switch_event(*event);
                continue;
            };
            if let Some(command) = dispatcher.on_switch_event(*event) {
                fire(&mut schedule, &mut records, TriggerClass::Priority, switch, command);
            }
        }

        let output = dispatcher.on_tick(now);
        let mut slammed = false;
        for switch in output.closures {
            records.push(ReplayRecord::Confirmed { switch, tick: now });
            if switch == Switch::Slam {
                warn!("slam tilt at tick {}", now);
                slammed = true;
                let released = schedule.all_off();
                records.push(ReplayRecord::SlamTilt {
                    tick: now,
                    released,
                });
            }
        }
        if !slammed {
            for (switch, command) in output.commands {
                fire(&mut schedule, &mut records, TriggerClass::Debounced, switch, command);
            }
        }

        let next = [
            remaining.peek().map(|event| event.tick),
            schedule.next_release(),
            dispatcher.debouncer().next_confirmation(),
        ]
        .into_iter()
        .flatten()
        .min();
        match next {
            Some(next) if next > now => now = next,
            // only at the end of the clock, everything left is due now
            Some(_) => {
                release(&mut schedule, &mut records, now);
                break;
            }
            None => break,
        }
    }

    info!("replayed {} events up to tick {}", events.len(), now);
    records
}

fn release(schedule: &mut PulseSchedule, records: &mut Vec<ReplayRecord>, now: Tick) {
    for solenoid in schedule.release_due(now) {
        records.push(ReplayRecord::Released {
            solenoid,
            tick: now,
        });
    }
}

fn fire(
    schedule: &mut PulseSchedule,
    records: &mut Vec<ReplayRecord>,
    class: TriggerClass,
    switch: Switch,
    command: ActuatorCommand,
) {
    if schedule.energize(command) {
        records.push(ReplayRecord::Fired {
            class,
            switch,
            command,
        });
    } else {
        records.push(ReplayRecord::Dropped { switch, command });
    }
}
