use std::collections::HashSet;

use indexmap::IndexMap;
use log::trace;

use crate::ids::Switch;
use crate::triggers::Tick;

/// Ticks a closure has to hold before it counts.
pub const DEFAULT_DEBOUNCE_TICKS: Tick = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Edge {
    Closed,
    Opened,
}

/// Raw transition reported by the switch matrix scanner.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SwitchEvent {
    pub switch_id: u32,
    pub edge: Edge,
    pub tick: Tick,
}

impl SwitchEvent {
    pub fn closed(switch_id: u32, tick: Tick) -> Self {
        SwitchEvent {
            switch_id,
            edge: Edge::Closed,
            tick,
        }
    }

    pub fn opened(switch_id: u32, tick: Tick) -> Self {
        SwitchEvent {
            switch_id,
            edge: Edge::Opened,
            tick,
        }
    }
}

#[derive(Debug)]
pub struct SwitchDebouncer {
    window: Tick,
    // detection order matters, confirmations are reported in it
    pending: IndexMap<Switch, Tick>,
    closed: HashSet<Switch>,
}

impl SwitchDebouncer {
    pub fn new(window: Tick) -> Self {
        SwitchDebouncer {
            window,
            pending: IndexMap::new(),
            closed: HashSet::new(),
        }
    }

    /// Feeds one raw edge. Returns `true` when a closed edge is the first
    /// detection of a new closure.
    pub fn observe(&mut self, switch: Switch, edge: Edge, tick: Tick) -> bool {
        match edge {
            Edge::Closed => {
                if self.closed.contains(&switch) || self.pending.contains_key(&switch) {
                    return false;
                }
                self.pending.insert(switch, tick);
                true
            }
            Edge::Opened => {
                if self.pending.shift_remove(&switch).is_some() {
                    trace!("switch {} bounced open at {}", switch, tick);
                }
                self.closed.remove(&switch);
                false
            }
        }
    }

    /// Confirms every closure that has held for the full window by `now`.
    pub fn poll(&mut self, now: Tick) -> Vec<Switch> {
        let window = self.window;
        let mut confirmed = Vec::new();
        self.pending.retain(|switch, detected| {
            if now >= detected.saturating_add(window) {
                confirmed.push(*switch);
                false
            } else {
                true
            }
        });
        self.closed.extend(confirmed.iter().copied());
        confirmed
    }

    pub fn is_closed(&self, switch: Switch) -> bool {
        self.closed.contains(&switch)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Earliest tick at which a pending closure can be confirmed.
    pub fn next_confirmation(&self) -> Option<Tick> {
        self.pending
            .values()
            .map(|detected| detected.saturating_add(self.window))
            .min()
    }
}

impl Default for SwitchDebouncer {
    fn default() -> Self {
        SwitchDebouncer::new(DEFAULT_DEBOUNCE_TICKS)
    }
}
