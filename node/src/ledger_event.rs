//! Advisory notifications published after each block.
//!
//! Nothing here is consensus state. Subscribers (indexers, the daemon's
//! output, tests) see what happened without reading the event log.

use restake_engine::AutoRestakeExecuted;
use restake_ledger::UnbondingEntry;

#[derive(Clone, Debug)]
pub enum LedgerEvent {
    /// A block finished executing and its state was committed.
    BlockExecuted {
        height: u64,
        committed: usize,
        rolled_back: usize,
    },
    /// A transaction failed and none of its effects were kept.
    TxRolledBack {
        height: u64,
        index: usize,
        reason: String,
    },
    /// The harvester restaked part of a reward withdrawal.
    AutoRestakeExecuted(AutoRestakeExecuted),
    /// Unbonded tokens were released to their owner.
    UnbondingCompleted(UnbondingEntry),
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast to
/// avoid stalling block execution.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&LedgerEvent::BlockExecuted {
            height: 1,
            committed: 0,
            rolled_back: 0,
        });
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        EventBus::default().emit(&LedgerEvent::TxRolledBack {
            height: 1,
            index: 0,
            reason: "test".into(),
        });
    }
}
