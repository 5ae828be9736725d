//! Execution context: header, state store and event log for one message.

use crate::event::Event;
use restake_store::{CacheStore, KvStore, StoreError};
use restake_types::{BlockHeader, Timestamp};

/// Everything a message handler or end-block hook executes against.
///
/// All state lives behind `store`; collaborators are stateless and read and
/// write through the context, so wrapping the store in a branch is enough to
/// make any sequence of collaborator calls atomic.
pub struct Context<'a> {
    header: BlockHeader,
    store: &'a mut dyn KvStore,
    events: Vec<Event>,
}

impl<'a> Context<'a> {
    pub fn new(header: BlockHeader, store: &'a mut dyn KvStore) -> Self {
        Self {
            header,
            store,
            events: Vec::new(),
        }
    }

    pub fn header(&self) -> BlockHeader {
        self.header
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn time(&self) -> Timestamp {
        self.header.time
    }

    pub fn store(&self) -> &dyn KvStore {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut dyn KvStore {
        &mut *self.store
    }

    /// Append an event to this context's log.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events emitted so far, in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain the event log.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Run `f` against a write branch of this context.
    ///
    /// If `f` returns `Ok`, the branch's state writes are applied to this
    /// context's store and its events are appended to this context's log. If
    /// it returns `Err`, both are discarded and this context is exactly as
    /// it was before the call.
    pub fn branch<T, E>(&mut self, f: impl FnOnce(&mut Context<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let header = self.header;
        let (result, writes, events) = {
            let mut cache = CacheStore::new(&*self.store);
            let mut sub = Context::new(header, &mut cache);
            let result = f(&mut sub);
            let events = sub.take_events();
            drop(sub);
            (result, cache.into_writes(), events)
        };
        match result {
            Ok(value) => {
                self.store.apply(writes)?;
                self.events.extend(events);
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restake_store::MemStore;

    #[derive(Debug)]
    struct Failed;

    impl From<StoreError> for Failed {
        fn from(_: StoreError) -> Self {
            Failed
        }
    }

    fn header() -> BlockHeader {
        BlockHeader::new(7, Timestamp::new(1_000))
    }

    #[test]
    fn successful_branch_commits_writes_and_events() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(header(), &mut store);
        ctx.branch(|sub| -> Result<(), Failed> {
            sub.store_mut().set(b"k", vec![1])?;
            sub.emit(Event::new("ok"));
            Ok(())
        })
        .unwrap();
        assert_eq!(ctx.events().len(), 1);
        drop(ctx);
        assert_eq!(store.get(b"k").unwrap(), Some(vec![1]));
    }

    #[test]
    fn failed_branch_discards_writes_and_events() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(header(), &mut store);
        let result = ctx.branch(|sub| -> Result<(), Failed> {
            sub.store_mut().set(b"k", vec![1])?;
            sub.emit(Event::new("lost"));
            Err(Failed)
        });
        assert!(result.is_err());
        assert!(ctx.events().is_empty());
        drop(ctx);
        assert!(store.is_empty());
    }

    #[test]
    fn branch_sees_parent_header() {
        let mut store = MemStore::new();
        let mut ctx = Context::new(header(), &mut store);
        let height = ctx
            .branch(|sub| -> Result<u64, Failed> { Ok(sub.height()) })
            .unwrap();
        assert_eq!(height, 7);
    }
}
