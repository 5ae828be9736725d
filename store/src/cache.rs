//! Buffered write branch over a parent store.
//!
//! Reads fall through to the parent unless the key was written in this
//! branch. Writes are kept in an overlay until the caller takes them with
//! [`CacheStore::into_writes`] and applies them to the parent. Dropping the
//! branch without doing so rolls every write back.
//!
//! ```ignore
//! let writes = {
//!     let mut branch = CacheStore::new(&parent);
//!     branch.set(b"k", b"v".to_vec())?;
//!     branch.into_writes()
//! };
//! parent.apply(writes)?;
//! ```

use crate::kv::{KvStore, Writes};
use crate::StoreError;
use std::collections::BTreeMap;

pub struct CacheStore<'p> {
    parent: &'p dyn KvStore,
    overlay: Writes,
}

impl<'p> CacheStore<'p> {
    pub fn new(parent: &'p dyn KvStore) -> Self {
        Self {
            parent,
            overlay: BTreeMap::new(),
        }
    }

    /// Consume the branch, yielding its buffered mutations.
    pub fn into_writes(self) -> Writes {
        self.overlay
    }
}

impl KvStore for CacheStore<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.overlay.get(key) {
            Some(value) => Ok(value.clone()),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.overlay.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.overlay.insert(key.to_vec(), None);
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.prefix_scan(prefix)?.into_iter().collect();
        for (key, value) in self
            .overlay
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemStore;

    fn seeded() -> MemStore {
        let mut store = MemStore::new();
        store.set(b"a/1", vec![1]).unwrap();
        store.set(b"a/2", vec![2]).unwrap();
        store
    }

    #[test]
    fn reads_fall_through_to_parent() {
        let parent = seeded();
        let branch = CacheStore::new(&parent);
        assert_eq!(branch.get(b"a/1").unwrap(), Some(vec![1]));
        assert_eq!(branch.get(b"missing").unwrap(), None);
    }

    #[test]
    fn dropped_branch_leaves_parent_untouched() {
        let parent = seeded();
        {
            let mut branch = CacheStore::new(&parent);
            branch.set(b"a/1", vec![9]).unwrap();
            branch.delete(b"a/2").unwrap();
            assert_eq!(branch.get(b"a/1").unwrap(), Some(vec![9]));
            assert_eq!(branch.get(b"a/2").unwrap(), None);
        }
        assert_eq!(parent.get(b"a/1").unwrap(), Some(vec![1]));
        assert_eq!(parent.get(b"a/2").unwrap(), Some(vec![2]));
    }

    #[test]
    fn applied_writes_reach_parent() {
        let mut parent = seeded();
        let writes = {
            let mut branch = CacheStore::new(&parent);
            branch.set(b"a/3", vec![3]).unwrap();
            branch.delete(b"a/1").unwrap();
            branch.into_writes()
        };
        parent.apply(writes).unwrap();
        assert_eq!(parent.get(b"a/1").unwrap(), None);
        assert_eq!(parent.get(b"a/3").unwrap(), Some(vec![3]));
    }

    #[test]
    fn prefix_scan_merges_overlay() {
        let parent = seeded();
        let mut branch = CacheStore::new(&parent);
        branch.delete(b"a/1").unwrap();
        branch.set(b"a/0", vec![0]).unwrap();
        branch.set(b"b/0", vec![5]).unwrap();
        let keys: Vec<Vec<u8>> = branch
            .prefix_scan(b"a/")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"a/0".to_vec(), b"a/2".to_vec()]);
    }

    #[test]
    fn nested_branches_commit_inward() {
        let mut parent = seeded();
        let outer_writes = {
            let mut outer = CacheStore::new(&parent);
            let inner_writes = {
                let mut inner = CacheStore::new(&outer);
                inner.set(b"a/9", vec![9]).unwrap();
                inner.into_writes()
            };
            outer.apply(inner_writes).unwrap();
            assert_eq!(outer.get(b"a/9").unwrap(), Some(vec![9]));
            outer.into_writes()
        };
        assert_eq!(parent.get(b"a/9").unwrap(), None);
        parent.apply(outer_writes).unwrap();
        assert_eq!(parent.get(b"a/9").unwrap(), Some(vec![9]));
    }
}
