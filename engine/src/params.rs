//! Policy store: the persisted chain-wide auto-restake ratio.

use crate::error::RestakeError;
use restake_store::{get_typed, set_typed, KvStore};
use restake_types::Dec;
use tracing::error;

/// Store key of the ratio singleton.
pub const AUTO_RESTAKE_RATIO_KEY: &[u8] = b"restaking/auto_restake_ratio";

/// 0.25
pub const DEFAULT_AUTO_RESTAKE_RATIO: Dec = Dec::from_raw(250_000_000_000_000_000);

/// Reject ratios outside `[0, 1]`.
pub fn validate_ratio(ratio: Dec) -> Result<(), RestakeError> {
    if ratio.is_negative() || ratio > Dec::ONE {
        return Err(RestakeError::InvalidRatio(ratio));
    }
    Ok(())
}

/// Owns the auto-restake ratio. Readers get a handle to this rather than a
/// global.
#[derive(Clone, Copy, Debug)]
pub struct PolicyStore {
    default: Dec,
}

impl PolicyStore {
    pub fn new(default: Dec) -> Self {
        Self { default }
    }

    pub fn default_ratio(&self) -> Dec {
        self.default
    }

    /// The persisted ratio, or the default when unset.
    ///
    /// Never fails: an unreadable value is logged and the default returned.
    pub fn ratio(&self, store: &dyn KvStore) -> Dec {
        match get_typed::<Dec>(store, AUTO_RESTAKE_RATIO_KEY) {
            Ok(Some(ratio)) => ratio,
            Ok(None) => self.default,
            Err(e) => {
                error!(error = %e, "unreadable auto restake ratio, using default");
                self.default
            }
        }
    }

    /// Validate and persist a new ratio.
    pub fn set_ratio(&self, store: &mut dyn KvStore, ratio: Dec) -> Result<(), RestakeError> {
        validate_ratio(ratio)?;
        set_typed(store, AUTO_RESTAKE_RATIO_KEY, &ratio)?;
        Ok(())
    }

    /// Write the default ratio if none is persisted yet.
    pub fn initialize(&self, store: &mut dyn KvStore) -> Result<(), RestakeError> {
        if store.has(AUTO_RESTAKE_RATIO_KEY)? {
            return Ok(());
        }
        self.set_ratio(store, self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restake_store::MemStore;

    fn dec(s: &str) -> Dec {
        s.parse().unwrap()
    }

    #[test]
    fn unset_ratio_reads_default() {
        let store = MemStore::new();
        let policy = PolicyStore::new(DEFAULT_AUTO_RESTAKE_RATIO);
        assert_eq!(policy.ratio(&store), dec("0.25"));
    }

    #[test]
    fn set_ratio_bounds() {
        let mut store = MemStore::new();
        let policy = PolicyStore::new(DEFAULT_AUTO_RESTAKE_RATIO);

        for bad in ["-0.01", "1.01"] {
            let err = policy.set_ratio(&mut store, dec(bad)).unwrap_err();
            assert!(matches!(err, RestakeError::InvalidRatio(r) if r == dec(bad)));
        }
        assert!(store.is_empty());

        policy.set_ratio(&mut store, Dec::ZERO).unwrap();
        assert_eq!(policy.ratio(&store), Dec::ZERO);
        policy.set_ratio(&mut store, Dec::ONE).unwrap();
        assert_eq!(policy.ratio(&store), Dec::ONE);
    }

    #[test]
    fn initialize_does_not_overwrite() {
        let mut store = MemStore::new();
        let policy = PolicyStore::new(DEFAULT_AUTO_RESTAKE_RATIO);
        policy.initialize(&mut store).unwrap();
        assert!(store.has(AUTO_RESTAKE_RATIO_KEY).unwrap());

        policy.set_ratio(&mut store, dec("0.5")).unwrap();
        policy.initialize(&mut store).unwrap();
        assert_eq!(policy.ratio(&store), dec("0.5"));
    }

    #[test]
    fn corrupt_value_falls_back_to_default() {
        let mut store = MemStore::new();
        store.set(AUTO_RESTAKE_RATIO_KEY, vec![0xff]).unwrap();
        let policy = PolicyStore::new(dec("0.1"));
        assert_eq!(policy.ratio(&store), dec("0.1"));
    }
}
