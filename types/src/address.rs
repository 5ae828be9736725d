//! Account and validator-operator addresses.
//!
//! Both are human-readable strings made of a fixed prefix and a lowercase
//! alphanumeric body. Parsing never panics; malformed input yields
//! [`TypesError::InvalidAddress`] so message handlers can reject it cleanly.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MIN_BODY_LEN: usize = 8;
const MAX_BODY_LEN: usize = 64;

fn validate(prefix: &str, raw: &str) -> Result<(), TypesError> {
    let body = raw
        .strip_prefix(prefix)
        .ok_or_else(|| TypesError::InvalidAddress(format!("{raw:?} must start with {prefix}")))?;
    if body.len() < MIN_BODY_LEN || body.len() > MAX_BODY_LEN {
        return Err(TypesError::InvalidAddress(format!(
            "{raw:?} body must be {MIN_BODY_LEN}..={MAX_BODY_LEN} characters"
        )));
    }
    if !body
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        return Err(TypesError::InvalidAddress(format!(
            "{raw:?} body must be lowercase alphanumeric"
        )));
    }
    Ok(())
}

/// An account (delegator) address, always prefixed with `rsk1`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    pub const PREFIX: &'static str = "rsk1";

    /// Parse and validate an account address.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        validate(Self::PREFIX, &s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<AccountAddress> for String {
    fn from(addr: AccountAddress) -> Self {
        addr.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validator operator address, always prefixed with `rskvaloper1`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValidatorAddress(String);

impl ValidatorAddress {
    pub const PREFIX: &'static str = "rskvaloper1";

    /// Parse and validate a validator operator address.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        validate(Self::PREFIX, &s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ValidatorAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ValidatorAddress {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<ValidatorAddress> for String {
    fn from(addr: ValidatorAddress) -> Self {
        addr.0
    }
}

impl fmt::Display for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_addresses() {
        let acct = AccountAddress::parse("rsk1delegator01").unwrap();
        assert_eq!(acct.as_str(), "rsk1delegator01");
        let val: ValidatorAddress = "rskvaloper1validator01".parse().unwrap();
        assert_eq!(val.to_string(), "rskvaloper1validator01");
    }

    #[test]
    fn rejects_wrong_prefix() {
        assert!(AccountAddress::parse("rskvaloper1validator01").is_err());
        assert!(ValidatorAddress::parse("rsk1delegator01").is_err());
    }

    #[test]
    fn rejects_short_and_uppercase_bodies() {
        assert!(AccountAddress::parse("rsk1abc").is_err());
        assert!(AccountAddress::parse("rsk1DELEGATOR01").is_err());
        assert!(AccountAddress::parse("").is_err());
    }

    #[test]
    fn serde_rejects_malformed_address() {
        let parsed: Result<AccountAddress, _> = serde_json::from_str("\"nope\"");
        assert!(parsed.is_err());
        let ok: AccountAddress = serde_json::from_str("\"rsk1delegator01\"").unwrap();
        assert_eq!(ok.as_str(), "rsk1delegator01");
    }
}
