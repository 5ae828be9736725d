//! String-attributed events emitted while executing messages.
//!
//! Modules never call each other to announce what happened; they append an
//! [`Event`] to the block's log and other modules read the log. Attribute
//! values are plain strings, so readers must tolerate missing or malformed
//! attributes.

use serde::{Deserialize, Serialize};

/// Well-known event kinds.
pub mod kinds {
    pub const TRANSFER: &str = "transfer";
    pub const MINT: &str = "mint";
    pub const DELEGATE: &str = "delegate";
    pub const UNBOND: &str = "unbond";
    pub const COMPLETE_UNBONDING: &str = "complete_unbonding";
    pub const WITHDRAW_REWARDS: &str = "withdraw_rewards";
}

/// Well-known attribute keys.
pub mod keys {
    pub const SENDER: &str = "sender";
    pub const RECIPIENT: &str = "recipient";
    pub const DELEGATOR: &str = "delegator";
    pub const VALIDATOR: &str = "validator";
    pub const AMOUNT: &str = "amount";
    pub const SHARES: &str = "shares";
    pub const COMPLETION_TIME: &str = "completion_time";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Builder-style attribute append.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push(Attribute {
            key: key.into(),
            value: value.to_string(),
        });
        self
    }

    /// The value of the last attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_lookup_prefers_last_value() {
        let event = Event::new(kinds::TRANSFER)
            .with_attribute(keys::AMOUNT, "1ulbt")
            .with_attribute(keys::AMOUNT, "2ulbt");
        assert_eq!(event.attribute(keys::AMOUNT), Some("2ulbt"));
        assert_eq!(event.attribute(keys::SENDER), None);
        assert!(event.is(kinds::TRANSFER));
    }
}
