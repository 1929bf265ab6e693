//! Trigger table: exact input text mapped to a fixed reply.
//!
//! The table is built once at startup and shared read-only by every request.
//! Every entry is validated on insert, so a table that exists is a table the
//! reply API accepts.

use super::{errors::ConfigError, messages::OutboundMessage};
use crate::consts;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

/// Mapping from literal trigger text to a non-empty reply sequence
#[derive(Debug, Default, Clone)]
pub struct TriggerTable {
    entries: HashMap<String, Vec<OutboundMessage>>,
}

/// One entry of a trigger table file
#[derive(Debug, Deserialize)]
pub struct TriggerEntry {
    pub trigger: String,
    pub messages: Vec<OutboundMessage>,
}

impl TriggerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `messages` as the reply to `trigger`.
    ///
    /// Registering the same trigger twice keeps the last registration.
    pub fn insert(
        &mut self,
        trigger: impl Into<String>,
        messages: Vec<OutboundMessage>,
    ) -> Result<(), ConfigError> {
        let trigger = trigger.into();

        if messages.is_empty() {
            return Err(ConfigError::EmptyTrigger(trigger));
        }

        if messages.len() > consts::MAX_REPLY_MESSAGES {
            return Err(ConfigError::TooManyMessages {
                trigger,
                count: messages.len(),
            });
        }

        if self.entries.contains_key(&trigger) {
            warn!("Trigger {:?} registered twice, keeping the last one", trigger);
        }

        self.entries.insert(trigger, messages);
        Ok(())
    }

    /// Builder form of [`TriggerTable::insert`]
    pub fn with(
        mut self,
        trigger: impl Into<String>,
        messages: Vec<OutboundMessage>,
    ) -> Result<Self, ConfigError> {
        self.insert(trigger, messages)?;
        Ok(self)
    }

    /// Builds a table from entries in order, so later duplicates win.
    pub fn from_entries(
        entries: impl IntoIterator<Item = TriggerEntry>,
    ) -> Result<Self, ConfigError> {
        entries
            .into_iter()
            .try_fold(Self::new(), |table, entry| {
                table.with(entry.trigger, entry.messages)
            })
    }

    /// Exact, case-sensitive lookup. The text is not trimmed or normalized.
    pub fn get(&self, text: &str) -> Option<&[OutboundMessage]> {
        self.entries.get(text).map(Vec::as_slice)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered triggers in sorted order
    pub fn triggers(&self) -> Vec<&str> {
        let mut triggers: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        triggers.sort_unstable();
        triggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let table = TriggerTable::new()
            .with("hola", vec![OutboundMessage::text("mundo")])
            .unwrap();

        assert_eq!(table.get("hola"), Some(&[OutboundMessage::text("mundo")][..]));
        assert!(table.contains("hola"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = TriggerTable::new()
            .with("Hola", vec![OutboundMessage::text("mundo")])
            .unwrap();

        assert!(table.get("hola").is_none());
        assert!(table.get(" Hola").is_none());
        assert!(table.get("Hola ").is_none());
        assert!(table.get("Hola").is_some());
    }

    #[test]
    fn test_empty_messages_rejected() {
        let err = TriggerTable::new().with("hola", vec![]).unwrap_err();

        assert!(matches!(err, ConfigError::EmptyTrigger(ref t) if t == "hola"));
    }

    #[test]
    fn test_too_many_messages_rejected() {
        let messages = vec![OutboundMessage::text("x"); consts::MAX_REPLY_MESSAGES + 1];

        let err = TriggerTable::new().with("hola", messages).unwrap_err();

        assert!(matches!(err, ConfigError::TooManyMessages { count: 6, .. }));
    }

    #[test]
    fn test_max_messages_accepted() {
        let messages = vec![OutboundMessage::text("x"); consts::MAX_REPLY_MESSAGES];

        assert!(TriggerTable::new().with("hola", messages).is_ok());
    }

    #[test]
    fn test_duplicate_trigger_last_wins() {
        let table = TriggerTable::from_entries([
            TriggerEntry {
                trigger: "hola".into(),
                messages: vec![OutboundMessage::text("first")],
            },
            TriggerEntry {
                trigger: "hola".into(),
                messages: vec![OutboundMessage::text("second")],
            },
        ])
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get("hola"),
            Some(&[OutboundMessage::text("second")][..])
        );
    }

    #[test]
    fn test_triggers_sorted() {
        let table = TriggerTable::new()
            .with("b", vec![OutboundMessage::text("2")])
            .unwrap()
            .with("a", vec![OutboundMessage::text("1")])
            .unwrap();

        assert_eq!(table.triggers(), ["a", "b"]);
    }
}
