//! Named participants and the ordered registry that defines who is "active".

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// A member of the expense-sharing group, identified solely by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    /// Builds a participant from a trimmed, non-empty name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, LedgerError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidParticipant(
                "participant name cannot be blank".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Participant {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered set of active participants with O(1) name lookup.
///
/// Removing a name never rewrites history: entries that still reference it are
/// simply ignored by the balance fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantRegistry {
    members: Vec<Participant>,
    index: HashMap<String, usize>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from names, skipping blanks and duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            if let Err(err) = registry.add(name.as_ref()) {
                tracing::debug!(%err, "skipping participant while building registry");
            }
        }
        registry
    }

    pub fn add(&mut self, name: &str) -> Result<Participant, LedgerError> {
        let participant = Participant::new(name)?;
        if self.index.contains_key(participant.name()) {
            return Err(LedgerError::InvalidParticipant(format!(
                "`{participant}` is already registered"
            )));
        }
        self.index
            .insert(participant.name().to_string(), self.members.len());
        self.members.push(participant.clone());
        Ok(participant)
    }

    /// Lookups match the stored, already-trimmed name exactly.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(position) = self.index.remove(name) else {
            return false;
        };
        self.members.remove(position);
        self.reindex();
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn get(&self, position: usize) -> Option<&Participant> {
        self.members.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.members.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.members.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn reindex(&mut self) {
        self.index = self
            .members
            .iter()
            .enumerate()
            .map(|(position, p)| (p.name().to_string(), position))
            .collect();
    }
}

impl Serialize for ParticipantRegistry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.members.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ParticipantRegistry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::from_names(names))
    }
}
