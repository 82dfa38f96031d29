//! Topic data model and JSON payload shape.

use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

use crate::{TopicsError, TopicsResult};

/// Labels every stored topic carries, in hierarchy order.
pub const BASE_LABELS: [&str; 3] = ["Thing", "Concept", "Topic"];

/// A topic as exchanged over JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub uuid: String,
    #[serde(rename = "prefLabel", default)]
    pub pref_label: String,
    #[serde(rename = "alternativeIdentifiers", default)]
    pub alternative_identifiers: AlternativeIdentifiers,
    /// Graph labels of the stored node. Filled on read, ignored on write.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

/// Foreign identifiers of a topic, partitioned by scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeIdentifiers {
    #[serde(
        rename = "TME",
        default,
        deserialize_with = "nullable_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tme: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub uuids: Vec<String>,
}

/// Identifier schemes; each maps to its own node label in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierScheme {
    Tme,
    Upp,
}

impl IdentifierScheme {
    pub const ALL: [IdentifierScheme; 2] = [IdentifierScheme::Tme, IdentifierScheme::Upp];

    /// The Neo4j node label for identifiers of this scheme.
    pub fn label(&self) -> &'static str {
        match self {
            IdentifierScheme::Tme => "TMEIdentifier",
            IdentifierScheme::Upp => "UPPIdentifier",
        }
    }
}

impl AlternativeIdentifiers {
    /// Values supplied for one scheme.
    pub fn values(&self, scheme: IdentifierScheme) -> &[String] {
        match scheme {
            IdentifierScheme::Tme => &self.tme,
            IdentifierScheme::Upp => &self.uuids,
        }
    }

    /// Every `(scheme, value)` pair, TME first.
    pub fn iter(&self) -> impl Iterator<Item = (IdentifierScheme, &str)> + '_ {
        IdentifierScheme::ALL
            .into_iter()
            .flat_map(move |scheme| {
                self.values(scheme)
                    .iter()
                    .map(move |v| (scheme, v.as_str()))
            })
    }

    pub fn len(&self) -> usize {
        self.tme.len() + self.uuids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Topic {
    pub fn new(uuid: impl Into<String>, pref_label: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            pref_label: pref_label.into(),
            ..Default::default()
        }
    }

    pub fn with_tme(mut self, value: impl Into<String>) -> Self {
        self.alternative_identifiers.tme.push(value.into());
        self
    }

    pub fn with_upp(mut self, value: impl Into<String>) -> Self {
        self.alternative_identifiers.uuids.push(value.into());
        self
    }

    /// Decode a topic from a JSON body.
    pub fn from_json(body: &[u8]) -> TopicsResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Decode a topic from a JSON stream.
    pub fn from_reader(reader: impl Read) -> TopicsResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Fail when the payload UUID differs from the one it is addressed to.
    pub fn ensure_uuid(&self, expected: &str) -> TopicsResult<()> {
        if self.uuid != expected {
            return Err(TopicsError::UuidMismatch {
                expected: expected.to_string(),
                found: self.uuid.clone(),
            });
        }
        Ok(())
    }

    /// Put `types` in canonical order: the base labels first, then the rest
    /// alphabetically.
    pub fn sort_types(&mut self) {
        self.types.sort_by_key(|label| {
            let rank = BASE_LABELS
                .iter()
                .position(|base| *base == label.as_str())
                .unwrap_or(BASE_LABELS.len());
            (rank, label.clone())
        });
        self.types.dedup();
    }
}

/// Accept `null` wherever a list is expected.
fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
