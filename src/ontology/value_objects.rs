use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use oxrdf::NamedNode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Value object ensuring that supplied text represents a valid IRI.
///
/// The IRI is the sole identity of an ontology class; two classes with the
/// same IRI are the same class regardless of their other fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri {
    value: String,
}

impl Iri {
    /// Validates and constructs a new [`Iri`] value object.
    ///
    /// The constructor rejects malformed identifiers in order to guarantee that
    /// every class uses canonical identifiers.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        NamedNode::new(value.as_str()).map_err(|_| IriError::Invalid {
            value: value.clone(),
        })?;
        Ok(Self { value })
    }

    /// Resolves a caller supplied identifier against a namespace.
    ///
    /// Absolute IRIs are accepted as-is, anything else is treated as a local
    /// identifier and appended to `namespace`.
    pub fn resolve(raw: &str, namespace: &str) -> Result<Self, IriError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(IriError::Invalid {
                value: raw.to_string(),
            });
        }
        if let Ok(iri) = Self::new(raw) {
            return Ok(iri);
        }
        Self::new(format!("{namespace}{raw}"))
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the trailing segment after the last `/` or `#`.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.value
            .rsplit(['/', '#'])
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or(&self.value)
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for Iri {
    type Error = IriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Iri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for Iri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Errors produced when validating an [`Iri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text could not be parsed as an IRI.
    #[error("invalid IRI: {value}")]
    Invalid { value: String },
}
