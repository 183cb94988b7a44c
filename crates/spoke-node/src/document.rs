//! Persisted scene document format
//!
//! A document is a flat list of entities. Each entity carries its parent,
//! its index among siblings and a list of `{name, props}` component records.
//! Unknown keys inside `props` are ignored and missing optional keys default.

use crate::error::{DeserializeError, DocumentError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Current document version
pub const DOCUMENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

/// A persisted scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Scene name
    #[serde(default)]
    pub name: String,
    /// Entities in parent-before-child order
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

impl SceneDocument {
    /// Create an empty document
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            name: name.into(),
            entities: Vec::new(),
        }
    }

    /// Parse a document from JSON
    ///
    /// # Errors
    /// Returns [`DocumentError`] on malformed JSON or a newer version.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: Self = serde_json::from_str(json)?;
        if document.version > DOCUMENT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: document.version,
                supported: DOCUMENT_VERSION,
            });
        }
        Ok(document)
    }

    /// Write the document as pretty JSON
    ///
    /// # Errors
    /// Returns [`DocumentError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find an entity by uuid
    #[must_use]
    pub fn entity(&self, uuid: &Uuid) -> Option<&EntityRecord> {
        self.entities.iter().find(|e| &e.uuid == uuid)
    }
}

/// A persisted node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Node identity
    pub uuid: Uuid,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Parent entity, `None` for scene roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Uuid>,
    /// Position among siblings
    #[serde(default)]
    pub index: usize,
    /// Component records
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
}

impl EntityRecord {
    /// Find a component record by name
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&ComponentRecord> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Check for a component record
    #[inline]
    #[must_use]
    pub fn has_component(&self, name: &str) -> bool {
        self.component(name).is_some()
    }

    /// Decode the props of a required component
    ///
    /// # Errors
    /// [`DeserializeError::MissingComponent`] if absent,
    /// [`DeserializeError::InvalidProps`] if malformed.
    pub fn props<T: DeserializeOwned>(&self, name: &'static str) -> Result<T, DeserializeError> {
        let component = self
            .component(name)
            .ok_or_else(|| DeserializeError::MissingComponent {
                entity: self.uuid.to_string(),
                component: name,
            })?;
        component.decode(&self.uuid)
    }

    /// Decode the props of an optional component, defaulting when absent
    ///
    /// # Errors
    /// [`DeserializeError::InvalidProps`] if present but malformed.
    pub fn optional_props<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, DeserializeError> {
        match self.component(name) {
            Some(component) => component.decode(&self.uuid),
            None => Ok(T::default()),
        }
    }
}

/// A named property bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Component identifier
    pub name: String,
    /// Arbitrary props
    #[serde(default)]
    pub props: Value,
}

impl ComponentRecord {
    /// Create a component record
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, props: Value) -> Self {
        Self {
            name: name.into(),
            props,
        }
    }

    fn decode<T: DeserializeOwned>(&self, entity: &Uuid) -> Result<T, DeserializeError> {
        // null props behave like an empty object so struct defaults apply
        let props = if self.props.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            self.props.clone()
        };

        serde_json::from_value(props).map_err(|source| DeserializeError::InvalidProps {
            entity: entity.to_string(),
            component: self.name.clone(),
            source,
        })
    }
}
