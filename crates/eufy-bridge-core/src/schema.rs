//! Property schema entries and the resolver interface.

use crate::event::OwnerClass;
use serde::Serialize;

/// Declared value kind of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// `true`/`false`
    Boolean,
    /// Plain number
    Numeric,
    /// Numeric code with display labels
    Enumerated,
    /// Free-form text
    String,
}

/// A single schema catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Property {
    /// Property key as reported upstream
    pub key: &'static str,
    /// Declared value kind
    pub kind: PropertyKind,
    /// Unit of measurement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    /// Display labels for enumerated codes
    #[serde(skip_serializing_if = "no_labels")]
    pub labels: &'static [(i64, &'static str)],
}

impl Property {
    /// A boolean property.
    #[must_use]
    pub const fn boolean(key: &'static str) -> Self {
        Self {
            key,
            kind: PropertyKind::Boolean,
            unit: None,
            labels: &[],
        }
    }

    /// A plain numeric property.
    #[must_use]
    pub const fn numeric(key: &'static str, unit: Option<&'static str>) -> Self {
        Self {
            key,
            kind: PropertyKind::Numeric,
            unit,
            labels: &[],
        }
    }

    /// A numeric property whose codes map to display labels.
    #[must_use]
    pub const fn enumerated(key: &'static str, labels: &'static [(i64, &'static str)]) -> Self {
        Self {
            key,
            kind: PropertyKind::Enumerated,
            unit: None,
            labels,
        }
    }

    /// A text property.
    #[must_use]
    pub const fn string(key: &'static str) -> Self {
        Self {
            key,
            kind: PropertyKind::String,
            unit: None,
            labels: &[],
        }
    }

    /// Display label for an enumerated code.
    #[must_use]
    pub fn label(&self, code: i64) -> Option<&'static str> {
        self.labels
            .iter()
            .find(|(candidate, _)| *candidate == code)
            .map(|(_, label)| *label)
    }

    /// Whether values of this property are numbers.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.kind, PropertyKind::Numeric | PropertyKind::Enumerated)
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_labels(labels: &&'static [(i64, &'static str)]) -> bool {
    labels.is_empty()
}

/// Read-only lookup of property schemas by owner type.
///
/// A key missing from [`SchemaResolver::declared`] is unsupported for that
/// owner type; callers skip it rather than guess its kind.
pub trait SchemaResolver: Send + Sync {
    /// The always-present descriptive subset published as attributes.
    fn generic(&self, class: OwnerClass) -> &[Property];

    /// Every property the given owner type exposes, in catalog order.
    fn declared(&self, class: OwnerClass, type_tag: u16) -> &[Property];

    /// Resolve a single key for an owner type.
    fn resolve(&self, class: OwnerClass, type_tag: u16, key: &str) -> Option<&Property> {
        self.declared(class, type_tag)
            .iter()
            .find(|property| property.key == key)
    }

    /// Whether `key` belongs to the generic attribute subset.
    fn is_generic(&self, class: OwnerClass, key: &str) -> bool {
        self.generic(class).iter().any(|property| property.key == key)
    }
}

/// Errors raised while interpreting catalog queries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// Owner class other than `device` or `station`
    #[error("unknown owner class: {0}")]
    UnknownClass(String),
    /// Type tag that is not a number or not in the catalog
    #[error("unknown device type: {0}")]
    UnknownType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODE: Property = Property::enumerated("mode", &[(0, "Away"), (1, "Home")]);

    #[test]
    fn label_lookup() {
        assert_eq!(MODE.label(1), Some("Home"));
        assert_eq!(MODE.label(7), None);
        assert!(MODE.is_numeric());
        assert!(!Property::boolean("enabled").is_numeric());
    }

    #[test]
    fn serializes_without_empty_metadata() {
        let json = serde_json::to_value(Property::boolean("enabled")).unwrap();
        assert_eq!(json, serde_json::json!({ "key": "enabled", "kind": "boolean" }));
    }
}
