// Copyright 2026 the Propcell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host schemas: the name → descriptor mapping built once per class.
//!
//! A [`Schema`] is an immutable, ordered mapping from property names to
//! shared [`PropertyType`] descriptors. It is built once with a
//! [`SchemaBuilder`] and then cheaply cloned into every host instance;
//! declaration order is stable and is what metadata consumers iterate
//! for deterministic layout.
//!
//! Subclass schemas are built by explicit composition: start a builder
//! with [`SchemaBuilder::extending`], append new properties, and narrow
//! inherited ones with [`SchemaBuilder::narrow`]. Narrowing may tighten
//! constraints but never changes a property's kind.
//!
//! # Example
//!
//! ```rust
//! use propcell::{PropertyType, SchemaBuilder};
//!
//! let base = SchemaBuilder::new()
//!     .property("enabled", PropertyType::boolean())
//!     .property("threshold", PropertyType::real().with_min(0.0))
//!     .build();
//!
//! let derived = SchemaBuilder::extending(&base)
//!     .property("label", PropertyType::string())
//!     .narrow("threshold", PropertyType::real().with_min(0.0).with_max(1.0))
//!     .build();
//!
//! let names: Vec<_> = derived.names().collect();
//! assert_eq!(names, ["enabled", "threshold", "label"]);
//! ```

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::descriptor::PropertyType;
use crate::error::UnknownPropertyError;

struct SchemaInner {
    entries: Vec<(String, Rc<PropertyType>)>,
    by_name: HashMap<String, usize>,
}

/// An immutable, ordered name → descriptor mapping.
///
/// Cloning is cheap; clones share the same entries. Built once per
/// concrete host class via [`SchemaBuilder`] and never mutated after
/// construction.
#[derive(Clone)]
pub struct Schema {
    inner: Rc<SchemaInner>,
}

impl Schema {
    /// Returns the number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Returns `true` if no properties are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Returns the property names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the (name, descriptor) pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyType)> {
        self.inner
            .entries
            .iter()
            .map(|(name, ty)| (name.as_str(), ty.as_ref()))
    }

    /// Looks up a descriptor by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyType> {
        self.index_of(name).map(|i| self.inner.entries[i].1.as_ref())
    }

    /// Returns the declaration position of a property.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.inner.by_name.get(name).copied()
    }

    /// Looks up a shared descriptor handle by name.
    ///
    /// # Errors
    ///
    /// - [`UnknownPropertyError`]: the name is not in the schema.
    pub fn property_type(&self, name: &str) -> Result<Rc<PropertyType>, UnknownPropertyError> {
        match self.index_of(name) {
            Some(index) => Ok(Rc::clone(&self.inner.entries[index].1)),
            None => Err(UnknownPropertyError { name: name.into() }),
        }
    }

    pub(crate) fn shared_type_at(&self, index: usize) -> Rc<PropertyType> {
        Rc::clone(&self.inner.entries[index].1)
    }

    pub(crate) fn name_at(&self, index: usize) -> &str {
        &self.inner.entries[index].0
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("count", &self.len())
            .field("properties", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Schema`].
///
/// Declaration mistakes — duplicate names, narrowing an absent property,
/// narrowing to a different kind — are programmer errors and panic at
/// schema construction time.
#[derive(Default)]
pub struct SchemaBuilder {
    entries: Vec<(String, Rc<PropertyType>)>,
    by_name: HashMap<String, usize>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-populated with a parent schema's entries,
    /// for subclass schemas.
    #[must_use]
    pub fn extending(parent: &Schema) -> Self {
        Self {
            entries: parent.inner.entries.clone(),
            by_name: parent.inner.by_name.clone(),
        }
    }

    /// Declares a property.
    ///
    /// # Panics
    ///
    /// Panics if a property with the same name is already declared.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, ty: PropertyType) -> Self {
        let name = name.into();
        assert!(
            !self.by_name.contains_key(&name),
            "property '{name}' is already declared"
        );
        self.by_name.insert(name.clone(), self.entries.len());
        self.entries.push((name, Rc::new(ty)));
        self
    }

    /// Replaces an inherited property's descriptor with a narrowed one.
    ///
    /// The property keeps its declaration position.
    ///
    /// # Panics
    ///
    /// Panics if the property is not declared, or if the replacement
    /// changes its kind.
    #[must_use]
    pub fn narrow(mut self, name: &str, ty: PropertyType) -> Self {
        let index = *self
            .by_name
            .get(name)
            .unwrap_or_else(|| panic!("cannot narrow undeclared property '{name}'"));
        let old_kind = self.entries[index].1.kind();
        assert!(
            old_kind == ty.kind(),
            "narrowing may not change the kind of '{name}' ({old_kind} -> {})",
            ty.kind()
        );
        self.entries[index].1 = Rc::new(ty);
        self
    }

    /// Builds the immutable schema.
    #[must_use]
    pub fn build(self) -> Schema {
        Schema {
            inner: Rc::new(SchemaInner {
                entries: self.entries,
                by_name: self.by_name,
            }),
        }
    }
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PropertyKind;
    use alloc::vec;

    #[test]
    fn declaration_order_is_stable() {
        let schema = SchemaBuilder::new()
            .property("c", PropertyType::boolean())
            .property("a", PropertyType::int())
            .property("b", PropertyType::string())
            .build();

        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(schema.index_of("a"), Some(1));
    }

    #[test]
    fn lookup() {
        let schema = SchemaBuilder::new()
            .property("flag", PropertyType::boolean())
            .build();

        assert_eq!(schema.get("flag").map(PropertyType::kind), Some(PropertyKind::Bool));
        assert!(schema.get("missing").is_none());
        assert_eq!(
            schema.property_type("missing").unwrap_err(),
            UnknownPropertyError {
                name: "missing".into()
            }
        );
    }

    #[test]
    #[should_panic(expected = "already declared")]
    fn duplicate_name_panics() {
        let _ = SchemaBuilder::new()
            .property("x", PropertyType::int())
            .property("x", PropertyType::int());
    }

    #[test]
    fn extending_inherits_and_appends() {
        let base = SchemaBuilder::new()
            .property("a", PropertyType::int())
            .build();
        let derived = SchemaBuilder::extending(&base)
            .property("b", PropertyType::boolean())
            .build();

        assert_eq!(derived.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn narrow_keeps_position_and_tightens() {
        let base = SchemaBuilder::new()
            .property("n", PropertyType::int())
            .property("flag", PropertyType::boolean())
            .build();
        let derived = SchemaBuilder::extending(&base)
            .narrow("n", PropertyType::int().with_min(0).with_max(5))
            .build();

        assert_eq!(derived.names().collect::<Vec<_>>(), vec!["n", "flag"]);
        let narrowed = derived.get("n").unwrap();
        assert!(narrowed.validate(&crate::Value::Int(6)).is_err());
    }

    #[test]
    #[should_panic(expected = "may not change the kind")]
    fn narrow_cannot_change_kind() {
        let base = SchemaBuilder::new()
            .property("n", PropertyType::int())
            .build();
        let _ = SchemaBuilder::extending(&base).narrow("n", PropertyType::boolean());
    }

    #[test]
    #[should_panic(expected = "undeclared property")]
    fn narrow_requires_presence() {
        let _ = SchemaBuilder::new().narrow("ghost", PropertyType::int());
    }
}
