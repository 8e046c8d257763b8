// Copyright 2026 the Propcell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property hosts: per-instance orchestration over a shared schema.
//!
//! A [`PropertyHost`] pairs a class-level [`Schema`] with one lazily
//! materialized cell per schema entry. No cell exists until a property
//! is first accessed; materialization initializes the cell from the
//! descriptor's default value. Owning types embed a host and either use
//! it directly or implement [`HasProperties`] for the delegating
//! accessor surface.
//!
//! # Example
//!
//! ```rust
//! use propcell::{HasProperties, PropertyHost, PropertyType, SchemaBuilder, Value};
//!
//! struct Playback {
//!     props: PropertyHost,
//! }
//!
//! impl Playback {
//!     fn new() -> Self {
//!         let schema = SchemaBuilder::new()
//!             .property("muted", PropertyType::boolean())
//!             .property("volume", PropertyType::int().with_min(0).with_max(11).with_default(5))
//!             .build();
//!         Self {
//!             props: PropertyHost::new(schema),
//!         }
//!     }
//! }
//!
//! impl HasProperties for Playback {
//!     fn host(&self) -> &PropertyHost {
//!         &self.props
//!     }
//! }
//!
//! let playback = Playback::new();
//! assert_eq!(playback.get("volume").unwrap(), Value::Int(5));
//! playback.set("muted", Value::Bool(true)).unwrap();
//! assert!(playback.set("volume", Value::Int(99)).is_err());
//! ```

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::cell::{Change, ListenerResult, PropertyValue};
use crate::descriptor::PropertyType;
use crate::error::{
    PropertyError, UnknownPropertyError, ValidationError, Violation, WrongKindError,
};
use crate::list::PropertyValueList;
use crate::schema::Schema;
use crate::value::{PropertyKind, Value};

/// One materialized property cell: scalar or list.
///
/// `value` accessors hand this out so callers can branch on kind before
/// choosing the scalar or the list API.
#[derive(Clone, Debug)]
pub enum PropertySlot {
    /// A scalar cell.
    Scalar(PropertyValue),
    /// A list cell with structural events.
    List(PropertyValueList),
}

impl PropertySlot {
    /// Returns the scalar handle, if this is a scalar slot.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&PropertyValue> {
        match self {
            Self::Scalar(cell) => Some(cell),
            Self::List(_) => None,
        }
    }

    /// Returns the list handle, if this is a list slot.
    #[must_use]
    pub fn as_list(&self) -> Option<&PropertyValueList> {
        match self {
            Self::Scalar(_) => None,
            Self::List(list) => Some(list),
        }
    }
}

/// The owning side of a set of properties.
///
/// Aggregates a fixed schema (built once per class) and the
/// per-instance cells (materialized on first access). All name-keyed
/// accessors fail with [`UnknownPropertyError`] for names absent from
/// the schema.
pub struct PropertyHost {
    schema: Schema,
    slots: RefCell<Vec<Option<PropertySlot>>>,
}

impl PropertyHost {
    /// Creates a host over the given schema with no cells materialized.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        let slots = RefCell::new((0..schema.len()).map(|_| None).collect());
        Self { schema, slots }
    }

    /// Returns the schema this host was built over.
    #[must_use]
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the property names in schema declaration order.
    ///
    /// The order is stable; CLI and GUI generators rely on it for
    /// deterministic layout.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.schema.names()
    }

    /// Looks up a property's descriptor.
    ///
    /// # Errors
    ///
    /// - [`UnknownPropertyError`]: the name is not in the schema.
    pub fn property_type(&self, name: &str) -> Result<Rc<PropertyType>, UnknownPropertyError> {
        self.schema.property_type(name)
    }

    fn index_of(&self, name: &str) -> Result<usize, UnknownPropertyError> {
        self.schema
            .index_of(name)
            .ok_or_else(|| UnknownPropertyError { name: name.into() })
    }

    fn materialize(&self, index: usize) -> PropertySlot {
        let mut slots = self.slots.borrow_mut();
        if let Some(slot) = &slots[index] {
            return slot.clone();
        }
        let ty = self.schema.shared_type_at(index);
        let name = self.schema.name_at(index).to_string();
        let slot = if ty.kind() == PropertyKind::List {
            PropertySlot::List(PropertyValueList::from_shared_type(name, ty))
        } else {
            PropertySlot::Scalar(PropertyValue::from_shared_type(name, ty))
        };
        slots[index] = Some(slot.clone());
        slot
    }

    /// Returns the cell for a property, materializing it on first
    /// access.
    ///
    /// # Errors
    ///
    /// - [`UnknownPropertyError`]: the name is not in the schema.
    pub fn value(&self, name: &str) -> Result<PropertySlot, UnknownPropertyError> {
        let index = self.index_of(name)?;
        Ok(self.materialize(index))
    }

    /// Returns the scalar cell for a property.
    ///
    /// # Errors
    ///
    /// - [`PropertyError::UnknownProperty`]: the name is not in the
    ///   schema.
    /// - [`PropertyError::WrongKind`]: the property is list-kind.
    pub fn scalar(&self, name: &str) -> Result<PropertyValue, PropertyError> {
        match self.value(name)? {
            PropertySlot::Scalar(cell) => Ok(cell),
            PropertySlot::List(list) => Err(WrongKindError {
                name: name.into(),
                kind: list.property_type().kind(),
            }
            .into()),
        }
    }

    /// Returns the list cell for a property.
    ///
    /// # Errors
    ///
    /// - [`PropertyError::UnknownProperty`]: the name is not in the
    ///   schema.
    /// - [`PropertyError::WrongKind`]: the property is scalar.
    pub fn list(&self, name: &str) -> Result<PropertyValueList, PropertyError> {
        match self.value(name)? {
            PropertySlot::List(list) => Ok(list),
            PropertySlot::Scalar(cell) => Err(WrongKindError {
                name: name.into(),
                kind: cell.property_type().kind(),
            }
            .into()),
        }
    }

    /// Returns a property's current value.
    ///
    /// # Errors
    ///
    /// - [`UnknownPropertyError`]: the name is not in the schema.
    pub fn get(&self, name: &str) -> Result<Value, UnknownPropertyError> {
        Ok(match self.value(name)? {
            PropertySlot::Scalar(cell) => cell.get(),
            PropertySlot::List(list) => list.get(),
        })
    }

    /// Sets a property's value.
    ///
    /// Scalar writes route to [`PropertyValue::set`]; a [`Value::List`]
    /// written to a list property routes to
    /// [`PropertyValueList::set_all`].
    ///
    /// # Errors
    ///
    /// - [`PropertyError::UnknownProperty`]: the name is not in the
    ///   schema.
    /// - [`PropertyError::Validation`]: the candidate was rejected;
    ///   storage is unchanged.
    /// - [`PropertyError::Listeners`]: the value was stored but
    ///   listeners failed.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), PropertyError> {
        let candidate = value.into();
        match self.value(name)? {
            PropertySlot::Scalar(cell) => cell.set(candidate).map_err(PropertyError::from),
            PropertySlot::List(list) => match candidate {
                Value::List(values) => list.set_all(values).map_err(PropertyError::from),
                other => Err(ValidationError::new(
                    other.clone(),
                    Violation::KindMismatch {
                        expected: PropertyKind::List,
                        actual: other.kind(),
                    },
                )
                .into()),
            },
        }
    }

    /// Returns the value a scalar property held before its last real
    /// change.
    ///
    /// # Errors
    ///
    /// - [`PropertyError::UnknownProperty`] /
    ///   [`PropertyError::WrongKind`].
    pub fn last_value(&self, name: &str) -> Result<Value, PropertyError> {
        Ok(self.scalar(name)?.last_value())
    }

    /// Returns whether a property's current value satisfies its
    /// descriptor.
    ///
    /// # Errors
    ///
    /// - [`UnknownPropertyError`]: the name is not in the schema.
    pub fn is_valid(&self, name: &str) -> Result<bool, UnknownPropertyError> {
        Ok(match self.value(name)? {
            PropertySlot::Scalar(cell) => cell.is_valid(),
            PropertySlot::List(list) => {
                let ty = list.property_type();
                ty.validate(&list.get()).is_ok()
            }
        })
    }

    /// Validates every property's current value, returning the invalid
    /// ones with their failures. Materializes every cell.
    #[must_use]
    pub fn validate_all(&self) -> Vec<(String, ValidationError)> {
        let mut invalid = Vec::new();
        for index in 0..self.schema.len() {
            let name = self.schema.name_at(index).to_string();
            let ty = self.schema.shared_type_at(index);
            let current = match self.materialize(index) {
                PropertySlot::Scalar(cell) => cell.get(),
                PropertySlot::List(list) => list.get(),
            };
            if let Err(err) = ty.validate(&current) {
                invalid.push((name, err));
            }
        }
        invalid
    }

    /// Registers a change listener on a scalar property.
    ///
    /// For list properties, fetch the list cell with
    /// [`PropertyHost::list`] and register a structural listener there.
    ///
    /// # Errors
    ///
    /// - [`PropertyError::UnknownProperty`] /
    ///   [`PropertyError::WrongKind`] /
    ///   [`PropertyError::DuplicateListener`].
    pub fn add_listener<F>(
        &self,
        name: &str,
        listener_name: impl Into<String>,
        callback: F,
    ) -> Result<(), PropertyError>
    where
        F: Fn(&Change<'_>) -> ListenerResult + 'static,
    {
        self.scalar(name)?
            .add_listener(listener_name, callback)
            .map_err(PropertyError::from)
    }

    /// Removes a change listener from a scalar property.
    ///
    /// # Errors
    ///
    /// - [`PropertyError::UnknownProperty`] /
    ///   [`PropertyError::WrongKind`] /
    ///   [`PropertyError::UnknownListener`].
    pub fn remove_listener(&self, name: &str, listener_name: &str) -> Result<(), PropertyError> {
        self.scalar(name)?
            .remove_listener(listener_name)
            .map_err(PropertyError::from)
    }

    /// Re-enables a change listener on a scalar property.
    ///
    /// # Errors
    ///
    /// - [`PropertyError::UnknownProperty`] /
    ///   [`PropertyError::WrongKind`] /
    ///   [`PropertyError::UnknownListener`].
    pub fn enable_listener(&self, name: &str, listener_name: &str) -> Result<(), PropertyError> {
        self.scalar(name)?
            .enable_listener(listener_name)
            .map_err(PropertyError::from)
    }

    /// Disables a change listener on a scalar property without removing
    /// it.
    ///
    /// # Errors
    ///
    /// - [`PropertyError::UnknownProperty`] /
    ///   [`PropertyError::WrongKind`] /
    ///   [`PropertyError::UnknownListener`].
    pub fn disable_listener(&self, name: &str, listener_name: &str) -> Result<(), PropertyError> {
        self.scalar(name)?
            .disable_listener(listener_name)
            .map_err(PropertyError::from)
    }

    /// Enables change notification for one property.
    ///
    /// # Errors
    ///
    /// - [`UnknownPropertyError`]: the name is not in the schema.
    pub fn enable_notification(&self, name: &str) -> Result<(), UnknownPropertyError> {
        match self.value(name)? {
            PropertySlot::Scalar(cell) => cell.enable_notification(),
            PropertySlot::List(list) => list.enable_notification(),
        }
        Ok(())
    }

    /// Disables change notification for one property.
    ///
    /// # Errors
    ///
    /// - [`UnknownPropertyError`]: the name is not in the schema.
    pub fn disable_notification(&self, name: &str) -> Result<(), UnknownPropertyError> {
        match self.value(name)? {
            PropertySlot::Scalar(cell) => cell.disable_notification(),
            PropertySlot::List(list) => list.disable_notification(),
        }
        Ok(())
    }

    /// Enables change notification for every property. Materializes
    /// every cell.
    pub fn enable_all_notification(&self) {
        for index in 0..self.schema.len() {
            match self.materialize(index) {
                PropertySlot::Scalar(cell) => cell.enable_notification(),
                PropertySlot::List(list) => list.enable_notification(),
            }
        }
    }

    /// Disables change notification for every property. Materializes
    /// every cell.
    pub fn disable_all_notification(&self) {
        for index in 0..self.schema.len() {
            match self.materialize(index) {
                PropertySlot::Scalar(cell) => cell.disable_notification(),
                PropertySlot::List(list) => list.disable_notification(),
            }
        }
    }
}

impl fmt::Debug for PropertyHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let materialized = self
            .slots
            .borrow()
            .iter()
            .filter(|slot| slot.is_some())
            .count();
        f.debug_struct("PropertyHost")
            .field("schema", &self.schema)
            .field("materialized", &materialized)
            .finish()
    }
}

/// Delegating accessor surface for types that embed a [`PropertyHost`].
///
/// Implementors only provide [`HasProperties::host`]; the rest of the
/// surface routes through it.
pub trait HasProperties {
    /// Returns the embedded host.
    fn host(&self) -> &PropertyHost;

    /// See [`PropertyHost::get`].
    ///
    /// # Errors
    ///
    /// - [`UnknownPropertyError`]: the name is not in the schema.
    fn get(&self, name: &str) -> Result<Value, UnknownPropertyError> {
        self.host().get(name)
    }

    /// See [`PropertyHost::set`].
    ///
    /// # Errors
    ///
    /// - [`PropertyError`]: unknown name, rejected candidate, or failed
    ///   listeners.
    fn set(&self, name: &str, value: Value) -> Result<(), PropertyError> {
        self.host().set(name, value)
    }

    /// See [`PropertyHost::value`].
    ///
    /// # Errors
    ///
    /// - [`UnknownPropertyError`]: the name is not in the schema.
    fn value(&self, name: &str) -> Result<PropertySlot, UnknownPropertyError> {
        self.host().value(name)
    }

    /// See [`PropertyHost::property_names`].
    fn property_names(&self) -> Vec<String> {
        self.host().property_names().map(String::from).collect()
    }
}
