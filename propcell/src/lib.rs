// Copyright 2026 the Propcell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Propcell: Typed, observable property cells.
//!
//! This crate provides a reactive attribute framework: properties are
//! declared once per class as typed descriptors with validation
//! constraints, and each instance stores its values in observable cells
//! that notify named listeners on every real change.
//!
//! ## Core Concepts
//!
//! ### Descriptors and Values
//!
//! A [`PropertyType`] pairs a kind ([`PropertyKind`]) with constraints
//! (range, length, choice membership) and a default. Candidate values
//! are [`Value`]s; `validate` normalizes them (integer → real
//! promotion, optional clamping) or rejects them with a
//! [`ValidationError`].
//!
//! ### Cells and Listeners
//!
//! A [`PropertyValue`] is one mutable cell: current value, previous
//! value, validity flag, and an ordered registry of named listeners.
//! `set` validates, stores, and dispatches synchronously; listeners can
//! be disabled without losing their registry position, and whole cells
//! can have notification suppressed. [`PropertyValueList`] is the
//! list-valued counterpart, with per-element cells and structural
//! events ([`ListEvent`]).
//!
//! ### Hosts and Schemas
//!
//! A [`Schema`] maps names to shared descriptors in declaration order;
//! subclass schemas extend a parent and may narrow inherited
//! constraints. A [`PropertyHost`] pairs a schema with lazily created
//! cells and offers the name-keyed accessor surface; owning types
//! implement [`HasProperties`] to expose it.
//!
//! ### Bindings
//!
//! [`bind`] keeps two scalar cells synchronized (one- or two-way)
//! through ordinary listeners, with cycle-safe propagation.
//!
//! ## Quick Start
//!
//! ```rust
//! use propcell::{PropertyHost, PropertyType, SchemaBuilder, Value};
//!
//! let schema = SchemaBuilder::new()
//!     .property("enabled", PropertyType::boolean())
//!     .property(
//!         "threshold",
//!         PropertyType::real().with_min(0.0).with_max(1.0).with_default(0.5),
//!     )
//!     .property(
//!         "mode",
//!         PropertyType::choice(["fast", "accurate"]),
//!     )
//!     .build();
//!
//! let host = PropertyHost::new(schema);
//! assert_eq!(host.get("threshold").unwrap(), Value::Real(0.5));
//! assert_eq!(host.get("mode").unwrap(), Value::from("fast"));
//!
//! host.add_listener("enabled", "log", |change| {
//!     assert_eq!(change.name, "enabled");
//!     Ok(())
//! })
//! .unwrap();
//!
//! host.set("enabled", Value::Bool(true)).unwrap();
//! assert!(host.set("threshold", Value::Real(2.0)).is_err());
//! ```
//!
//! ## Threading
//!
//! Cells are single-threaded: handles are `Rc`-based and dispatch runs
//! on the calling thread. Share work across threads above this crate,
//! not through it.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod binding;
mod cell;
mod descriptor;
mod error;
mod host;
mod list;
mod schema;
mod value;

pub use binding::{BindMode, Binding, bind};
pub use cell::{Change, ListenerResult, PropertyValue, Suppressed, WeakPropertyValue};
pub use descriptor::{Constraint, PropertyType};
pub use error::{
    BindingError, DuplicateListenerError, ListenerError, ListenerFailure, ListenerFailures,
    PropertyError, SetError, UnknownListenerError, UnknownPropertyError, ValidationError,
    Violation, WrongKindError,
};
pub use host::{HasProperties, PropertyHost, PropertySlot};
pub use list::{ListChange, ListEvent, PropertyValueList, SuppressedList};
pub use schema::{Schema, SchemaBuilder};
pub use value::{PropertyKind, Value};
