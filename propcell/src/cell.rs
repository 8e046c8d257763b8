// Copyright 2026 the Propcell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar property cells and their listener registries.
//!
//! A [`PropertyValue`] is the per-instance mutable cell behind one
//! property: the current and previous value, a validity flag, and an
//! ordered registry of named change listeners. Handles are cheap to
//! clone and share the same underlying cell.
//!
//! Dispatch is synchronous and single-threaded: `set` does not return
//! until every enabled listener in the dispatch snapshot has run. The
//! registry is snapshotted before iterating, so listeners added or
//! removed mid-dispatch only affect the next dispatch. A per-cell
//! reentrancy guard keeps a listener's own write to the same cell from
//! starting a nested dispatch: the value is applied, re-dispatch is
//! skipped.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use propcell::{PropertyType, PropertyValue, Value};
//!
//! let volume = PropertyValue::new("volume", PropertyType::int().with_min(0).with_max(11));
//!
//! let seen = Rc::new(Cell::new(0));
//! let seen_by_listener = Rc::clone(&seen);
//! volume
//!     .add_listener("meter", move |change| {
//!         assert_eq!(change.value, &Value::Int(7));
//!         seen_by_listener.set(seen_by_listener.get() + 1);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! volume.set(7_i64).unwrap();
//! assert_eq!(volume.get(), Value::Int(7));
//! assert_eq!(seen.get(), 1);
//! ```

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;
use core::fmt;

use smallvec::SmallVec;

use crate::descriptor::PropertyType;
use crate::error::{
    DuplicateListenerError, ListenerFailure, ListenerFailures, SetError, UnknownListenerError,
};
use crate::value::Value;

/// Inline capacity for listener registries.
///
/// Most cells carry a handful of listeners (a widget sync callback, a
/// binding hop), so the registry stays off the heap in the common case.
const INLINE_LISTENERS: usize = 2;

/// The result type listener callbacks return.
pub type ListenerResult = Result<(), crate::error::ListenerError>;

type Callback = Rc<dyn Fn(&Change<'_>) -> ListenerResult>;

/// The payload handed to a change listener.
pub struct Change<'a> {
    /// The name of the property whose cell changed.
    pub name: &'a str,
    /// The value now stored in the cell.
    pub value: &'a Value,
    /// Whether that value satisfies the descriptor's constraint.
    pub valid: bool,
    /// The context the listener was registered with, if any.
    pub context: Option<&'a dyn Any>,
}

impl fmt::Debug for Change<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Change")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("valid", &self.valid)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

struct ListenerEntry {
    name: String,
    callback: Callback,
    context: Option<Rc<dyn Any>>,
    enabled: bool,
}

struct CellState {
    ty: Rc<PropertyType>,
    name: String,
    current: Value,
    previous: Value,
    valid: bool,
    listeners: SmallVec<[ListenerEntry; INLINE_LISTENERS]>,
    notifying: bool,
    notification_enabled: bool,
}

impl CellState {
    fn position(&self, name: &str) -> Option<usize> {
        self.listeners.iter().position(|l| l.name == name)
    }
}

/// A handle to one scalar property cell.
///
/// Clones share the same cell. The cell holds the current value, the
/// previous value, a validity flag, and the listener registry; it is
/// created from its descriptor's default and lives as long as any
/// handle to it does.
#[derive(Clone)]
pub struct PropertyValue {
    state: Rc<RefCell<CellState>>,
}

/// A weak handle to a property cell, used where a strong handle would
/// keep the cell alive in a reference cycle (bindings).
#[derive(Clone)]
pub struct WeakPropertyValue {
    state: Weak<RefCell<CellState>>,
}

impl WeakPropertyValue {
    /// Upgrades to a strong handle if the cell is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<PropertyValue> {
        self.state.upgrade().map(|state| PropertyValue { state })
    }
}

impl fmt::Debug for WeakPropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakPropertyValue")
            .field("alive", &(self.state.strong_count() > 0))
            .finish()
    }
}

impl PropertyValue {
    /// Creates a standalone cell from a descriptor, initialized to the
    /// descriptor's default value.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: PropertyType) -> Self {
        Self::from_shared_type(name.into(), Rc::new(ty))
    }

    pub(crate) fn from_shared_type(name: String, ty: Rc<PropertyType>) -> Self {
        let default = ty.default_value();
        Self::with_initial(name, ty, default)
    }

    /// Creates a cell holding `value` directly, bypassing `set` and its
    /// dispatch. Used for list elements whose values were validated as
    /// part of a structural operation.
    pub(crate) fn with_initial(name: String, ty: Rc<PropertyType>, value: Value) -> Self {
        let valid = ty.validate(&value).is_ok();
        Self {
            state: Rc::new(RefCell::new(CellState {
                previous: value.clone(),
                current: value,
                valid,
                name,
                ty,
                listeners: SmallVec::new(),
                notifying: false,
                notification_enabled: true,
            })),
        }
    }

    /// Returns the property name this cell was created under.
    #[must_use]
    pub fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    /// Returns the descriptor governing this cell.
    #[must_use]
    pub fn property_type(&self) -> Rc<PropertyType> {
        Rc::clone(&self.state.borrow().ty)
    }

    /// Returns the current value. Never fails.
    #[must_use]
    pub fn get(&self) -> Value {
        self.state.borrow().current.clone()
    }

    /// Returns the value the cell held before the last real change.
    #[must_use]
    pub fn last_value(&self) -> Value {
        self.state.borrow().previous.clone()
    }

    /// Returns whether the current value satisfies the descriptor.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.state.borrow().valid
    }

    /// Returns a weak handle to this cell.
    #[must_use]
    pub fn downgrade(&self) -> WeakPropertyValue {
        WeakPropertyValue {
            state: Rc::downgrade(&self.state),
        }
    }

    /// Returns `true` if both handles point at the same cell.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.state, &b.state)
    }

    /// Sets the value.
    ///
    /// The candidate is validated and normalized by the descriptor. On a
    /// real change (value changed per the descriptor's equality
    /// predicate, or validity changed), the previous value is rotated
    /// and enabled listeners are dispatched. A write that changes
    /// neither value nor validity still refreshes the stored normalized
    /// form but skips dispatch.
    ///
    /// # Errors
    ///
    /// - [`SetError::Invalid`]: validation failed and the descriptor
    ///   does not allow invalid values; storage is untouched.
    /// - [`SetError::Listeners`]: the value was stored, but one or more
    ///   listeners failed. Every listener in the snapshot still ran.
    pub fn set(&self, candidate: impl Into<Value>) -> Result<(), SetError> {
        self.write(candidate.into(), false)
    }

    /// Sets the value, dispatching listeners even when neither the value
    /// nor its validity changed.
    ///
    /// # Errors
    ///
    /// Same as [`PropertyValue::set`].
    pub fn set_forced(&self, candidate: impl Into<Value>) -> Result<(), SetError> {
        self.write(candidate.into(), true)
    }

    fn write(&self, candidate: Value, force: bool) -> Result<(), SetError> {
        let (event_value, valid, dispatch) = {
            let mut state = self.state.borrow_mut();
            let ty = Rc::clone(&state.ty);
            let (new_value, new_valid) = match ty.validate(&candidate) {
                Ok(normalized) => (normalized, true),
                Err(err) => {
                    if ty.allow_invalid() {
                        (candidate, false)
                    } else {
                        return Err(SetError::Invalid(err));
                    }
                }
            };

            let value_changed = !ty.values_equal(&new_value, &state.current);
            let validity_changed = new_valid != state.valid;

            if value_changed {
                state.previous = core::mem::replace(&mut state.current, new_value);
            } else {
                // Refresh the stored normalized form; the previous value
                // only rotates on a real change.
                state.current = new_value;
            }
            state.valid = new_valid;

            let dispatch = (value_changed || validity_changed || force)
                && state.notification_enabled
                && !state.notifying;
            (state.current.clone(), new_valid, dispatch)
        };

        if !dispatch {
            return Ok(());
        }
        self.dispatch(&event_value, valid).map_err(SetError::Listeners)
    }

    /// Re-dispatches the current value to all enabled listeners,
    /// regardless of whether anything changed.
    ///
    /// # Errors
    ///
    /// - [`ListenerFailures`]: one or more listeners failed; every
    ///   listener in the snapshot still ran.
    pub fn notify(&self) -> Result<(), ListenerFailures> {
        let (value, valid, skip) = {
            let state = self.state.borrow();
            (
                state.current.clone(),
                state.valid,
                !state.notification_enabled || state.notifying,
            )
        };
        if skip {
            return Ok(());
        }
        self.dispatch(&value, valid)
    }

    /// Re-runs validation against the current value and, if the validity
    /// flag changed, dispatches listeners.
    ///
    /// Useful for descriptors that allow invalid values, where validity
    /// can drift apart from the stored value.
    ///
    /// # Errors
    ///
    /// - [`ListenerFailures`]: one or more listeners failed.
    pub fn revalidate(&self) -> Result<(), ListenerFailures> {
        let (value, valid, dispatch) = {
            let mut state = self.state.borrow_mut();
            let ty = Rc::clone(&state.ty);
            let new_valid = ty.validate(&state.current).is_ok();
            let changed = new_valid != state.valid;
            state.valid = new_valid;
            let dispatch = changed && state.notification_enabled && !state.notifying;
            (state.current.clone(), new_valid, dispatch)
        };
        if !dispatch {
            return Ok(());
        }
        self.dispatch(&value, valid)
    }

    fn dispatch(&self, value: &Value, valid: bool) -> Result<(), ListenerFailures> {
        let (name, snapshot) = {
            let mut state = self.state.borrow_mut();
            state.notifying = true;
            let snapshot: Vec<(String, Callback, Option<Rc<dyn Any>>)> = state
                .listeners
                .iter()
                .filter(|l| l.enabled)
                .map(|l| (l.name.clone(), Rc::clone(&l.callback), l.context.clone()))
                .collect();
            (state.name.clone(), snapshot)
        };

        // Clears the reentrancy guard even if a listener panics.
        let _guard = DispatchGuard {
            state: Rc::clone(&self.state),
        };

        let mut failures = Vec::new();
        for (listener, callback, context) in snapshot {
            let change = Change {
                name: &name,
                value,
                valid,
                context: context.as_deref(),
            };
            if let Err(error) = callback(&change) {
                failures.push(ListenerFailure { listener, error });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ListenerFailures { failures })
        }
    }

    /// Registers a named change listener.
    ///
    /// Listeners run in insertion order. The name must be unique within
    /// this cell.
    ///
    /// # Errors
    ///
    /// - [`DuplicateListenerError`]: a listener with this name is
    ///   already registered.
    pub fn add_listener<F>(
        &self,
        name: impl Into<String>,
        callback: F,
    ) -> Result<(), DuplicateListenerError>
    where
        F: Fn(&Change<'_>) -> ListenerResult + 'static,
    {
        self.insert_listener(name.into(), Rc::new(callback), None)
    }

    /// Registers a named change listener with a caller-supplied context,
    /// handed back through [`Change::context`] on every dispatch.
    ///
    /// # Errors
    ///
    /// - [`DuplicateListenerError`]: a listener with this name is
    ///   already registered.
    pub fn add_listener_with_context<F>(
        &self,
        name: impl Into<String>,
        context: Rc<dyn Any>,
        callback: F,
    ) -> Result<(), DuplicateListenerError>
    where
        F: Fn(&Change<'_>) -> ListenerResult + 'static,
    {
        self.insert_listener(name.into(), Rc::new(callback), Some(context))
    }

    fn insert_listener(
        &self,
        name: String,
        callback: Callback,
        context: Option<Rc<dyn Any>>,
    ) -> Result<(), DuplicateListenerError> {
        let mut state = self.state.borrow_mut();
        if state.position(&name).is_some() {
            return Err(DuplicateListenerError { name });
        }
        state.listeners.push(ListenerEntry {
            name,
            callback,
            context,
            enabled: true,
        });
        Ok(())
    }

    /// Removes a listener. Takes effect on the next dispatch snapshot.
    ///
    /// # Errors
    ///
    /// - [`UnknownListenerError`]: no listener with this name.
    pub fn remove_listener(&self, name: &str) -> Result<(), UnknownListenerError> {
        let mut state = self.state.borrow_mut();
        match state.position(name) {
            Some(index) => {
                state.listeners.remove(index);
                Ok(())
            }
            None => Err(UnknownListenerError { name: name.into() }),
        }
    }

    /// Re-enables a listener, keeping its registry position.
    ///
    /// # Errors
    ///
    /// - [`UnknownListenerError`]: no listener with this name.
    pub fn enable_listener(&self, name: &str) -> Result<(), UnknownListenerError> {
        self.set_listener_enabled(name, true)
    }

    /// Disables a listener without removing it; disabled listeners are
    /// skipped during dispatch but keep their position.
    ///
    /// # Errors
    ///
    /// - [`UnknownListenerError`]: no listener with this name.
    pub fn disable_listener(&self, name: &str) -> Result<(), UnknownListenerError> {
        self.set_listener_enabled(name, false)
    }

    fn set_listener_enabled(&self, name: &str, enabled: bool) -> Result<(), UnknownListenerError> {
        let mut state = self.state.borrow_mut();
        match state.position(name) {
            Some(index) => {
                state.listeners[index].enabled = enabled;
                Ok(())
            }
            None => Err(UnknownListenerError { name: name.into() }),
        }
    }

    /// Returns `true` if a listener with the given name is registered.
    #[must_use]
    pub fn has_listener(&self, name: &str) -> bool {
        self.state.borrow().position(name).is_some()
    }

    /// Enables change notification for this cell.
    pub fn enable_notification(&self) {
        self.state.borrow_mut().notification_enabled = true;
    }

    /// Disables change notification; writes still validate and store.
    pub fn disable_notification(&self) {
        self.state.borrow_mut().notification_enabled = false;
    }

    /// Returns whether notification is currently enabled.
    #[must_use]
    pub fn notification_enabled(&self) -> bool {
        self.state.borrow().notification_enabled
    }

    /// Sets the notification state, returning the previous state.
    pub fn set_notification_state(&self, enabled: bool) -> bool {
        let mut state = self.state.borrow_mut();
        core::mem::replace(&mut state.notification_enabled, enabled)
    }

    /// Disables notification until the returned guard is dropped, at
    /// which point the prior notification state is restored.
    #[must_use]
    pub fn suppress(&self) -> Suppressed {
        let prior = self.set_notification_state(false);
        Suppressed {
            cell: self.clone(),
            prior,
        }
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PropertyValue")
            .field("name", &state.name)
            .field("current", &state.current)
            .field("previous", &state.previous)
            .field("valid", &state.valid)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

struct DispatchGuard {
    state: Rc<RefCell<CellState>>,
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        self.state.borrow_mut().notifying = false;
    }
}

/// RAII guard that restores a cell's prior notification state on drop.
///
/// Returned by [`PropertyValue::suppress`].
#[derive(Debug)]
pub struct Suppressed {
    cell: PropertyValue,
    prior: bool,
}

impl Drop for Suppressed {
    fn drop(&mut self) {
        let _ = self.cell.set_notification_state(self.prior);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::string::ToString;
    use alloc::vec;
    use core::cell::Cell;

    fn counted_listener(count: &Rc<Cell<u32>>) -> impl Fn(&Change<'_>) -> ListenerResult + 'static {
        let count = Rc::clone(count);
        move |_| {
            count.set(count.get() + 1);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl core::error::Error for Boom {}

    #[test]
    fn round_trip() {
        let cell = PropertyValue::new("n", PropertyType::int().with_min(0).with_max(10));
        cell.set(7_i64).unwrap();
        assert_eq!(cell.get(), Value::Int(7));
        assert!(cell.is_valid());
    }

    #[test]
    fn atomic_rejection() {
        let cell = PropertyValue::new("n", PropertyType::int().with_max(10));
        cell.set(3_i64).unwrap();
        let err = cell.set(11_i64).unwrap_err();
        assert!(matches!(err, SetError::Invalid(_)));
        assert_eq!(cell.get(), Value::Int(3));
        assert_eq!(cell.last_value(), Value::Int(0));
    }

    #[test]
    fn listener_fires_once_then_not_after_removal() {
        let cell = PropertyValue::new("flag", PropertyType::boolean());
        let count = Rc::new(Cell::new(0));
        cell.add_listener("l", counted_listener(&count)).unwrap();

        cell.set(true).unwrap();
        assert_eq!(count.get(), 1);

        cell.remove_listener("l").unwrap();
        cell.set(false).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn noop_write_is_suppressed_but_succeeds() {
        let cell = PropertyValue::new("flag", PropertyType::boolean());
        let count = Rc::new(Cell::new(0));
        cell.add_listener("l", counted_listener(&count)).unwrap();

        cell.set(false).unwrap();
        assert_eq!(count.get(), 0);

        cell.set_forced(false).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn previous_value_rotates_only_on_real_change() {
        let cell = PropertyValue::new("n", PropertyType::int());
        cell.set(1_i64).unwrap();
        cell.set(2_i64).unwrap();
        assert_eq!(cell.last_value(), Value::Int(1));
        cell.set(2_i64).unwrap();
        assert_eq!(cell.last_value(), Value::Int(1));
    }

    #[test]
    fn duplicate_and_unknown_listener_errors() {
        let cell = PropertyValue::new("flag", PropertyType::boolean());
        cell.add_listener("l", |_| Ok(())).unwrap();
        assert_eq!(
            cell.add_listener("l", |_| Ok(())).unwrap_err(),
            DuplicateListenerError {
                name: "l".to_string()
            }
        );
        assert_eq!(
            cell.remove_listener("missing").unwrap_err(),
            UnknownListenerError {
                name: "missing".to_string()
            }
        );
        assert!(cell.enable_listener("missing").is_err());
        assert!(cell.disable_listener("missing").is_err());
    }

    #[test]
    fn disabled_listener_is_skipped_but_keeps_position() {
        let cell = PropertyValue::new("n", PropertyType::int());
        let order = Rc::new(RefCell::new(Vec::new()));

        for name in ["a", "b", "c"] {
            let order = Rc::clone(&order);
            cell.add_listener(name, move |_| {
                order.borrow_mut().push(name);
                Ok(())
            })
            .unwrap();
        }

        cell.disable_listener("b").unwrap();
        cell.set(1_i64).unwrap();
        assert_eq!(*order.borrow(), vec!["a", "c"]);

        cell.enable_listener("b").unwrap();
        cell.set(2_i64).unwrap();
        assert_eq!(*order.borrow(), vec!["a", "c", "a", "b", "c"]);
    }

    #[test]
    fn mid_dispatch_registration_affects_next_dispatch_only() {
        let cell = PropertyValue::new("n", PropertyType::int());
        let count = Rc::new(Cell::new(0));

        let inner_count = Rc::clone(&count);
        let cell_for_listener = cell.clone();
        cell.add_listener("installer", move |_| {
            if !cell_for_listener.has_listener("late") {
                let inner_count = Rc::clone(&inner_count);
                cell_for_listener
                    .add_listener("late", move |_| {
                        inner_count.set(inner_count.get() + 1);
                        Ok(())
                    })
                    .unwrap();
            }
            Ok(())
        })
        .unwrap();

        cell.set(1_i64).unwrap();
        assert_eq!(count.get(), 0);

        cell.set(2_i64).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn reentrant_write_applies_value_without_nested_dispatch() {
        let cell = PropertyValue::new("n", PropertyType::int());
        let count = Rc::new(Cell::new(0));

        let cell_for_listener = cell.clone();
        let count_for_listener = Rc::clone(&count);
        cell.add_listener("bump", move |change| {
            count_for_listener.set(count_for_listener.get() + 1);
            if change.value == &Value::Int(1) {
                cell_for_listener.set(99_i64).unwrap();
            }
            Ok(())
        })
        .unwrap();

        cell.set(1_i64).unwrap();
        assert_eq!(cell.get(), Value::Int(99));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_failure_does_not_stop_later_listeners() {
        let cell = PropertyValue::new("n", PropertyType::int());
        let count = Rc::new(Cell::new(0));

        cell.add_listener("bad", |_| -> ListenerResult { Err(Box::new(Boom)) })
            .unwrap();
        cell.add_listener("good", counted_listener(&count)).unwrap();

        let err = cell.set(1_i64).unwrap_err();
        assert_eq!(count.get(), 1);
        match err {
            SetError::Listeners(failures) => {
                assert_eq!(failures.failures.len(), 1);
                assert_eq!(failures.failures[0].listener, "bad");
            }
            SetError::Invalid(_) => panic!("expected listener failures"),
        }
        assert_eq!(cell.get(), Value::Int(1));
    }

    #[test]
    fn allow_invalid_stores_and_notifies_on_validity_change() {
        let cell = PropertyValue::new(
            "n",
            PropertyType::int().with_max(10).allowing_invalid(),
        );
        let count = Rc::new(Cell::new(0));
        cell.add_listener("l", counted_listener(&count)).unwrap();

        cell.set(11_i64).unwrap();
        assert_eq!(cell.get(), Value::Int(11));
        assert!(!cell.is_valid());
        assert_eq!(count.get(), 1);

        cell.set(5_i64).unwrap();
        assert!(cell.is_valid());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn revalidate_without_transition_is_silent() {
        let cell = PropertyValue::new(
            "n",
            PropertyType::int().with_max(10).allowing_invalid(),
        );
        let count = Rc::new(Cell::new(0));

        cell.set(11_i64).unwrap();
        assert!(!cell.is_valid());

        cell.add_listener("l", counted_listener(&count)).unwrap();
        cell.revalidate().unwrap();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn notification_suppression_guard_restores_state() {
        let cell = PropertyValue::new("n", PropertyType::int());
        let count = Rc::new(Cell::new(0));
        cell.add_listener("l", counted_listener(&count)).unwrap();

        {
            let _guard = cell.suppress();
            assert!(!cell.notification_enabled());
            cell.set(5_i64).unwrap();
            assert_eq!(count.get(), 0);
        }

        assert!(cell.notification_enabled());
        cell.set(6_i64).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn manual_notify_redispatches_current_value() {
        let cell = PropertyValue::new("n", PropertyType::int());
        let count = Rc::new(Cell::new(0));
        cell.add_listener("l", counted_listener(&count)).unwrap();

        cell.notify().unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_context_is_handed_back() {
        let cell = PropertyValue::new("n", PropertyType::int());
        let seen = Rc::new(Cell::new(0));
        let seen_by_listener = Rc::clone(&seen);

        cell.add_listener_with_context("l", Rc::new(42_u32), move |change| {
            let tag = change
                .context
                .and_then(|ctx| ctx.downcast_ref::<u32>())
                .copied();
            assert_eq!(tag, Some(42));
            seen_by_listener.set(seen_by_listener.get() + 1);
            Ok(())
        })
        .unwrap();

        cell.set(1_i64).unwrap();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn normalized_form_is_stored() {
        let cell = PropertyValue::new("r", PropertyType::real());
        cell.set(2_i64).unwrap();
        assert_eq!(cell.get(), Value::Real(2.0));
    }
}
