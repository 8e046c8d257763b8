// Copyright 2026 the Propcell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! List-valued property cells and structural events.
//!
//! A [`PropertyValueList`] manages an ordered sequence of element
//! [`PropertyValue`] cells, each independently listenable, plus its own
//! registry of *structural* listeners fed [`ListEvent`]s: items added,
//! removed, replaced, the sequence reordered, or the whole list
//! replaced.
//!
//! Element count and order are authoritative here: item-level events
//! never reorder the sequence outside an explicit structural operation.
//! Bulk replacement ([`PropertyValueList::set_all`]) validates every
//! element before committing any — on failure the list is untouched.
//!
//! # Example
//!
//! ```rust
//! use propcell::{ListEvent, PropertyType, PropertyValueList, Value};
//!
//! let scores = PropertyValueList::new("scores", PropertyType::list(PropertyType::int()));
//!
//! scores
//!     .add_listener("log", |change| {
//!         if let ListEvent::ItemAdded { index, value } = change.event {
//!             assert_eq!((index, value), (&0, &Value::Int(3)));
//!         }
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! scores.append(3_i64).unwrap();
//! assert_eq!(scores.get(), Value::List(vec![Value::Int(3)]));
//! ```

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;
use core::fmt;

use smallvec::SmallVec;

use crate::cell::{ListenerResult, PropertyValue};
use crate::descriptor::{Constraint, PropertyType};
use crate::error::{
    DuplicateListenerError, ListenerFailure, ListenerFailures, SetError, UnknownListenerError,
    ValidationError, Violation,
};
use crate::value::Value;

const INLINE_LISTENERS: usize = 2;

/// A structural change to a list property.
#[derive(Clone, Debug, PartialEq)]
pub enum ListEvent {
    /// An item was inserted at `index`.
    ItemAdded {
        /// The position of the new item.
        index: usize,
        /// The normalized value of the new item.
        value: Value,
    },
    /// The item at `index` was removed.
    ItemRemoved {
        /// The position the item was removed from.
        index: usize,
        /// The removed item's value.
        value: Value,
    },
    /// The item at `index` was replaced in place.
    ItemReplaced {
        /// The position of the replaced item.
        index: usize,
        /// The value before the replacement.
        old: Value,
        /// The normalized value after the replacement.
        new: Value,
    },
    /// The sequence was reordered; `order[i]` is the old index of the
    /// item now at position `i`.
    Reordered {
        /// The applied permutation.
        order: Vec<usize>,
    },
    /// The whole sequence was replaced.
    ListReplaced {
        /// The normalized new contents.
        values: Vec<Value>,
    },
}

/// The payload handed to a structural listener.
pub struct ListChange<'a> {
    /// The name of the list property.
    pub name: &'a str,
    /// The structural event.
    pub event: &'a ListEvent,
    /// The context the listener was registered with, if any.
    pub context: Option<&'a dyn Any>,
}

impl fmt::Debug for ListChange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListChange")
            .field("name", &self.name)
            .field("event", &self.event)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

type ListCallback = Rc<dyn Fn(&ListChange<'_>) -> ListenerResult>;

struct ListListenerEntry {
    name: String,
    callback: ListCallback,
    context: Option<Rc<dyn Any>>,
    enabled: bool,
}

struct ListState {
    ty: Rc<PropertyType>,
    element: Rc<PropertyType>,
    name: String,
    items: Vec<PropertyValue>,
    listeners: SmallVec<[ListListenerEntry; INLINE_LISTENERS]>,
    notifying: bool,
    notification_enabled: bool,
}

impl ListState {
    fn position(&self, name: &str) -> Option<usize> {
        self.listeners.iter().position(|l| l.name == name)
    }

    fn length_bounds(&self) -> (Option<usize>, Option<usize>) {
        match self.ty.constraint() {
            Constraint::List {
                min_len, max_len, ..
            } => (*min_len, *max_len),
            _ => (None, None),
        }
    }

    fn snapshot_values(&self) -> Vec<Value> {
        self.items.iter().map(PropertyValue::get).collect()
    }
}

/// A handle to one list-valued property cell.
///
/// Clones share the same underlying list. This is the list-kind
/// counterpart of [`PropertyValue`]; callers branch on a property's
/// kind before choosing between the two APIs.
#[derive(Clone)]
pub struct PropertyValueList {
    state: Rc<RefCell<ListState>>,
}

impl PropertyValueList {
    /// Creates a standalone list cell from a list descriptor,
    /// initialized to the descriptor's default sequence.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor is not list-kind.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: PropertyType) -> Self {
        Self::from_shared_type(name.into(), Rc::new(ty))
    }

    pub(crate) fn from_shared_type(name: String, ty: Rc<PropertyType>) -> Self {
        let element = match ty.constraint() {
            Constraint::List { element, .. } => Rc::new((**element).clone()),
            _ => panic!(
                "a list cell requires a list-kind descriptor, got kind {}",
                ty.kind()
            ),
        };
        let initial = match ty.default_value() {
            Value::List(values) => values,
            _ => Vec::new(),
        };
        let items = initial
            .into_iter()
            .map(|value| PropertyValue::with_initial(name.clone(), Rc::clone(&element), value))
            .collect();
        Self {
            state: Rc::new(RefCell::new(ListState {
                ty,
                element,
                name,
                items,
                listeners: SmallVec::new(),
                notifying: false,
                notification_enabled: true,
            })),
        }
    }

    /// Returns the property name this list was created under.
    #[must_use]
    pub fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    /// Returns the list descriptor governing this cell.
    #[must_use]
    pub fn property_type(&self) -> Rc<PropertyType> {
        Rc::clone(&self.state.borrow().ty)
    }

    /// Returns the descriptor every element must satisfy.
    #[must_use]
    pub fn element_type(&self) -> Rc<PropertyType> {
        Rc::clone(&self.state.borrow().element)
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    /// Returns `true` if the list holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().items.is_empty()
    }

    /// Returns a snapshot of the current contents as a [`Value::List`].
    #[must_use]
    pub fn get(&self) -> Value {
        Value::List(self.state.borrow().snapshot_values())
    }

    /// Returns a snapshot of the current contents.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.state.borrow().snapshot_values()
    }

    /// Returns a handle to the element cell at `index`, if in bounds.
    ///
    /// Element cells are ordinary [`PropertyValue`]s: they can carry
    /// their own listeners, and writing through them fires item-level
    /// notifications without any structural event.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<PropertyValue> {
        self.state.borrow().items.get(index).cloned()
    }

    /// Returns handles to every element cell, in order.
    #[must_use]
    pub fn items(&self) -> Vec<PropertyValue> {
        self.state.borrow().items.clone()
    }

    /// Appends a value to the end of the list.
    ///
    /// # Errors
    ///
    /// - [`SetError::Invalid`]: the value fails the element descriptor,
    ///   or the list is already at its maximum length; nothing changes.
    /// - [`SetError::Listeners`]: the item was appended, but structural
    ///   listeners failed.
    pub fn append(&self, value: impl Into<Value>) -> Result<(), SetError> {
        let index = self.len();
        self.insert(index, value)
    }

    /// Inserts a value at `index`, shifting later items right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Errors
    ///
    /// Same as [`PropertyValueList::append`].
    pub fn insert(&self, index: usize, value: impl Into<Value>) -> Result<(), SetError> {
        let candidate = value.into();
        let event = {
            let mut state = self.state.borrow_mut();
            assert!(
                index <= state.items.len(),
                "insertion index out of bounds"
            );
            let (_, max_len) = state.length_bounds();
            if let Some(max_len) = max_len
                && state.items.len() >= max_len
            {
                return Err(SetError::Invalid(ValidationError::new(
                    Value::List(state.snapshot_values()),
                    Violation::TooLong {
                        max_len,
                        len: state.items.len() + 1,
                    },
                )));
            }
            let normalized = state.element.validate(&candidate)?;
            let cell = PropertyValue::with_initial(
                state.name.clone(),
                Rc::clone(&state.element),
                normalized.clone(),
            );
            state.items.insert(index, cell);
            ListEvent::ItemAdded {
                index,
                value: normalized,
            }
        };
        self.dispatch(&event).map_err(SetError::Listeners)
    }

    /// Removes and returns the item at `index`, shifting later items
    /// left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    ///
    /// # Errors
    ///
    /// - [`SetError::Invalid`]: removal would take the list below its
    ///   minimum length; nothing changes.
    /// - [`SetError::Listeners`]: the item was removed, but structural
    ///   listeners failed.
    pub fn remove_at(&self, index: usize) -> Result<Value, SetError> {
        let (event, removed) = {
            let mut state = self.state.borrow_mut();
            assert!(index < state.items.len(), "removal index out of bounds");
            let (min_len, _) = state.length_bounds();
            if let Some(min_len) = min_len
                && state.items.len() <= min_len
            {
                return Err(SetError::Invalid(ValidationError::new(
                    Value::List(state.snapshot_values()),
                    Violation::TooShort {
                        min_len,
                        len: state.items.len() - 1,
                    },
                )));
            }
            let cell = state.items.remove(index);
            let value = cell.get();
            (
                ListEvent::ItemRemoved {
                    index,
                    value: value.clone(),
                },
                value,
            )
        };
        self.dispatch(&event)
            .map(|()| removed)
            .map_err(SetError::Listeners)
    }

    /// Replaces the item at `index` in place.
    ///
    /// The element cell's own listeners fire for the item-level change,
    /// then structural listeners receive [`ListEvent::ItemReplaced`].
    /// Returns the old value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    ///
    /// # Errors
    ///
    /// - [`SetError::Invalid`]: the value fails the element descriptor;
    ///   nothing changes.
    /// - [`SetError::Listeners`]: the item was replaced, but item-level
    ///   or structural listeners failed; all of them still ran.
    pub fn replace(&self, index: usize, value: impl Into<Value>) -> Result<Value, SetError> {
        let candidate = value.into();
        let (cell, old, event) = {
            let state = self.state.borrow();
            assert!(index < state.items.len(), "replacement index out of bounds");
            let normalized = state.element.validate(&candidate)?;
            let cell = state.items[index].clone();
            let old = cell.get();
            let event = ListEvent::ItemReplaced {
                index,
                old: old.clone(),
                new: normalized,
            };
            (cell, old, event)
        };

        let mut failures = Vec::new();
        if let ListEvent::ItemReplaced { new, .. } = &event {
            match cell.set(new.clone()) {
                Ok(()) => {}
                Err(SetError::Listeners(errs)) => failures.extend(errs.failures),
                Err(err @ SetError::Invalid(_)) => return Err(err),
            }
        }
        if let Err(errs) = self.dispatch(&event) {
            failures.extend(errs.failures);
        }

        if failures.is_empty() {
            Ok(old)
        } else {
            Err(SetError::Listeners(ListenerFailures { failures }))
        }
    }

    /// Reorders the list: the item now at position `i` is the one that
    /// was at `order[i]`. An identity permutation is a no-op and fires
    /// nothing.
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of `0..len`.
    ///
    /// # Errors
    ///
    /// - [`ListenerFailures`]: structural listeners failed.
    pub fn reorder(&self, order: &[usize]) -> Result<(), ListenerFailures> {
        let event = {
            let mut state = self.state.borrow_mut();
            let len = state.items.len();
            let mut check: Vec<usize> = order.to_vec();
            check.sort_unstable();
            assert!(
                check.len() == len && check.iter().enumerate().all(|(i, &j)| i == j),
                "reorder argument must be a permutation of the item indices"
            );
            if order.iter().enumerate().all(|(i, &j)| i == j) {
                return Ok(());
            }
            let items = core::mem::take(&mut state.items);
            let mut reordered = Vec::with_capacity(len);
            let mut slots: Vec<Option<PropertyValue>> = items.into_iter().map(Some).collect();
            for &old_index in order {
                let cell = slots[old_index]
                    .take()
                    .unwrap_or_else(|| unreachable!("permutation checked above"));
                reordered.push(cell);
            }
            state.items = reordered;
            ListEvent::Reordered {
                order: order.to_vec(),
            }
        };
        self.dispatch(&event)
    }

    /// Replaces the whole sequence, all-or-nothing.
    ///
    /// Every element is validated against the element descriptor (and
    /// the list's length bounds) before anything is committed; on
    /// failure the list is exactly as it was. Existing element cells —
    /// and any listeners registered on them — are discarded and replaced
    /// by fresh cells.
    ///
    /// # Errors
    ///
    /// - [`SetError::Invalid`]: an element or length bound failed;
    ///   nothing changes.
    /// - [`SetError::Listeners`]: the sequence was replaced, but
    ///   structural listeners failed.
    pub fn set_all(&self, values: impl Into<Vec<Value>>) -> Result<(), SetError> {
        let candidate = Value::List(values.into());
        let event = {
            let mut state = self.state.borrow_mut();
            let normalized = match state.ty.validate(&candidate)? {
                Value::List(values) => values,
                _ => unreachable!("a list descriptor normalizes to a list"),
            };
            state.items = normalized
                .iter()
                .map(|value| {
                    PropertyValue::with_initial(
                        state.name.clone(),
                        Rc::clone(&state.element),
                        value.clone(),
                    )
                })
                .collect();
            ListEvent::ListReplaced { values: normalized }
        };
        self.dispatch(&event).map_err(SetError::Listeners)
    }

    fn dispatch(&self, event: &ListEvent) -> Result<(), ListenerFailures> {
        let (name, snapshot) = {
            let mut state = self.state.borrow_mut();
            if !state.notification_enabled || state.notifying {
                return Ok(());
            }
            state.notifying = true;
            let snapshot: Vec<(String, ListCallback, Option<Rc<dyn Any>>)> = state
                .listeners
                .iter()
                .filter(|l| l.enabled)
                .map(|l| (l.name.clone(), Rc::clone(&l.callback), l.context.clone()))
                .collect();
            (state.name.clone(), snapshot)
        };

        let _guard = ListDispatchGuard {
            state: Rc::clone(&self.state),
        };

        let mut failures = Vec::new();
        for (listener, callback, context) in snapshot {
            let change = ListChange {
                name: &name,
                event,
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

    /// Registers a named structural listener. Listeners run in
    /// insertion order.
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
        F: Fn(&ListChange<'_>) -> ListenerResult + 'static,
    {
        self.insert_listener(name.into(), Rc::new(callback), None)
    }

    /// Registers a named structural listener with a caller-supplied
    /// context.
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
        F: Fn(&ListChange<'_>) -> ListenerResult + 'static,
    {
        self.insert_listener(name.into(), Rc::new(callback), Some(context))
    }

    fn insert_listener(
        &self,
        name: String,
        callback: ListCallback,
        context: Option<Rc<dyn Any>>,
    ) -> Result<(), DuplicateListenerError> {
        let mut state = self.state.borrow_mut();
        if state.position(&name).is_some() {
            return Err(DuplicateListenerError { name });
        }
        state.listeners.push(ListListenerEntry {
            name,
            callback,
            context,
            enabled: true,
        });
        Ok(())
    }

    /// Removes a structural listener.
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

    /// Re-enables a structural listener.
    ///
    /// # Errors
    ///
    /// - [`UnknownListenerError`]: no listener with this name.
    pub fn enable_listener(&self, name: &str) -> Result<(), UnknownListenerError> {
        self.set_listener_enabled(name, true)
    }

    /// Disables a structural listener without removing it.
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

    /// Returns `true` if a structural listener with the given name is
    /// registered.
    #[must_use]
    pub fn has_listener(&self, name: &str) -> bool {
        self.state.borrow().position(name).is_some()
    }

    /// Enables structural notification.
    pub fn enable_notification(&self) {
        self.state.borrow_mut().notification_enabled = true;
    }

    /// Disables structural notification; operations still validate and
    /// mutate.
    pub fn disable_notification(&self) {
        self.state.borrow_mut().notification_enabled = false;
    }

    /// Returns whether structural notification is enabled.
    #[must_use]
    pub fn notification_enabled(&self) -> bool {
        self.state.borrow().notification_enabled
    }

    /// Sets the structural notification state, returning the previous
    /// state.
    pub fn set_notification_state(&self, enabled: bool) -> bool {
        let mut state = self.state.borrow_mut();
        core::mem::replace(&mut state.notification_enabled, enabled)
    }

    /// Disables structural notification until the returned guard is
    /// dropped, at which point the prior state is restored.
    #[must_use]
    pub fn suppress(&self) -> SuppressedList {
        let prior = self.set_notification_state(false);
        SuppressedList {
            list: self.clone(),
            prior,
        }
    }

    /// Returns `true` if both handles point at the same list.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.state, &b.state)
    }
}

impl fmt::Debug for PropertyValueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PropertyValueList")
            .field("name", &state.name)
            .field("len", &state.items.len())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

struct ListDispatchGuard {
    state: Rc<RefCell<ListState>>,
}

impl Drop for ListDispatchGuard {
    fn drop(&mut self) {
        self.state.borrow_mut().notifying = false;
    }
}

/// RAII guard that restores a list's prior structural notification
/// state on drop. Returned by [`PropertyValueList::suppress`].
#[derive(Debug)]
pub struct SuppressedList {
    list: PropertyValueList,
    prior: bool,
}

impl Drop for SuppressedList {
    fn drop(&mut self) {
        let _ = self.list.set_notification_state(self.prior);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn int_list() -> PropertyValueList {
        PropertyValueList::new("xs", PropertyType::list(PropertyType::int()))
    }

    fn recorded_events(list: &PropertyValueList) -> Rc<RefCell<Vec<ListEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        list.add_listener("record", move |change| {
            sink.borrow_mut().push(change.event.clone());
            Ok(())
        })
        .unwrap();
        events
    }

    #[test]
    fn append_emits_one_item_added() {
        let list = int_list();
        let events = recorded_events(&list);

        list.append(3_i64).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![ListEvent::ItemAdded {
                index: 0,
                value: Value::Int(3)
            }]
        );
        assert_eq!(list.get(), Value::List(vec![Value::Int(3)]));
    }

    #[test]
    fn insert_and_remove() {
        let list = int_list();
        list.append(1_i64).unwrap();
        list.append(3_i64).unwrap();
        let events = recorded_events(&list);

        list.insert(1, 2_i64).unwrap();
        assert_eq!(
            list.values(),
            vec![Value::Int(1), Value::Int(2), Value::Int(3)]
        );

        let removed = list.remove_at(0).unwrap();
        assert_eq!(removed, Value::Int(1));
        assert_eq!(list.values(), vec![Value::Int(2), Value::Int(3)]);

        assert_eq!(
            *events.borrow(),
            vec![
                ListEvent::ItemAdded {
                    index: 1,
                    value: Value::Int(2)
                },
                ListEvent::ItemRemoved {
                    index: 0,
                    value: Value::Int(1)
                },
            ]
        );
    }

    #[test]
    fn set_all_is_atomic() {
        let list = PropertyValueList::new(
            "xs",
            PropertyType::list(PropertyType::int().with_min(0)),
        );
        list.set_all(vec![Value::Int(1), Value::Int(2)]).unwrap();

        let err = list.set_all(vec![Value::Int(-9)]).unwrap_err();
        assert!(matches!(err, SetError::Invalid(_)));
        assert_eq!(list.values(), vec![Value::Int(1), Value::Int(2)]);

        list.set_all(vec![Value::Int(9)]).unwrap();
        assert_eq!(list.values(), vec![Value::Int(9)]);
    }

    #[test]
    fn set_all_emits_list_replaced() {
        let list = int_list();
        let events = recorded_events(&list);

        list.set_all(vec![Value::Int(1), Value::Int(2)]).unwrap();
        assert_eq!(
            *events.borrow(),
            vec![ListEvent::ListReplaced {
                values: vec![Value::Int(1), Value::Int(2)]
            }]
        );
    }

    #[test]
    fn replace_fires_item_listener_and_structural_event() {
        let list = int_list();
        list.append(1_i64).unwrap();
        let events = recorded_events(&list);

        let item_hits = Rc::new(core::cell::Cell::new(0));
        let item_hits_in_listener = Rc::clone(&item_hits);
        list.item(0)
            .unwrap()
            .add_listener("item", move |change| {
                assert_eq!(change.value, &Value::Int(5));
                item_hits_in_listener.set(item_hits_in_listener.get() + 1);
                Ok(())
            })
            .unwrap();

        let old = list.replace(0, 5_i64).unwrap();
        assert_eq!(old, Value::Int(1));
        assert_eq!(item_hits.get(), 1);
        assert_eq!(
            *events.borrow(),
            vec![ListEvent::ItemReplaced {
                index: 0,
                old: Value::Int(1),
                new: Value::Int(5)
            }]
        );
    }

    #[test]
    fn reorder_applies_permutation() {
        let list = int_list();
        list.set_all(vec![Value::Int(10), Value::Int(20), Value::Int(30)])
            .unwrap();
        let events = recorded_events(&list);

        list.reorder(&[2, 0, 1]).unwrap();
        assert_eq!(
            list.values(),
            vec![Value::Int(30), Value::Int(10), Value::Int(20)]
        );
        assert_eq!(
            *events.borrow(),
            vec![ListEvent::Reordered {
                order: vec![2, 0, 1]
            }]
        );
    }

    #[test]
    fn identity_reorder_is_silent() {
        let list = int_list();
        list.set_all(vec![Value::Int(1), Value::Int(2)]).unwrap();
        let events = recorded_events(&list);

        list.reorder(&[0, 1]).unwrap();
        assert!(events.borrow().is_empty());
    }

    #[test]
    #[should_panic(expected = "permutation")]
    fn malformed_reorder_panics() {
        let list = int_list();
        list.set_all(vec![Value::Int(1), Value::Int(2)]).unwrap();
        let _ = list.reorder(&[0, 0]);
    }

    #[test]
    fn length_bounds_are_enforced() {
        let list = PropertyValueList::new(
            "xs",
            PropertyType::list(PropertyType::int())
                .with_min_len(1)
                .with_max_len(2)
                .with_default(vec![Value::Int(1)]),
        );

        list.append(2_i64).unwrap();
        let err = list.append(3_i64).unwrap_err();
        assert!(matches!(
            err,
            SetError::Invalid(ValidationError {
                violation: Violation::TooLong { .. },
                ..
            })
        ));

        list.remove_at(1).unwrap();
        let err = list.remove_at(0).unwrap_err();
        assert!(matches!(
            err,
            SetError::Invalid(ValidationError {
                violation: Violation::TooShort { .. },
                ..
            })
        ));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn invalid_element_is_rejected_by_append() {
        let list = PropertyValueList::new(
            "xs",
            PropertyType::list(PropertyType::int().with_max(5)),
        );
        assert!(list.append(6_i64).is_err());
        assert!(list.is_empty());
    }

    #[test]
    fn item_level_write_fires_no_structural_event() {
        let list = int_list();
        list.append(1_i64).unwrap();
        let events = recorded_events(&list);

        list.item(0).unwrap().set(7_i64).unwrap();
        assert!(events.borrow().is_empty());
        assert_eq!(list.values(), vec![Value::Int(7)]);
    }

    #[test]
    fn structural_listener_management() {
        let list = int_list();
        list.add_listener("l", |_| Ok(())).unwrap();
        assert!(list.add_listener("l", |_| Ok(())).is_err());
        assert!(list.has_listener("l"));

        list.disable_listener("l").unwrap();
        list.enable_listener("l").unwrap();
        list.remove_listener("l").unwrap();
        assert!(list.remove_listener("l").is_err());
    }

    #[test]
    fn suppression_guard_restores_state() {
        let list = int_list();
        let events = recorded_events(&list);

        {
            let _guard = list.suppress();
            list.append(1_i64).unwrap();
        }
        assert!(events.borrow().is_empty());

        list.append(2_i64).unwrap();
        assert_eq!(events.borrow().len(), 1);
    }
}
