// Copyright 2026 the Propcell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bindings between scalar property cells.
//!
//! A binding keeps two cells synchronized through ordinary change
//! listeners: establishing one registers an internal listener on each
//! synchronized endpoint, and tearing it down removes them again. The
//! target is synchronized to the source's current value at bind time.
//!
//! Two-way bindings cannot recurse. Forwarding a value to the peer
//! either finds the peer already holding it (the write is a no-op and
//! dispatch is skipped) or runs while the originating cell's reentrancy
//! guard is still set, so the echo write applies without starting
//! another dispatch.
//!
//! The binding holds only weak handles; it never keeps either cell
//! alive, and a fired listener whose peer has been dropped is a no-op.
//!
//! # Example
//!
//! ```rust
//! use propcell::{bind, BindMode, PropertyType, PropertyValue, Value};
//!
//! let master = PropertyValue::new("volume", PropertyType::int().with_default(5));
//! let mirror = PropertyValue::new("volume", PropertyType::int());
//!
//! let binding = bind(&master, &mirror, BindMode::TwoWay).unwrap();
//! assert_eq!(mirror.get(), Value::Int(5));
//!
//! master.set(7_i64).unwrap();
//! assert_eq!(mirror.get(), Value::Int(7));
//!
//! mirror.set(2_i64).unwrap();
//! assert_eq!(master.get(), Value::Int(2));
//!
//! binding.unbind();
//! master.set(9_i64).unwrap();
//! assert_eq!(mirror.get(), Value::Int(2));
//! ```

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::cell::{ListenerResult, PropertyValue, WeakPropertyValue};
use crate::error::BindingError;

/// Distinguishes bind listener names across all bindings in the
/// process.
static NEXT_BINDING_ID: AtomicU64 = AtomicU64::new(0);

/// The direction(s) a binding synchronizes in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindMode {
    /// Changes to the source propagate to the target only.
    OneWay,
    /// Changes to either endpoint propagate to the other.
    TwoWay,
}

/// An established binding between two cells.
///
/// Dropping the handle does NOT tear the binding down; call
/// [`Binding::unbind`] for that. The handle holds weak references only.
#[derive(Debug)]
pub struct Binding {
    source: WeakPropertyValue,
    target: WeakPropertyValue,
    forward: String,
    backward: Option<String>,
}

impl Binding {
    /// Removes the binding's internal listeners from both endpoints.
    ///
    /// Endpoints that have already been dropped are skipped.
    pub fn unbind(self) {
        if let Some(source) = self.source.upgrade() {
            let _ = source.remove_listener(&self.forward);
        }
        if let Some(backward) = &self.backward
            && let Some(target) = self.target.upgrade()
        {
            let _ = target.remove_listener(backward);
        }
    }
}

fn forwarder(peer: WeakPropertyValue) -> impl Fn(&crate::cell::Change<'_>) -> ListenerResult {
    move |change| {
        let Some(peer) = peer.upgrade() else {
            return Ok(());
        };
        match peer.set(change.value.clone()) {
            Ok(()) => Ok(()),
            Err(err) => Err(Box::new(err)),
        }
    }
}

/// Establishes a binding between two scalar cells.
///
/// The target is synchronized to the source's current value before any
/// listener is registered, so the binding's own machinery never sees
/// the initial write.
///
/// # Errors
///
/// - [`BindingError::SelfBinding`]: both handles point at the same
///   cell.
/// - [`BindingError::KindMismatch`]: the endpoints' descriptors declare
///   different kinds.
/// - [`BindingError::InitialSync`]: the target rejected the source's
///   current value, or the target's listeners failed while applying it.
pub fn bind(
    source: &PropertyValue,
    target: &PropertyValue,
    mode: BindMode,
) -> Result<Binding, BindingError> {
    if PropertyValue::ptr_eq(source, target) {
        return Err(BindingError::SelfBinding);
    }
    let source_kind = source.property_type().kind();
    let target_kind = target.property_type().kind();
    if source_kind != target_kind {
        return Err(BindingError::KindMismatch {
            source: source_kind,
            target: target_kind,
        });
    }

    target.set(source.get()).map_err(BindingError::InitialSync)?;

    let id = NEXT_BINDING_ID.fetch_add(1, Ordering::Relaxed);
    let forward = format!("bind-{id}-forward");
    // The names are globally unique, so registration cannot collide.
    let _ = source.add_listener(forward.clone(), forwarder(target.downgrade()));

    let backward = match mode {
        BindMode::OneWay => None,
        BindMode::TwoWay => {
            let name = format!("bind-{id}-backward");
            let _ = target.add_listener(name.clone(), forwarder(source.downgrade()));
            Some(name)
        }
    };

    Ok(Binding {
        source: source.downgrade(),
        target: target.downgrade(),
        forward,
        backward,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PropertyType;
    use crate::error::SetError;
    use crate::value::Value;

    #[test]
    fn two_way_propagates_both_directions() {
        let a = PropertyValue::new("a", PropertyType::int());
        let b = PropertyValue::new("b", PropertyType::int());
        let _binding = bind(&a, &b, BindMode::TwoWay).unwrap();

        a.set(5_i64).unwrap();
        assert_eq!(b.get(), Value::Int(5));

        b.set(7_i64).unwrap();
        assert_eq!(a.get(), Value::Int(7));
    }

    #[test]
    fn one_way_ignores_target_changes() {
        let a = PropertyValue::new("a", PropertyType::int());
        let b = PropertyValue::new("b", PropertyType::int());
        let _binding = bind(&a, &b, BindMode::OneWay).unwrap();

        a.set(5_i64).unwrap();
        assert_eq!(b.get(), Value::Int(5));

        b.set(7_i64).unwrap();
        assert_eq!(a.get(), Value::Int(5));

        a.set(9_i64).unwrap();
        assert_eq!(b.get(), Value::Int(9));
    }

    #[test]
    fn initial_sync_copies_source_value() {
        let a = PropertyValue::new("a", PropertyType::int().with_default(42));
        let b = PropertyValue::new("b", PropertyType::int());
        let _binding = bind(&a, &b, BindMode::TwoWay).unwrap();
        assert_eq!(b.get(), Value::Int(42));
    }

    #[test]
    fn self_binding_is_rejected() {
        let a = PropertyValue::new("a", PropertyType::int());
        let alias = a.clone();
        assert!(matches!(
            bind(&a, &alias, BindMode::TwoWay),
            Err(BindingError::SelfBinding)
        ));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let a = PropertyValue::new("a", PropertyType::int());
        let b = PropertyValue::new("b", PropertyType::boolean());
        assert!(matches!(
            bind(&a, &b, BindMode::TwoWay),
            Err(BindingError::KindMismatch { .. })
        ));
    }

    #[test]
    fn initial_sync_failure_leaves_no_binding() {
        let a = PropertyValue::new("a", PropertyType::int().with_default(20));
        let b = PropertyValue::new("b", PropertyType::int().with_max(10));
        assert!(matches!(
            bind(&a, &b, BindMode::TwoWay),
            Err(BindingError::InitialSync(SetError::Invalid(_)))
        ));

        // No listener was left behind on either endpoint.
        a.set(3_i64).unwrap();
        assert_eq!(b.get(), Value::Int(0));
    }

    #[test]
    fn unbind_stops_propagation() {
        let a = PropertyValue::new("a", PropertyType::int());
        let b = PropertyValue::new("b", PropertyType::int());
        let binding = bind(&a, &b, BindMode::TwoWay).unwrap();

        a.set(5_i64).unwrap();
        binding.unbind();

        a.set(9_i64).unwrap();
        assert_eq!(b.get(), Value::Int(5));
        b.set(1_i64).unwrap();
        assert_eq!(a.get(), Value::Int(9));
    }

    #[test]
    fn dropped_peer_is_tolerated() {
        let a = PropertyValue::new("a", PropertyType::int());
        let binding = {
            let b = PropertyValue::new("b", PropertyType::int());
            bind(&a, &b, BindMode::TwoWay).unwrap()
        };

        a.set(5_i64).unwrap();
        assert_eq!(a.get(), Value::Int(5));
        binding.unbind();
    }

    #[test]
    fn target_rejection_after_bind_surfaces_as_listener_failure() {
        let a = PropertyValue::new("a", PropertyType::int());
        let b = PropertyValue::new("b", PropertyType::int().with_max(10));
        let _binding = bind(&a, &b, BindMode::TwoWay).unwrap();

        let err = a.set(50_i64).unwrap_err();
        assert!(matches!(err, SetError::Listeners(_)));
        // The source keeps the value it stored; the target rejected it.
        assert_eq!(a.get(), Value::Int(50));
        assert_eq!(b.get(), Value::Int(0));
    }

    #[test]
    fn clamping_peer_does_not_oscillate() {
        let a = PropertyValue::new("a", PropertyType::int());
        let b = PropertyValue::new("b", PropertyType::int().with_max(10).clamped());
        let _binding = bind(&a, &b, BindMode::TwoWay).unwrap();

        // B clamps to 10 and echoes it back; A accepts it and the echo
        // of 10 back to B is a no-op, so propagation settles.
        a.set(50_i64).unwrap();
        assert_eq!(b.get(), Value::Int(10));
        assert_eq!(a.get(), Value::Int(10));
    }
}
