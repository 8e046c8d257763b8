// Copyright 2026 the Propcell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for property operations.
//!
//! Every fallible operation reports a dedicated error type; host-level
//! operations that can fail for more than one reason return the umbrella
//! [`PropertyError`]. All errors are surfaced synchronously to the caller
//! of the triggering operation — none are swallowed.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::value::{PropertyKind, Value};

/// The constraint violated by a rejected candidate value.
#[derive(Debug, PartialEq)]
pub enum Violation {
    /// The candidate's kind does not match the descriptor's kind.
    KindMismatch {
        /// The kind the descriptor expects.
        expected: PropertyKind,
        /// The kind of the offered candidate.
        actual: PropertyKind,
    },
    /// The candidate is below the declared minimum.
    BelowMinimum {
        /// The declared minimum.
        min: Value,
    },
    /// The candidate is above the declared maximum.
    AboveMaximum {
        /// The declared maximum.
        max: Value,
    },
    /// A string or list candidate is shorter than the declared minimum.
    TooShort {
        /// The declared minimum length.
        min_len: usize,
        /// The candidate's length.
        len: usize,
    },
    /// A string or list candidate is longer than the declared maximum.
    TooLong {
        /// The declared maximum length.
        max_len: usize,
        /// The candidate's length.
        len: usize,
    },
    /// The candidate is not one of the declared choices.
    NotAChoice,
    /// A list element failed the element descriptor's validation.
    BadElement {
        /// The index of the failing element.
        index: usize,
        /// The element's own validation failure.
        source: Box<ValidationError>,
    },
}

/// A candidate value failed a property descriptor's constraint.
///
/// Raised by `set`-style operations; the stored value and the previous
/// value are left untouched when this is returned.
#[derive(Debug, PartialEq)]
pub struct ValidationError {
    /// The offending candidate value.
    pub value: Value,
    /// The constraint that rejected it.
    pub violation: Violation,
}

impl ValidationError {
    pub(crate) fn new(value: Value, violation: Violation) -> Self {
        Self { value, violation }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = &self.value;
        match &self.violation {
            Violation::KindMismatch { expected, actual } => {
                write!(f, "value {value} has kind {actual}, expected {expected}")
            }
            Violation::BelowMinimum { min } => {
                write!(f, "value {value} is below the minimum {min}")
            }
            Violation::AboveMaximum { max } => {
                write!(f, "value {value} is above the maximum {max}")
            }
            Violation::TooShort { min_len, len } => {
                write!(f, "length {len} is below the minimum length {min_len}")
            }
            Violation::TooLong { max_len, len } => {
                write!(f, "length {len} is above the maximum length {max_len}")
            }
            Violation::NotAChoice => {
                write!(f, "value {value} is not one of the declared choices")
            }
            Violation::BadElement { index, source } => {
                write!(f, "element {index} is invalid: {source}")
            }
        }
    }
}

impl core::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.violation {
            Violation::BadElement { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// A name-keyed accessor was given a name absent from the host's schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownPropertyError {
    /// The name that was looked up.
    pub name: String,
}

impl fmt::Display for UnknownPropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no property named {:?} in the schema", self.name)
    }
}

impl core::error::Error for UnknownPropertyError {}

/// A scalar API was used on a list-kind property, or vice versa.
///
/// Callers are expected to branch on a property's kind before choosing
/// between the scalar and the list API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrongKindError {
    /// The property name.
    pub name: String,
    /// The kind the schema declares for it.
    pub kind: PropertyKind,
}

impl fmt::Display for WrongKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "property {:?} has kind {}, which this accessor does not handle",
            self.name, self.kind
        )
    }
}

impl core::error::Error for WrongKindError {}

/// `add_listener` was called with a name already registered on the cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateListenerError {
    /// The listener name that was already present.
    pub name: String,
}

impl fmt::Display for DuplicateListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a listener named {:?} is already registered", self.name)
    }
}

impl core::error::Error for DuplicateListenerError {}

/// A listener operation was given a name with no registered listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownListenerError {
    /// The listener name that was looked up.
    pub name: String,
}

impl fmt::Display for UnknownListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no listener named {:?} is registered", self.name)
    }
}

impl core::error::Error for UnknownListenerError {}

/// A binding could not be established.
#[derive(Debug)]
pub enum BindingError {
    /// Both endpoints are the same property cell.
    SelfBinding,
    /// The endpoints have incompatible kinds.
    KindMismatch {
        /// The source endpoint's kind.
        source: PropertyKind,
        /// The target endpoint's kind.
        target: PropertyKind,
    },
    /// Synchronizing the target to the source's current value failed.
    InitialSync(SetError),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfBinding => f.write_str("cannot bind a property value to itself"),
            Self::KindMismatch { source, target } => {
                write!(f, "cannot bind a {source} property to a {target} property")
            }
            Self::InitialSync(err) => write!(f, "initial synchronization failed: {err}"),
        }
    }
}

impl core::error::Error for BindingError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InitialSync(err) => Some(err),
            _ => None,
        }
    }
}

/// The error type listener callbacks may return.
pub type ListenerError = Box<dyn core::error::Error>;

/// One failed listener invocation within a dispatch.
#[derive(Debug)]
pub struct ListenerFailure {
    /// The name of the listener that failed.
    pub listener: String,
    /// The error it returned.
    pub error: ListenerError,
}

/// One or more listeners failed during a single dispatch.
///
/// A failing listener never prevents later listeners in the same snapshot
/// from running; failures are collected and surfaced together once the
/// full snapshot has been dispatched.
#[derive(Debug)]
pub struct ListenerFailures {
    /// The failures, in dispatch order.
    pub failures: Vec<ListenerFailure>,
}

impl fmt::Display for ListenerFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} listener(s) failed:", self.failures.len())?;
        for failure in &self.failures {
            write!(f, " [{}: {}]", failure.listener, failure.error)?;
        }
        Ok(())
    }
}

impl core::error::Error for ListenerFailures {}

/// The ways a `set` on a property cell can fail.
#[derive(Debug)]
pub enum SetError {
    /// The candidate was rejected by validation; storage is unchanged.
    Invalid(ValidationError),
    /// The value was stored, but one or more listeners failed.
    Listeners(ListenerFailures),
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Listeners(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for SetError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Listeners(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SetError {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err)
    }
}

impl From<ListenerFailures> for SetError {
    fn from(err: ListenerFailures) -> Self {
        Self::Listeners(err)
    }
}

/// Umbrella error for host-level operations.
#[derive(Debug)]
pub enum PropertyError {
    /// See [`ValidationError`].
    Validation(ValidationError),
    /// See [`UnknownPropertyError`].
    UnknownProperty(UnknownPropertyError),
    /// See [`WrongKindError`].
    WrongKind(WrongKindError),
    /// See [`DuplicateListenerError`].
    DuplicateListener(DuplicateListenerError),
    /// See [`UnknownListenerError`].
    UnknownListener(UnknownListenerError),
    /// See [`ListenerFailures`].
    Listeners(ListenerFailures),
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UnknownProperty(err) => write!(f, "{err}"),
            Self::WrongKind(err) => write!(f, "{err}"),
            Self::DuplicateListener(err) => write!(f, "{err}"),
            Self::UnknownListener(err) => write!(f, "{err}"),
            Self::Listeners(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for PropertyError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::UnknownProperty(err) => Some(err),
            Self::WrongKind(err) => Some(err),
            Self::DuplicateListener(err) => Some(err),
            Self::UnknownListener(err) => Some(err),
            Self::Listeners(err) => Some(err),
        }
    }
}

impl From<ValidationError> for PropertyError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<UnknownPropertyError> for PropertyError {
    fn from(err: UnknownPropertyError) -> Self {
        Self::UnknownProperty(err)
    }
}

impl From<WrongKindError> for PropertyError {
    fn from(err: WrongKindError) -> Self {
        Self::WrongKind(err)
    }
}

impl From<DuplicateListenerError> for PropertyError {
    fn from(err: DuplicateListenerError) -> Self {
        Self::DuplicateListener(err)
    }
}

impl From<UnknownListenerError> for PropertyError {
    fn from(err: UnknownListenerError) -> Self {
        Self::UnknownListener(err)
    }
}

impl From<ListenerFailures> for PropertyError {
    fn from(err: ListenerFailures) -> Self {
        Self::Listeners(err)
    }
}

impl From<SetError> for PropertyError {
    fn from(err: SetError) -> Self {
        match err {
            SetError::Invalid(err) => Self::Validation(err),
            SetError::Listeners(err) => Self::Listeners(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::ToString;

    #[derive(Debug)]
    struct WidgetGone;

    impl fmt::Display for WidgetGone {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("widget gone")
        }
    }

    impl core::error::Error for WidgetGone {}

    #[test]
    fn validation_error_display() {
        let err = ValidationError::new(
            Value::Int(5),
            Violation::AboveMaximum { max: Value::Int(3) },
        );
        assert_eq!(err.to_string(), "value 5 is above the maximum 3");
    }

    #[test]
    fn bad_element_display_and_source() {
        let inner = ValidationError::new(
            Value::Int(-1),
            Violation::BelowMinimum { min: Value::Int(0) },
        );
        let err = ValidationError::new(
            Value::List(alloc::vec![Value::Int(-1)]),
            Violation::BadElement {
                index: 0,
                source: Box::new(inner),
            },
        );
        assert_eq!(
            err.to_string(),
            "element 0 is invalid: value -1 is below the minimum 0"
        );
        assert!(core::error::Error::source(&err).is_some());
    }

    #[test]
    fn listener_failures_display() {
        let failures = ListenerFailures {
            failures: alloc::vec![ListenerFailure {
                listener: "sync".to_string(),
                error: Box::new(WidgetGone),
            }],
        };
        let rendered = format!("{failures}");
        assert!(rendered.contains("1 listener(s) failed"));
        assert!(rendered.contains("sync"));
    }

    #[test]
    fn property_error_from_set_error() {
        let err = SetError::Invalid(ValidationError::new(Value::Bool(true), Violation::NotAChoice));
        assert!(matches!(
            PropertyError::from(err),
            PropertyError::Validation(_)
        ));
    }
}
