// Copyright 2026 the Propcell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic property values and kind tags.
//!
//! This module provides [`Value`], the dynamically-typed value stored in
//! every property cell, and [`PropertyKind`], the closed set of kind tags
//! a property descriptor can declare.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// The kind of a property, as declared by its descriptor.
///
/// Kind tags form a closed set. A descriptor's kind never changes once a
/// schema is built; subclass schemas may narrow constraints but must keep
/// the kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A boolean flag.
    Bool,
    /// A (possibly bounded) integer.
    Int,
    /// A (possibly bounded) real number.
    Real,
    /// A (possibly length-bounded) string.
    Str,
    /// One of a fixed set of string choices.
    Choice,
    /// An ordered sequence of values of one element kind.
    List,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Real => "real",
            Self::Str => "str",
            Self::Choice => "choice",
            Self::List => "list",
        };
        f.write_str(name)
    }
}

/// A dynamically-typed property value.
///
/// Values are stored and passed by value; they are cheap to clone for the
/// scalar variants and clone the whole sequence for [`Value::List`].
/// Choice-kind properties store their selection as [`Value::Str`].
///
/// # Example
///
/// ```rust
/// use propcell::{PropertyKind, Value};
///
/// let v = Value::Int(42);
/// assert_eq!(v.kind(), PropertyKind::Int);
/// assert_eq!(v.as_int(), Some(42));
/// assert_eq!(v.as_bool(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A real number.
    Real(f64),
    /// A string. Also the representation of a choice selection.
    Str(String),
    /// An ordered sequence of values.
    List(Vec<Value>),
}

impl Value {
    /// Returns the kind tag for this value.
    ///
    /// A [`Value::Str`] reports [`PropertyKind::Str`]; whether it is a
    /// choice selection is a fact about the descriptor, not the value.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Bool(_) => PropertyKind::Bool,
            Self::Int(_) => PropertyKind::Int,
            Self::Real(_) => PropertyKind::Real,
            Self::Str(_) => PropertyKind::Str,
            Self::List(_) => PropertyKind::List,
        }
    }

    /// Returns the contained boolean, if this is a [`Value::Bool`].
    #[must_use]
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the contained integer, if this is a [`Value::Int`].
    #[must_use]
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the contained real, if this is a [`Value::Real`].
    #[must_use]
    #[inline]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Returns the contained string, if this is a [`Value::Str`].
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained sequence, if this is a [`Value::List`].
    #[must_use]
    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(String::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    #[test]
    fn value_kinds() {
        assert_eq!(Value::Bool(true).kind(), PropertyKind::Bool);
        assert_eq!(Value::Int(1).kind(), PropertyKind::Int);
        assert_eq!(Value::Real(1.5).kind(), PropertyKind::Real);
        assert_eq!(Value::from("x").kind(), PropertyKind::Str);
        assert_eq!(Value::List(vec![]).kind(), PropertyKind::List);
    }

    #[test]
    fn value_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Real(0.5).as_real(), Some(0.5));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(
            Value::List(vec![Value::Int(1)]).as_list(),
            Some(&[Value::Int(1)][..])
        );
        assert_eq!(Value::Int(7).as_bool(), None);
    }

    #[test]
    fn value_display() {
        assert_eq!(format!("{}", Value::Bool(false)), "false");
        assert_eq!(format!("{}", Value::from("a")), "\"a\"");
        assert_eq!(
            format!("{}", Value::List(vec![Value::Int(1), Value::Int(2)])),
            "[1, 2]"
        );
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", PropertyKind::Choice), "choice");
    }
}
