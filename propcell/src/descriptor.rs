// Copyright 2026 the Propcell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property descriptors: kind tags, constraints, and validation.
//!
//! A [`PropertyType`] is an immutable description of what a property's
//! values may look like: a [`Constraint`] payload, a default value, an
//! optional help string for metadata consumers, and the policy for
//! invalid writes. Validation is a pure function over the candidate
//! value; descriptors never hold per-instance state.
//!
//! # Example
//!
//! ```rust
//! use propcell::{PropertyType, Value};
//!
//! let volume = PropertyType::int().with_min(0).with_max(11).with_default(5);
//!
//! assert_eq!(volume.validate(&Value::Int(7)), Ok(Value::Int(7)));
//! assert!(volume.validate(&Value::Int(12)).is_err());
//! assert_eq!(volume.default_value(), Value::Int(5));
//! ```

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{ValidationError, Violation};
use crate::value::{PropertyKind, Value};

/// Default tolerance used by real-valued equality.
const DEFAULT_PRECISION: f64 = 1e-9;

/// The constraint payload of a [`PropertyType`].
///
/// This is a closed set: one validation arm per variant, dispatched by
/// kind rather than by runtime type introspection.
#[derive(Clone, Debug)]
pub enum Constraint {
    /// A boolean flag; any `Bool` candidate is valid.
    Bool,
    /// A bounded integer.
    Int {
        /// Inclusive lower bound, if any.
        min: Option<i64>,
        /// Inclusive upper bound, if any.
        max: Option<i64>,
        /// When `true`, out-of-range candidates are clamped into range
        /// instead of rejected.
        clamp: bool,
    },
    /// A bounded real number. `Int` candidates are promoted.
    Real {
        /// Inclusive lower bound, if any.
        min: Option<f64>,
        /// Inclusive upper bound, if any.
        max: Option<f64>,
        /// When `true`, out-of-range candidates are clamped into range
        /// instead of rejected.
        clamp: bool,
        /// Tolerance for the equality predicate.
        precision: f64,
    },
    /// A length-bounded string. Lengths are counted in characters.
    Str {
        /// Minimum length, if any.
        min_len: Option<usize>,
        /// Maximum length, if any.
        max_len: Option<usize>,
    },
    /// One of a fixed set of string choices.
    Choice {
        /// The allowed choices, in declaration order.
        choices: Vec<String>,
    },
    /// An ordered sequence whose elements satisfy an element descriptor.
    List {
        /// The descriptor every element must satisfy.
        element: Box<PropertyType>,
        /// Minimum element count, if any.
        min_len: Option<usize>,
        /// Maximum element count, if any.
        max_len: Option<usize>,
    },
}

/// An immutable descriptor for a property's values.
///
/// Descriptors are declared once per schema and shared by every host
/// instance. They are built with the kind constructors
/// ([`PropertyType::boolean`], [`PropertyType::int`], …) followed by
/// consuming `with_*` modifiers.
#[derive(Clone, Debug)]
pub struct PropertyType {
    constraint: Constraint,
    default: Option<Value>,
    help: Option<String>,
    allow_invalid: bool,
}

impl PropertyType {
    fn from_constraint(constraint: Constraint) -> Self {
        Self {
            constraint,
            default: None,
            help: None,
            allow_invalid: false,
        }
    }

    /// Creates a boolean descriptor. The kind default is `false`.
    #[must_use]
    pub fn boolean() -> Self {
        Self::from_constraint(Constraint::Bool)
    }

    /// Creates an unbounded integer descriptor. The kind default is `0`,
    /// clamped into range once bounds are declared.
    #[must_use]
    pub fn int() -> Self {
        Self::from_constraint(Constraint::Int {
            min: None,
            max: None,
            clamp: false,
        })
    }

    /// Creates an unbounded real descriptor. The kind default is `0.0`,
    /// clamped into range once bounds are declared.
    #[must_use]
    pub fn real() -> Self {
        Self::from_constraint(Constraint::Real {
            min: None,
            max: None,
            clamp: false,
            precision: DEFAULT_PRECISION,
        })
    }

    /// Creates a string descriptor. The kind default is the empty string.
    #[must_use]
    pub fn string() -> Self {
        Self::from_constraint(Constraint::Str {
            min_len: None,
            max_len: None,
        })
    }

    /// Creates a choice descriptor. The kind default is the first choice.
    ///
    /// An empty choice set is allowed; such a property starts invalid and
    /// rejects every candidate.
    #[must_use]
    pub fn choice<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_constraint(Constraint::Choice {
            choices: choices.into_iter().map(Into::into).collect(),
        })
    }

    /// Creates a list descriptor with the given element descriptor. The
    /// kind default is the empty list.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::from_constraint(Constraint::List {
            element: Box::new(element),
            min_len: None,
            max_len: None,
        })
    }

    /// Declares an inclusive lower bound.
    ///
    /// # Panics
    ///
    /// Panics if this is not an int or real descriptor, or if the bound's
    /// kind does not match.
    #[must_use]
    pub fn with_min(mut self, min: impl Into<Value>) -> Self {
        let bound = min.into();
        match (&mut self.constraint, &bound) {
            (Constraint::Int { min, .. }, Value::Int(v)) => *min = Some(*v),
            (Constraint::Real { min, .. }, Value::Real(v)) => *min = Some(*v),
            (Constraint::Real { min, .. }, Value::Int(v)) => {
                #[expect(clippy::cast_precision_loss, reason = "bounds are declaration-time")]
                {
                    *min = Some(*v as f64);
                }
            }
            _ => panic!("a {} bound does not apply to a {} property", bound.kind(), self.kind()),
        }
        self
    }

    /// Declares an inclusive upper bound.
    ///
    /// # Panics
    ///
    /// Panics if this is not an int or real descriptor, or if the bound's
    /// kind does not match.
    #[must_use]
    pub fn with_max(mut self, max: impl Into<Value>) -> Self {
        let bound = max.into();
        match (&mut self.constraint, &bound) {
            (Constraint::Int { max, .. }, Value::Int(v)) => *max = Some(*v),
            (Constraint::Real { max, .. }, Value::Real(v)) => *max = Some(*v),
            (Constraint::Real { max, .. }, Value::Int(v)) => {
                #[expect(clippy::cast_precision_loss, reason = "bounds are declaration-time")]
                {
                    *max = Some(*v as f64);
                }
            }
            _ => panic!("a {} bound does not apply to a {} property", bound.kind(), self.kind()),
        }
        self
    }

    /// Makes out-of-range numeric candidates clamp into range instead of
    /// being rejected.
    ///
    /// # Panics
    ///
    /// Panics if this is not an int or real descriptor.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        match &mut self.constraint {
            Constraint::Int { clamp, .. } | Constraint::Real { clamp, .. } => *clamp = true,
            _ => panic!("clamping does not apply to a {} property", self.kind()),
        }
        self
    }

    /// Sets the tolerance used by real-valued equality.
    ///
    /// # Panics
    ///
    /// Panics if this is not a real descriptor.
    #[must_use]
    pub fn with_precision(mut self, precision: f64) -> Self {
        match &mut self.constraint {
            Constraint::Real { precision: p, .. } => *p = precision,
            _ => panic!("precision does not apply to a {} property", self.kind()),
        }
        self
    }

    /// Declares a minimum length for a string or list descriptor.
    ///
    /// # Panics
    ///
    /// Panics if this is not a string or list descriptor.
    #[must_use]
    pub fn with_min_len(mut self, len: usize) -> Self {
        match &mut self.constraint {
            Constraint::Str { min_len, .. } | Constraint::List { min_len, .. } => {
                *min_len = Some(len);
            }
            _ => panic!("a length bound does not apply to a {} property", self.kind()),
        }
        self
    }

    /// Declares a maximum length for a string or list descriptor.
    ///
    /// # Panics
    ///
    /// Panics if this is not a string or list descriptor.
    #[must_use]
    pub fn with_max_len(mut self, len: usize) -> Self {
        match &mut self.constraint {
            Constraint::Str { max_len, .. } | Constraint::List { max_len, .. } => {
                *max_len = Some(len);
            }
            _ => panic!("a length bound does not apply to a {} property", self.kind()),
        }
        self
    }

    /// Declares the default value.
    ///
    /// # Panics
    ///
    /// Panics if the default fails this descriptor's own validation.
    /// Declare constraints before the default.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        let candidate = default.into();
        match self.validate(&candidate) {
            Ok(normalized) => self.default = Some(normalized),
            Err(err) => panic!("declared default is invalid: {err}"),
        }
        self
    }

    /// Attaches a human-readable help string, surfaced to metadata
    /// consumers such as CLI and GUI generators.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Allows invalid writes: a failing candidate is stored anyway and
    /// the cell's validity flag goes `false`, instead of the write being
    /// rejected.
    #[must_use]
    pub fn allowing_invalid(mut self) -> Self {
        self.allow_invalid = true;
        self
    }

    /// Returns the kind tag.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match &self.constraint {
            Constraint::Bool => PropertyKind::Bool,
            Constraint::Int { .. } => PropertyKind::Int,
            Constraint::Real { .. } => PropertyKind::Real,
            Constraint::Str { .. } => PropertyKind::Str,
            Constraint::Choice { .. } => PropertyKind::Choice,
            Constraint::List { .. } => PropertyKind::List,
        }
    }

    /// Returns the constraint payload.
    #[must_use]
    #[inline]
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Returns the help string, if one was declared.
    #[must_use]
    #[inline]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns whether invalid writes are stored rather than rejected.
    #[must_use]
    #[inline]
    pub fn allow_invalid(&self) -> bool {
        self.allow_invalid
    }

    /// Returns the element descriptor of a list descriptor.
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match &self.constraint {
            Constraint::List { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Returns the default value: the declared default if one was given,
    /// otherwise the kind default (`false`, `0` or `0.0` clamped into
    /// range, the empty string, the first choice, the empty list).
    #[must_use]
    pub fn default_value(&self) -> Value {
        if let Some(default) = &self.default {
            return default.clone();
        }
        match &self.constraint {
            Constraint::Bool => Value::Bool(false),
            Constraint::Int { min, max, .. } => Value::Int(clamp_int(0, *min, *max)),
            Constraint::Real { min, max, .. } => Value::Real(clamp_real(0.0, *min, *max)),
            Constraint::Str { .. } => Value::Str(String::new()),
            Constraint::Choice { choices } => {
                Value::Str(choices.first().map(String::as_str).unwrap_or("").to_owned())
            }
            Constraint::List { .. } => Value::List(Vec::new()),
        }
    }

    /// Validates a candidate value, returning its normalized form.
    ///
    /// This is pure: it has no side effects on the descriptor or on any
    /// cell. Normalization covers int-to-real promotion and, for clamped
    /// numeric descriptors, clamping into range. List candidates are
    /// validated element-by-element against the element descriptor.
    ///
    /// # Errors
    ///
    /// - [`ValidationError`]: the candidate's kind does not match, it is
    ///   out of bounds, it is not one of the choices, or an element of a
    ///   list candidate is itself invalid.
    pub fn validate(&self, candidate: &Value) -> Result<Value, ValidationError> {
        match &self.constraint {
            Constraint::Bool => match candidate {
                Value::Bool(b) => Ok(Value::Bool(*b)),
                other => Err(kind_mismatch(other, PropertyKind::Bool)),
            },
            Constraint::Int { min, max, clamp } => match candidate {
                Value::Int(i) => {
                    if *clamp {
                        return Ok(Value::Int(clamp_int(*i, *min, *max)));
                    }
                    if let Some(min) = min
                        && i < min
                    {
                        return Err(ValidationError::new(
                            candidate.clone(),
                            Violation::BelowMinimum {
                                min: Value::Int(*min),
                            },
                        ));
                    }
                    if let Some(max) = max
                        && i > max
                    {
                        return Err(ValidationError::new(
                            candidate.clone(),
                            Violation::AboveMaximum {
                                max: Value::Int(*max),
                            },
                        ));
                    }
                    Ok(Value::Int(*i))
                }
                other => Err(kind_mismatch(other, PropertyKind::Int)),
            },
            Constraint::Real {
                min, max, clamp, ..
            } => {
                let r = match candidate {
                    Value::Real(r) => *r,
                    #[expect(clippy::cast_precision_loss, reason = "promotion is best-effort")]
                    Value::Int(i) => *i as f64,
                    other => return Err(kind_mismatch(other, PropertyKind::Real)),
                };
                if *clamp {
                    return Ok(Value::Real(clamp_real(r, *min, *max)));
                }
                if let Some(min) = min
                    && r < *min
                {
                    return Err(ValidationError::new(
                        candidate.clone(),
                        Violation::BelowMinimum {
                            min: Value::Real(*min),
                        },
                    ));
                }
                if let Some(max) = max
                    && r > *max
                {
                    return Err(ValidationError::new(
                        candidate.clone(),
                        Violation::AboveMaximum {
                            max: Value::Real(*max),
                        },
                    ));
                }
                Ok(Value::Real(r))
            }
            Constraint::Str { min_len, max_len } => match candidate {
                Value::Str(s) => {
                    let len = s.chars().count();
                    check_len(len, *min_len, *max_len, candidate)?;
                    Ok(Value::Str(s.clone()))
                }
                other => Err(kind_mismatch(other, PropertyKind::Str)),
            },
            Constraint::Choice { choices } => match candidate {
                Value::Str(s) => {
                    if choices.iter().any(|c| c == s) {
                        Ok(Value::Str(s.clone()))
                    } else {
                        Err(ValidationError::new(candidate.clone(), Violation::NotAChoice))
                    }
                }
                other => Err(kind_mismatch(other, PropertyKind::Str)),
            },
            Constraint::List {
                element,
                min_len,
                max_len,
            } => match candidate {
                Value::List(items) => {
                    check_len(items.len(), *min_len, *max_len, candidate)?;
                    let mut normalized = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        match element.validate(item) {
                            Ok(v) => normalized.push(v),
                            Err(err) => {
                                return Err(ValidationError::new(
                                    candidate.clone(),
                                    Violation::BadElement {
                                        index,
                                        source: Box::new(err),
                                    },
                                ));
                            }
                        }
                    }
                    Ok(Value::List(normalized))
                }
                other => Err(kind_mismatch(other, PropertyKind::List)),
            },
        }
    }

    /// The "unchanged" predicate used for notification suppression.
    ///
    /// Real-kind descriptors compare within their declared precision;
    /// list-kind descriptors compare element-wise with the element
    /// descriptor's predicate; every other kind uses plain equality.
    #[must_use]
    pub fn values_equal(&self, a: &Value, b: &Value) -> bool {
        match &self.constraint {
            Constraint::Real { precision, .. } => match (as_real(a), as_real(b)) {
                (Some(a), Some(b)) => (a - b).abs() <= *precision,
                _ => a == b,
            },
            Constraint::List { element, .. } => match (a, b) {
                (Value::List(a), Value::List(b)) => {
                    a.len() == b.len()
                        && a.iter().zip(b.iter()).all(|(x, y)| element.values_equal(x, y))
                }
                _ => a == b,
            },
            _ => a == b,
        }
    }
}

fn kind_mismatch(candidate: &Value, expected: PropertyKind) -> ValidationError {
    ValidationError::new(
        candidate.clone(),
        Violation::KindMismatch {
            expected,
            actual: candidate.kind(),
        },
    )
}

fn check_len(
    len: usize,
    min_len: Option<usize>,
    max_len: Option<usize>,
    candidate: &Value,
) -> Result<(), ValidationError> {
    if let Some(min_len) = min_len
        && len < min_len
    {
        return Err(ValidationError::new(
            candidate.clone(),
            Violation::TooShort { min_len, len },
        ));
    }
    if let Some(max_len) = max_len
        && len > max_len
    {
        return Err(ValidationError::new(
            candidate.clone(),
            Violation::TooLong { max_len, len },
        ));
    }
    Ok(())
}

fn clamp_int(v: i64, min: Option<i64>, max: Option<i64>) -> i64 {
    let v = match min {
        Some(min) if v < min => min,
        _ => v,
    };
    match max {
        Some(max) if v > max => max,
        _ => v,
    }
}

fn clamp_real(v: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let v = match min {
        Some(min) if v < min => min,
        _ => v,
    };
    match max {
        Some(max) if v > max => max,
        _ => v,
    }
}

fn as_real(v: &Value) -> Option<f64> {
    match v {
        Value::Real(r) => Some(*r),
        #[expect(clippy::cast_precision_loss, reason = "promotion is best-effort")]
        Value::Int(i) => Some(*i as f64),
        _ => None,
    }
}
