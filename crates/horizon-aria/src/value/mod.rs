//! Reference-counted containers for accessible state and property values.
//!
//! An [`AccessibleValue`] is a cheap-to-clone handle to an immutable payload
//! of one [`ValueKind`]. There are two flavours of handle:
//!
//! - **hard-coded** values: booleans, tristates and every token value live in
//!   process-lifetime statics. Constructing one never allocates and its
//!   [`ref_count`](AccessibleValue::ref_count) is `None`.
//! - **dynamic** values: integers, numbers, strings and references are
//!   allocated on construction and shared by reference counting. Cloning a
//!   handle retains the payload; dropping the last handle releases it and
//!   runs the kind's cleanup (a reference value unregisters its weak link).
//!
//! # Example
//!
//! ```
//! use horizon_aria::{AccessibleValue, ValueKind};
//!
//! let label = AccessibleValue::string("Save");
//! let copy = label.clone();
//! assert_eq!(label.ref_count(), Some(2));
//! assert!(label.equal(&copy));
//! assert_eq!(label.kind(), ValueKind::String);
//! assert_eq!(label.to_string(), "Save");
//!
//! let now = AccessibleValue::number(0.25);
//! assert!(now.equal(&AccessibleValue::number(0.2505)));
//! assert_eq!(now.to_string(), "0.25");
//! ```

mod format;
mod kind;
mod reference;
mod token;

use std::fmt::{self, Write as _};
use std::sync::Arc;

use horizon_aria_core::ObjectId;

use crate::accessible::Accessible;
use crate::error::Result;

pub use kind::{ValueKind, ValueKindInfo};
pub use token::{
    AccessibleToken, Autocomplete, CheckedState, InvalidState, Orientation, PressedState, Sort,
    Tristate,
};

pub(crate) use reference::ReferenceLink;

/// Two numbers closer than this compare equal.
pub const NUMBER_TOLERANCE: f64 = 0.001;

/// The kind-specific payload of a value.
pub(crate) enum ValueData {
    Boolean(bool),
    Tristate(Tristate),
    Checked(CheckedState),
    Invalid(InvalidState),
    Pressed(PressedState),
    Autocomplete(Autocomplete),
    Orientation(Orientation),
    Sort(Sort),
    Integer(i32),
    Number(f64),
    String(StringPayload),
    Reference(ReferenceLink),
}

/// Owned text with its byte length cached for the equality fast path.
pub(crate) struct StringPayload {
    text: Box<str>,
    length: usize,
}

impl StringPayload {
    fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            length: text.len(),
        }
    }
}

impl ValueData {
    fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Tristate(_) => ValueKind::Tristate,
            Self::Checked(_) => ValueKind::Checked,
            Self::Invalid(_) => ValueKind::Invalid,
            Self::Pressed(_) => ValueKind::Pressed,
            Self::Autocomplete(_) => ValueKind::Autocomplete,
            Self::Orientation(_) => ValueKind::Orientation,
            Self::Sort(_) => ValueKind::Sort,
            Self::Integer(_) => ValueKind::Integer,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Reference(_) => ValueKind::Reference,
        }
    }
}

static BOOLEANS: [ValueData; 2] = [ValueData::Boolean(false), ValueData::Boolean(true)];

#[derive(Clone)]
enum Repr {
    Static(&'static ValueData),
    Shared(Arc<ValueData>),
}

/// A reference-counted accessible state or property value.
///
/// Cloning retains the value; dropping releases it. See the
/// [module documentation](self) for the hard-coded/dynamic split.
#[derive(Clone)]
pub struct AccessibleValue {
    repr: Repr,
}

static_assertions::assert_impl_all!(AccessibleValue: Send, Sync, Clone);

impl AccessibleValue {
    pub(crate) const fn from_static(data: &'static ValueData) -> Self {
        Self {
            repr: Repr::Static(data),
        }
    }

    fn alloc(data: ValueData) -> Self {
        Self {
            repr: Repr::Shared(Arc::new(data)),
        }
    }

    pub(crate) fn data(&self) -> &ValueData {
        match &self.repr {
            Repr::Static(data) => data,
            Repr::Shared(data) => data.as_ref(),
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// A boolean value. Never allocates.
    pub fn boolean(value: bool) -> Self {
        Self::from_static(&BOOLEANS[usize::from(value)])
    }

    /// A tristate value. Never allocates.
    pub fn tristate(value: Tristate) -> Self {
        value.to_value()
    }

    /// A token value of any vocabulary. Never allocates.
    pub fn token<T: AccessibleToken>(value: T) -> Self {
        value.to_value()
    }

    /// An integer value.
    pub fn integer(value: i32) -> Self {
        Self::alloc(ValueData::Integer(value))
    }

    /// A floating-point number value.
    pub fn number(value: f64) -> Self {
        Self::alloc(ValueData::Number(value))
    }

    /// A string value owning a copy of `text`.
    pub fn string(text: &str) -> Self {
        Self::alloc(ValueData::String(StringPayload::new(text)))
    }

    /// A weak reference to another accessible object.
    ///
    /// The value does not keep `target` alive. If `target` is destroyed first
    /// the value reads as an empty reference.
    pub fn reference(target: &dyn Accessible) -> Result<Self> {
        Self::reference_to(target.object_id())
    }

    /// A weak reference to the object with the given id.
    ///
    /// Fails when the object is not alive in the global registry.
    pub fn reference_to(target: ObjectId) -> Result<Self> {
        match ReferenceLink::new(target) {
            Ok(link) => Ok(Self::alloc(ValueData::Reference(link))),
            Err(err) => {
                tracing::error!(
                    target: horizon_aria_core::logging::targets::VALUE,
                    object = ?target,
                    error = %err,
                    "cannot reference object"
                );
                Err(err)
            }
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        self.data().kind()
    }

    /// Number of live handles to an allocated value, or `None` for a
    /// hard-coded value.
    pub fn ref_count(&self) -> Option<usize> {
        match &self.repr {
            Repr::Static(_) => None,
            Repr::Shared(data) => Some(Arc::strong_count(data)),
        }
    }

    /// Whether this handle points at a hard-coded value.
    pub fn is_static(&self) -> bool {
        matches!(self.repr, Repr::Static(_))
    }

    /// Whether both handles share the same payload.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Static(a), Repr::Static(b)) => std::ptr::eq(*a, *b),
            (Repr::Shared(a), Repr::Shared(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    // =========================================================================
    // Comparison and printing
    // =========================================================================

    /// Kind-specific equality.
    ///
    /// Integers, strings, booleans and tokens compare exactly, numbers within
    /// [`NUMBER_TOLERANCE`] and references by target identity. Values of
    /// different kinds are never equal.
    pub fn equal(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }

        match (self.data(), other.data()) {
            (ValueData::Boolean(a), ValueData::Boolean(b)) => a == b,
            (ValueData::Tristate(a), ValueData::Tristate(b)) => a == b,
            (ValueData::Checked(a), ValueData::Checked(b)) => a == b,
            (ValueData::Invalid(a), ValueData::Invalid(b)) => a == b,
            (ValueData::Pressed(a), ValueData::Pressed(b)) => a == b,
            (ValueData::Autocomplete(a), ValueData::Autocomplete(b)) => a == b,
            (ValueData::Orientation(a), ValueData::Orientation(b)) => a == b,
            (ValueData::Sort(a), ValueData::Sort(b)) => a == b,
            (ValueData::Integer(a), ValueData::Integer(b)) => a == b,
            (ValueData::Number(a), ValueData::Number(b)) => approx_eq(*a, *b),
            (ValueData::String(a), ValueData::String(b)) => {
                a.length == b.length && a.text == b.text
            }
            (ValueData::Reference(a), ValueData::Reference(b)) => a.target() == b.target(),
            (a, b) => {
                tracing::debug!(
                    target: horizon_aria_core::logging::targets::VALUE,
                    left = a.kind().name(),
                    right = b.kind().name(),
                    "comparing values of different kinds"
                );
                false
            }
        }
    }

    /// Append the human-readable form of this value to `buffer`.
    pub fn print(&self, buffer: &mut String) {
        // Writing into a String cannot fail.
        let _ = write!(buffer, "{self}");
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    /// The boolean payload, or `None` for any other kind.
    pub fn as_boolean(&self) -> Option<bool> {
        match self.data() {
            ValueData::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer payload, or `None` for any other kind.
    pub fn as_integer(&self) -> Option<i32> {
        match self.data() {
            ValueData::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The number payload, or `None` for any other kind.
    pub fn as_number(&self) -> Option<f64> {
        match self.data() {
            ValueData::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// The string payload, or `None` for any other kind.
    pub fn as_str(&self) -> Option<&str> {
        match self.data() {
            ValueData::String(payload) => Some(&payload.text),
            _ => None,
        }
    }

    /// The referenced object, or `None` for any other kind or once the
    /// target has been destroyed.
    pub fn as_reference(&self) -> Option<ObjectId> {
        match self.data() {
            ValueData::Reference(link) => link.target(),
            _ => None,
        }
    }

    /// The token payload of vocabulary `T`, or `None` for any other kind.
    pub fn as_token<T: AccessibleToken>(&self) -> Option<T> {
        T::from_value(self)
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    let delta = if a > b { a - b } else { b - a };
    delta < NUMBER_TOLERANCE
}

/// Null-safe equality.
///
/// Two absent values are equal, an absent and a present value are not, and
/// two present values compare with [`AccessibleValue::equal`].
pub fn values_equal(a: Option<&AccessibleValue>, b: Option<&AccessibleValue>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.equal(b),
        _ => false,
    }
}

impl fmt::Display for AccessibleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            ValueData::Boolean(value) => f.write_str(if *value { "true" } else { "false" }),
            ValueData::Tristate(token) => f.write_str(token.token()),
            ValueData::Checked(token) => f.write_str(token.token()),
            ValueData::Invalid(token) => f.write_str(token.token()),
            ValueData::Pressed(token) => f.write_str(token.token()),
            ValueData::Autocomplete(token) => f.write_str(token.token()),
            ValueData::Orientation(token) => f.write_str(token.token()),
            ValueData::Sort(token) => f.write_str(token.token()),
            ValueData::Integer(value) => write!(f, "{value}"),
            ValueData::Number(value) => format::write_general(f, *value),
            ValueData::String(payload) => f.write_str(&payload.text),
            ValueData::Reference(link) => link.fmt_target(f),
        }
    }
}

impl fmt::Debug for AccessibleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessibleValue")
            .field("kind", &self.kind())
            .field("value", &format_args!("{self}"))
            .field("ref_count", &self.ref_count())
            .finish()
    }
}

impl From<bool> for AccessibleValue {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}

impl From<i32> for AccessibleValue {
    fn from(value: i32) -> Self {
        Self::integer(value)
    }
}

impl From<f64> for AccessibleValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<&str> for AccessibleValue {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_coded_values_do_not_allocate() {
        let a = AccessibleValue::boolean(true);
        let b = AccessibleValue::boolean(true);
        assert!(a.is_static());
        assert!(a.ptr_eq(&b));
        assert_eq!(a.ref_count(), None);
        assert!(AccessibleValue::token(Sort::Ascending).is_static());
    }

    #[test]
    fn test_retain_release() {
        let value = AccessibleValue::integer(7);
        assert_eq!(value.ref_count(), Some(1));

        let retained = value.clone();
        assert!(retained.ptr_eq(&value));
        assert_eq!(value.ref_count(), Some(2));

        drop(retained);
        assert_eq!(value.ref_count(), Some(1));
        assert_eq!(value.as_integer(), Some(7));
    }

    #[test]
    fn test_integer_equality() {
        assert!(AccessibleValue::integer(3).equal(&AccessibleValue::integer(3)));
        assert!(!AccessibleValue::integer(3).equal(&AccessibleValue::integer(4)));
        assert_eq!(AccessibleValue::integer(-12).to_string(), "-12");
    }

    #[test]
    fn test_number_tolerance_boundary() {
        let one = AccessibleValue::number(1.0);
        assert!(one.equal(&AccessibleValue::number(1.0005)));
        assert!(!one.equal(&AccessibleValue::number(1.002)));
        assert!(AccessibleValue::number(1.0005).equal(&one));
        assert!(!AccessibleValue::number(f64::NAN).equal(&AccessibleValue::number(f64::NAN)));
    }

    #[test]
    fn test_string_equality_and_print() {
        let a = AccessibleValue::string("Open file");
        assert!(a.equal(&AccessibleValue::string("Open file")));
        assert!(!a.equal(&AccessibleValue::string("Open files")));
        assert!(!a.equal(&AccessibleValue::string("Open fil_")));
        assert_eq!(a.as_str(), Some("Open file"));

        let mut buffer = String::from("label=");
        a.print(&mut buffer);
        assert_eq!(buffer, "label=Open file");
    }

    #[test]
    fn test_cross_kind_is_unequal() {
        let int = AccessibleValue::integer(1);
        let number = AccessibleValue::number(1.0);
        let boolean = AccessibleValue::boolean(true);
        assert!(!int.equal(&number));
        assert!(!number.equal(&int));
        assert!(!boolean.equal(&AccessibleValue::tristate(Tristate::True)));
        assert!(
            !AccessibleValue::token(CheckedState::Mixed)
                .equal(&AccessibleValue::token(PressedState::Mixed))
        );
    }

    #[test]
    fn test_values_equal_is_null_safe() {
        let value = AccessibleValue::string("");
        assert!(values_equal(None, None));
        assert!(!values_equal(Some(&value), None));
        assert!(!values_equal(None, Some(&value)));
        assert!(values_equal(Some(&value), Some(&value)));
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        let value = AccessibleValue::string("10");
        assert_eq!(value.as_integer(), None);
        assert_eq!(value.as_number(), None);
        assert_eq!(value.as_boolean(), None);
        assert_eq!(value.as_reference(), None);
        assert_eq!(value.as_token::<Sort>(), None);
        assert_eq!(AccessibleValue::integer(10).as_str(), None);
    }

    #[test]
    fn test_debug_format() {
        let debug = format!("{:?}", AccessibleValue::integer(5));
        assert!(debug.contains("Integer"));
        assert!(debug.contains('5'));
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(AccessibleValue::from(true).as_boolean(), Some(true));
        assert_eq!(AccessibleValue::from(4).as_integer(), Some(4));
        assert_eq!(AccessibleValue::from(2.5).as_number(), Some(2.5));
        assert_eq!(AccessibleValue::from("x").as_str(), Some("x"));
    }
}
