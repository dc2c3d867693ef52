//! Decoding attribute values.
//!
//! Values can be built from three sources, all driven by the attribute
//! tables:
//!
//! - an argument list of [`AttributeArg`]s, one argument per attribute;
//! - a boxed `&dyn Any` holding a plain Rust value;
//! - text, as found in UI definition files.
//!
//! Every decoding failure is returned as an [`Error`] and also logged under
//! the `horizon_aria::collect` target.

use std::any::Any;
use std::fmt;
use std::num::IntErrorKind;

use horizon_aria_core::ObjectId;
use horizon_aria_core::logging::targets;

use super::{AccessibleProperty, AccessibleState, Attribute, CollectKind, Constructor};
use crate::accessible::Accessible;
use crate::error::{Error, Result};
use crate::value::{
    AccessibleToken, AccessibleValue, Autocomplete, CheckedState, InvalidState, Orientation,
    PressedState, Sort, Tristate,
};

/// One argument of an attribute update.
#[derive(Clone, Copy)]
pub enum AttributeArg<'a> {
    Boolean(bool),
    Integer(i32),
    Tristate(Tristate),
    /// A raw token integer of the attribute's vocabulary.
    Token(i32),
    Number(f64),
    String(&'a str),
    Reference(&'a dyn Accessible),
}

impl<'a> AttributeArg<'a> {
    /// A token argument from a typed vocabulary value.
    pub fn token<T: AccessibleToken>(token: T) -> Self {
        AttributeArg::Token(token.to_raw())
    }

    /// The argument shape of this argument.
    pub fn collect_kind(&self) -> CollectKind {
        match self {
            AttributeArg::Boolean(_) => CollectKind::Boolean,
            AttributeArg::Integer(_) => CollectKind::Integer,
            AttributeArg::Tristate(_) => CollectKind::Tristate,
            AttributeArg::Token(_) => CollectKind::Token,
            AttributeArg::Number(_) => CollectKind::Number,
            AttributeArg::String(_) => CollectKind::String,
            AttributeArg::Reference(_) => CollectKind::Reference,
        }
    }
}

impl fmt::Debug for AttributeArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeArg::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            AttributeArg::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            AttributeArg::Tristate(value) => f.debug_tuple("Tristate").field(value).finish(),
            AttributeArg::Token(raw) => f.debug_tuple("Token").field(raw).finish(),
            AttributeArg::Number(value) => f.debug_tuple("Number").field(value).finish(),
            AttributeArg::String(text) => f.debug_tuple("String").field(text).finish(),
            AttributeArg::Reference(target) => f
                .debug_tuple("Reference")
                .field(&target.object_id())
                .finish(),
        }
    }
}

impl From<bool> for AttributeArg<'_> {
    fn from(value: bool) -> Self {
        AttributeArg::Boolean(value)
    }
}

impl From<i32> for AttributeArg<'_> {
    fn from(value: i32) -> Self {
        AttributeArg::Integer(value)
    }
}

impl From<Tristate> for AttributeArg<'_> {
    fn from(value: Tristate) -> Self {
        AttributeArg::Tristate(value)
    }
}

impl From<f64> for AttributeArg<'_> {
    fn from(value: f64) -> Self {
        AttributeArg::Number(value)
    }
}

impl<'a> From<&'a str> for AttributeArg<'a> {
    fn from(value: &'a str) -> Self {
        AttributeArg::String(value)
    }
}

impl<'a> From<&'a dyn Accessible> for AttributeArg<'a> {
    fn from(value: &'a dyn Accessible) -> Self {
        AttributeArg::Reference(value)
    }
}

// =============================================================================
// Defaults
// =============================================================================

/// The value a state has when it has not been set.
pub fn default_for_state(state: AccessibleState) -> AccessibleValue {
    match state {
        AccessibleState::Busy | AccessibleState::Disabled | AccessibleState::Hidden => {
            AccessibleValue::boolean(false)
        }
        AccessibleState::Checked => CheckedState::Undefined.to_value(),
        AccessibleState::Expanded | AccessibleState::Grabbed | AccessibleState::Selected => {
            Tristate::Undefined.to_value()
        }
        AccessibleState::Invalid => InvalidState::False.to_value(),
        AccessibleState::Pressed => PressedState::Undefined.to_value(),
    }
}

/// The value a property has when it has not been set.
///
/// Relation properties and `relevant` have no default and return `None`.
pub fn default_for_property(property: AccessibleProperty) -> Option<AccessibleValue> {
    use AccessibleProperty as P;

    let value = match property {
        P::ActiveDescendant
        | P::Controls
        | P::DescribedBy
        | P::FlowTo
        | P::LabelledBy
        | P::Owns
        | P::Relevant => return None,
        P::Autocomplete => Autocomplete::None.to_value(),
        P::HasPopup | P::MultiLine | P::MultiSelectable | P::ReadOnly | P::Required => {
            AccessibleValue::boolean(false)
        }
        P::Label | P::ValueText => AccessibleValue::string(""),
        P::Level | P::PosInSet | P::SetSize => AccessibleValue::integer(0),
        P::Orientation => Orientation::Horizontal.to_value(),
        P::Sort => Sort::None.to_value(),
        P::ValueMax | P::ValueMin | P::ValueNow => AccessibleValue::number(0.0),
    };
    Some(value)
}

// =============================================================================
// Argument lists
// =============================================================================

/// Build a state value from the next argument of `args`.
pub fn collect_for_state<'a>(
    state: AccessibleState,
    args: &mut impl Iterator<Item = AttributeArg<'a>>,
) -> Result<AccessibleValue> {
    collect_next(state, args)
}

/// Build a property value from the next argument of `args`.
pub fn collect_for_property<'a>(
    property: AccessibleProperty,
    args: &mut impl Iterator<Item = AttributeArg<'a>>,
) -> Result<AccessibleValue> {
    collect_next(property, args)
}

fn collect_next<'a, A: Attribute>(
    attribute: A,
    args: &mut impl Iterator<Item = AttributeArg<'a>>,
) -> Result<AccessibleValue> {
    match args.next() {
        Some(arg) => collect_arg(attribute, arg),
        None => Err(report(Error::MissingArgument {
            attribute: attribute.name(),
        })),
    }
}

/// Build a value for `attribute` from a single argument.
pub(crate) fn collect_arg<A: Attribute>(attribute: A, arg: AttributeArg<'_>) -> Result<AccessibleValue> {
    let info = attribute.info();

    let result = match (info.constructor, arg) {
        (Constructor::Boolean(ctor), AttributeArg::Boolean(value)) => Ok(ctor(value)),
        (Constructor::Integer(ctor), AttributeArg::Integer(value)) => Ok(ctor(value)),
        (Constructor::Tristate(ctor), AttributeArg::Tristate(value)) => Ok(ctor(value)),
        (Constructor::Token(token), AttributeArg::Token(raw)) => {
            (token.from_raw)(raw).ok_or_else(|| Error::invalid_token(info.name, raw))
        }
        (Constructor::Number(ctor), AttributeArg::Number(value)) => Ok(ctor(value)),
        (Constructor::String(ctor), AttributeArg::String(text)) => Ok(ctor(text)),
        (Constructor::Reference(ctor), AttributeArg::Reference(target)) => {
            ctor(target.object_id())
        }
        (constructor, arg) => Err(Error::ArgumentMismatch {
            attribute: info.name,
            expected: constructor.collect_kind(),
            got: arg.collect_kind(),
        }),
    };

    finish(info.name, result)
}

// =============================================================================
// Boxed values
// =============================================================================

/// Build a state value from a boxed Rust value.
///
/// Pass the boxed value itself (`boxed.as_ref()`), not a reference to the
/// box. See [`collect_for_property_value`] for the accepted types.
pub fn collect_for_state_value(state: AccessibleState, boxed: &dyn Any) -> Result<AccessibleValue> {
    collect_boxed(state, boxed)
}

/// Build a property value from a boxed Rust value.
///
/// Accepted types per argument shape:
///
/// | Shape     | Types                                          |
/// |-----------|------------------------------------------------|
/// | boolean   | `bool`                                         |
/// | integer   | `i32`                                          |
/// | tristate  | [`Tristate`], `Option<bool>`, raw `i32`        |
/// | token     | the attribute's vocabulary type, raw `i32`     |
/// | number    | `f64`, `f32`                                   |
/// | string    | `String`, `&'static str`, `Option<String>`     |
/// | reference | [`ObjectId`], `Option<ObjectId>`               |
///
/// An empty `Option` is rejected with [`Error::NullValue`].
pub fn collect_for_property_value(
    property: AccessibleProperty,
    boxed: &dyn Any,
) -> Result<AccessibleValue> {
    collect_boxed(property, boxed)
}

pub(crate) fn collect_boxed<A: Attribute>(attribute: A, boxed: &dyn Any) -> Result<AccessibleValue> {
    let info = attribute.info();
    let name = info.name;
    let expected = info.collect_kind();
    let mismatch = || Error::BoxedTypeMismatch {
        attribute: name,
        expected,
    };
    let null = || Error::NullValue {
        attribute: name,
        expected,
    };

    let result = match info.constructor {
        Constructor::Boolean(ctor) => boxed
            .downcast_ref::<bool>()
            .map(|value| ctor(*value))
            .ok_or_else(mismatch),
        Constructor::Integer(ctor) => boxed
            .downcast_ref::<i32>()
            .map(|value| ctor(*value))
            .ok_or_else(mismatch),
        Constructor::Tristate(ctor) => {
            if let Some(value) = boxed.downcast_ref::<Tristate>() {
                Ok(ctor(*value))
            } else if let Some(value) = boxed.downcast_ref::<Option<bool>>() {
                Ok(ctor(Tristate::from(*value)))
            } else if let Some(raw) = boxed.downcast_ref::<i32>() {
                Tristate::from_raw(*raw)
                    .map(ctor)
                    .ok_or_else(|| Error::invalid_token(name, raw))
            } else {
                Err(mismatch())
            }
        }
        Constructor::Token(token) => match (token.from_boxed)(boxed) {
            Some(raw) => (token.from_raw)(raw).ok_or_else(|| Error::invalid_token(name, raw)),
            None => Err(mismatch()),
        },
        Constructor::Number(ctor) => {
            if let Some(value) = boxed.downcast_ref::<f64>() {
                Ok(ctor(*value))
            } else if let Some(value) = boxed.downcast_ref::<f32>() {
                Ok(ctor(f64::from(*value)))
            } else {
                Err(mismatch())
            }
        }
        Constructor::String(ctor) => {
            if let Some(text) = boxed.downcast_ref::<String>() {
                Ok(ctor(text))
            } else if let Some(text) = boxed.downcast_ref::<&'static str>() {
                Ok(ctor(text))
            } else if let Some(text) = boxed.downcast_ref::<Option<String>>() {
                text.as_deref().map(ctor).ok_or_else(null)
            } else {
                Err(mismatch())
            }
        }
        Constructor::Reference(ctor) => {
            if let Some(id) = boxed.downcast_ref::<ObjectId>() {
                ctor(*id)
            } else if let Some(id) = boxed.downcast_ref::<Option<ObjectId>>() {
                (*id).ok_or_else(null).and_then(ctor)
            } else {
                Err(mismatch())
            }
        }
    };

    finish(name, result)
}

// =============================================================================
// Text
// =============================================================================

/// Build a state value from text.
///
/// Booleans accept `true`/`false`, `yes`/`no` and `1`/`0` in any case.
/// Tristates and tokens accept their token names; tristates also accept the
/// boolean spellings.
pub fn parse_for_state(state: AccessibleState, text: &str) -> Result<AccessibleValue> {
    parse(state, text)
}

/// Build a property value from text.
///
/// Integers and numbers reject out-of-range input with
/// [`Error::InvalidRange`]. Strings are taken verbatim. Reference properties
/// cannot be given as text.
pub fn parse_for_property(property: AccessibleProperty, text: &str) -> Result<AccessibleValue> {
    parse(property, text)
}

fn parse<A: Attribute>(attribute: A, text: &str) -> Result<AccessibleValue> {
    let info = attribute.info();
    let name = info.name;
    let trimmed = text.trim();

    let result = match info.constructor {
        Constructor::Boolean(ctor) => parse_boolean(trimmed)
            .map(ctor)
            .ok_or_else(|| Error::invalid_value(name, text)),
        Constructor::Integer(ctor) => parse_integer(name, trimmed).map(ctor),
        Constructor::Tristate(ctor) => Tristate::from_token(trimmed)
            .or_else(|| parse_boolean(trimmed).map(Tristate::from))
            .map(ctor)
            .ok_or_else(|| Error::invalid_token(name, trimmed)),
        Constructor::Token(token) => {
            (token.from_token)(trimmed).ok_or_else(|| Error::invalid_token(name, trimmed))
        }
        Constructor::Number(ctor) => parse_number(name, trimmed).map(ctor),
        Constructor::String(ctor) => Ok(ctor(text)),
        Constructor::Reference(_) => Err(Error::invalid_value(name, text)),
    };

    finish(name, result)
}

fn parse_boolean(text: &str) -> Option<bool> {
    const TRUE: [&str; 3] = ["true", "yes", "1"];
    const FALSE: [&str; 3] = ["false", "no", "0"];

    if TRUE.iter().any(|word| word.eq_ignore_ascii_case(text)) {
        Some(true)
    } else if FALSE.iter().any(|word| word.eq_ignore_ascii_case(text)) {
        Some(false)
    } else {
        None
    }
}

fn parse_integer(attribute: &'static str, text: &str) -> Result<i32> {
    match text.parse::<i32>() {
        Ok(value) => Ok(value),
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(Error::invalid_range(attribute, text))
        }
        Err(_) => Err(Error::invalid_value(attribute, text)),
    }
}

fn parse_number(attribute: &'static str, text: &str) -> Result<f64> {
    let value: f64 = text
        .parse()
        .map_err(|_| Error::invalid_value(attribute, text))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid_range(attribute, text))
    }
}

// =============================================================================
// Reporting
// =============================================================================

fn finish(attribute: &'static str, result: Result<AccessibleValue>) -> Result<AccessibleValue> {
    match &result {
        Ok(value) => {
            tracing::trace!(target: targets::COLLECT, attribute, %value, "collected attribute value");
        }
        Err(err) => {
            tracing::error!(target: targets::COLLECT, attribute, error = %err, "failed to collect attribute value");
        }
    }
    result
}

fn report(err: Error) -> Error {
    tracing::error!(target: targets::COLLECT, error = %err, "failed to collect attribute value");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn test_state_defaults() {
        assert_eq!(default_for_state(AccessibleState::Busy).as_boolean(), Some(false));
        assert_eq!(
            default_for_state(AccessibleState::Checked).as_token(),
            Some(CheckedState::Undefined)
        );
        assert_eq!(
            default_for_state(AccessibleState::Selected).as_token(),
            Some(Tristate::Undefined)
        );
        assert_eq!(
            default_for_state(AccessibleState::Invalid).as_token(),
            Some(InvalidState::False)
        );
        for state in AccessibleState::all() {
            let value = default_for_state(state);
            assert_eq!(value.kind(), state.info().constructor.value_kind());
            assert!(value.is_static());
        }
    }

    #[test]
    fn test_property_defaults() {
        assert_eq!(
            default_for_property(AccessibleProperty::Label).and_then(|v| v.as_str().map(String::from)),
            Some(String::new())
        );
        assert!(default_for_property(AccessibleProperty::ActiveDescendant).is_none());
        assert!(default_for_property(AccessibleProperty::Relevant).is_none());
        assert_eq!(
            default_for_property(AccessibleProperty::Orientation).and_then(|v| v.as_token()),
            Some(Orientation::Horizontal)
        );
        for property in AccessibleProperty::all() {
            if let Some(value) = default_for_property(property) {
                assert_eq!(value.kind(), property.info().constructor.value_kind());
            } else {
                assert!(matches!(
                    property.collect_kind(),
                    CollectKind::Reference | CollectKind::String
                ));
            }
        }
    }

    #[test]
    fn test_collect_arguments_in_order() {
        let mut args = [
            AttributeArg::Boolean(true),
            AttributeArg::token(CheckedState::Mixed),
            AttributeArg::Tristate(Tristate::True),
        ]
        .into_iter();

        let busy = collect_for_state(AccessibleState::Busy, &mut args).unwrap();
        let checked = collect_for_state(AccessibleState::Checked, &mut args).unwrap();
        let expanded = collect_for_state(AccessibleState::Expanded, &mut args).unwrap();

        assert_eq!(busy.as_boolean(), Some(true));
        assert_eq!(checked.to_string(), "mixed");
        assert_eq!(expanded.as_token(), Some(Tristate::True));

        let err = collect_for_state(AccessibleState::Hidden, &mut args).unwrap_err();
        assert_eq!(err, Error::MissingArgument { attribute: "hidden" });
    }

    #[test]
    fn test_collect_property_arguments() {
        let mut args = [
            AttributeArg::from("Volume"),
            AttributeArg::from(3),
            AttributeArg::from(0.75),
        ]
        .into_iter();

        let label = collect_for_property(AccessibleProperty::Label, &mut args).unwrap();
        let level = collect_for_property(AccessibleProperty::Level, &mut args).unwrap();
        let now = collect_for_property(AccessibleProperty::ValueNow, &mut args).unwrap();

        assert_eq!(label.as_str(), Some("Volume"));
        assert_eq!(level.as_integer(), Some(3));
        assert_eq!(now.as_number(), Some(0.75));
    }

    #[test]
    fn test_argument_kind_mismatch() {
        let err = collect_arg(AccessibleProperty::Level, AttributeArg::Number(1.0)).unwrap_err();
        assert_eq!(
            err,
            Error::ArgumentMismatch {
                attribute: "level",
                expected: CollectKind::Integer,
                got: CollectKind::Number,
            }
        );
    }

    #[test]
    fn test_invalid_raw_token() {
        let err = collect_arg(AccessibleProperty::Sort, AttributeArg::Token(17)).unwrap_err();
        assert!(matches!(err, Error::InvalidToken { attribute: "sort", .. }));
    }

    #[test]
    fn test_collect_boxed_values() {
        let hidden = collect_for_state_value(AccessibleState::Hidden, &true).unwrap();
        assert_eq!(hidden.as_boolean(), Some(true));

        let expanded = collect_for_state_value(AccessibleState::Expanded, &Some(false)).unwrap();
        assert_eq!(expanded.as_token(), Some(Tristate::False));

        let grabbed = collect_for_state_value(AccessibleState::Grabbed, &-1i32).unwrap();
        assert_eq!(grabbed.as_token(), Some(Tristate::Undefined));

        let pressed = collect_for_state_value(AccessibleState::Pressed, &PressedState::Mixed).unwrap();
        assert_eq!(pressed.kind(), ValueKind::Pressed);

        let min = collect_for_property_value(AccessibleProperty::ValueMin, &0.5f32).unwrap();
        assert_eq!(min.as_number(), Some(0.5));

        let text = String::from("42%");
        let value_text = collect_for_property_value(AccessibleProperty::ValueText, &text).unwrap();
        assert_eq!(value_text.as_str(), Some("42%"));

        let label = collect_for_property_value(AccessibleProperty::Label, &"Title").unwrap();
        assert_eq!(label.as_str(), Some("Title"));
    }

    #[test]
    fn test_collect_boxed_errors() {
        let err = collect_for_state_value(AccessibleState::Busy, &1i32).unwrap_err();
        assert!(matches!(err, Error::BoxedTypeMismatch { attribute: "busy", .. }));

        let err = collect_for_state_value(AccessibleState::Checked, &InvalidState::True).unwrap_err();
        assert!(matches!(err, Error::BoxedTypeMismatch { .. }));

        let err = collect_for_property_value(AccessibleProperty::Label, &None::<String>).unwrap_err();
        assert!(matches!(err, Error::NullValue { attribute: "label", .. }));

        let err =
            collect_for_property_value(AccessibleProperty::Owns, &None::<ObjectId>).unwrap_err();
        assert!(matches!(err, Error::NullValue { expected: CollectKind::Reference, .. }));

        let err = collect_for_property_value(AccessibleProperty::Sort, &9i32).unwrap_err();
        assert!(matches!(err, Error::InvalidToken { .. }));
    }

    #[test]
    fn test_boxed_matches_arguments() {
        let from_arg = collect_arg(AccessibleProperty::SetSize, AttributeArg::Integer(12)).unwrap();
        let from_boxed = collect_for_property_value(AccessibleProperty::SetSize, &12i32).unwrap();
        assert!(from_arg.equal(&from_boxed));

        let from_arg =
            collect_arg(AccessibleProperty::Autocomplete, AttributeArg::token(Autocomplete::List))
                .unwrap();
        let from_boxed =
            collect_for_property_value(AccessibleProperty::Autocomplete, &Autocomplete::List)
                .unwrap();
        assert!(from_arg.ptr_eq(&from_boxed));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(
            parse_for_state(AccessibleState::Disabled, "Yes").unwrap().as_boolean(),
            Some(true)
        );
        assert_eq!(
            parse_for_state(AccessibleState::Selected, "undefined").unwrap().as_token(),
            Some(Tristate::Undefined)
        );
        assert_eq!(
            parse_for_state(AccessibleState::Expanded, "0").unwrap().as_token(),
            Some(Tristate::False)
        );
        assert_eq!(
            parse_for_state(AccessibleState::Invalid, " spelling ").unwrap().as_token(),
            Some(InvalidState::Spelling)
        );
        assert_eq!(
            parse_for_property(AccessibleProperty::PosInSet, "4").unwrap().as_integer(),
            Some(4)
        );
        assert_eq!(
            parse_for_property(AccessibleProperty::ValueMax, "1e3").unwrap().as_number(),
            Some(1000.0)
        );
        assert_eq!(
            parse_for_property(AccessibleProperty::Label, " padded ").unwrap().as_str(),
            Some(" padded ")
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_for_state(AccessibleState::Busy, "maybe"),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_for_property(AccessibleProperty::Level, "99999999999"),
            Err(Error::InvalidRange { .. })
        ));
        assert!(matches!(
            parse_for_property(AccessibleProperty::Level, "two"),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_for_property(AccessibleProperty::ValueNow, "inf"),
            Err(Error::InvalidRange { .. })
        ));
        assert!(matches!(
            parse_for_property(AccessibleProperty::Orientation, "diagonal"),
            Err(Error::InvalidToken { .. })
        ));
        assert!(matches!(
            parse_for_property(AccessibleProperty::Controls, "button1"),
            Err(Error::InvalidValue { .. })
        ));
    }
}
