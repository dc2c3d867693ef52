//! Accessible states and properties.
//!
//! Every attribute has a row in a dense, statically checked table that names
//! it and records the constructor used to build its values. Functions such as
//! [`collect_for_state`] decode caller input through these rows and
//! [`AccessibleAttributeSet`] stores the results.

mod collect;
mod set;

use std::any::Any;
use std::fmt;

use horizon_aria_core::ObjectId;
use static_assertions::const_assert_eq;

use crate::error::Result;
use crate::value::{
    AccessibleToken, AccessibleValue, Autocomplete, CheckedState, InvalidState, Orientation,
    PressedState, Sort, Tristate, ValueKind,
};

pub use collect::{
    AttributeArg, collect_for_property, collect_for_property_value, collect_for_state,
    collect_for_state_value, default_for_property, default_for_state, parse_for_property,
    parse_for_state,
};
pub use set::{AccessibleAttributeSet, AccessibleProperties, AccessibleStates};

// =============================================================================
// Collect kinds and constructors
// =============================================================================

/// The argument shape an attribute consumes when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectKind {
    Boolean,
    Integer,
    Tristate,
    Token,
    Number,
    String,
    Reference,
}

impl CollectKind {
    /// Printable name of the argument shape.
    pub fn name(self) -> &'static str {
        match self {
            CollectKind::Boolean => "boolean",
            CollectKind::Integer => "integer",
            CollectKind::Tristate => "tristate",
            CollectKind::Token => "token",
            CollectKind::Number => "number",
            CollectKind::String => "string",
            CollectKind::Reference => "reference",
        }
    }
}

impl fmt::Display for CollectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Constructors for one token vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct TokenConstructor {
    /// The kind of the constructed values.
    pub kind: ValueKind,
    /// Build a value from a raw token integer.
    pub from_raw: fn(i32) -> Option<AccessibleValue>,
    /// Build a value from a token name.
    pub from_token: fn(&str) -> Option<AccessibleValue>,
    /// Extract a raw token integer from a boxed vocabulary value.
    pub from_boxed: fn(&dyn Any) -> Option<i32>,
}

fn token_from_raw<T: AccessibleToken>(raw: i32) -> Option<AccessibleValue> {
    T::from_raw(raw).map(T::to_value)
}

fn token_from_name<T: AccessibleToken>(token: &str) -> Option<AccessibleValue> {
    T::from_token(token).map(T::to_value)
}

fn token_from_boxed<T: AccessibleToken>(boxed: &dyn Any) -> Option<i32> {
    boxed
        .downcast_ref::<T>()
        .map(|token| token.to_raw())
        .or_else(|| boxed.downcast_ref::<i32>().copied())
}

impl TokenConstructor {
    /// The constructors for vocabulary `T`.
    pub const fn of<T: AccessibleToken>() -> Self {
        Self {
            kind: T::KIND,
            from_raw: token_from_raw::<T>,
            from_token: token_from_name::<T>,
            from_boxed: token_from_boxed::<T>,
        }
    }
}

/// How an attribute builds its values.
#[derive(Debug, Clone, Copy)]
pub enum Constructor {
    Boolean(fn(bool) -> AccessibleValue),
    Integer(fn(i32) -> AccessibleValue),
    Tristate(fn(Tristate) -> AccessibleValue),
    Token(TokenConstructor),
    Number(fn(f64) -> AccessibleValue),
    String(fn(&str) -> AccessibleValue),
    Reference(fn(ObjectId) -> Result<AccessibleValue>),
}

impl Constructor {
    /// The argument shape this constructor consumes.
    pub const fn collect_kind(&self) -> CollectKind {
        match self {
            Constructor::Boolean(_) => CollectKind::Boolean,
            Constructor::Integer(_) => CollectKind::Integer,
            Constructor::Tristate(_) => CollectKind::Tristate,
            Constructor::Token(_) => CollectKind::Token,
            Constructor::Number(_) => CollectKind::Number,
            Constructor::String(_) => CollectKind::String,
            Constructor::Reference(_) => CollectKind::Reference,
        }
    }

    /// The kind of the constructed values.
    pub const fn value_kind(&self) -> ValueKind {
        match self {
            Constructor::Boolean(_) => ValueKind::Boolean,
            Constructor::Integer(_) => ValueKind::Integer,
            Constructor::Tristate(_) => ValueKind::Tristate,
            Constructor::Token(token) => token.kind,
            Constructor::Number(_) => ValueKind::Number,
            Constructor::String(_) => ValueKind::String,
            Constructor::Reference(_) => ValueKind::Reference,
        }
    }
}

const BOOLEAN: Constructor = Constructor::Boolean(AccessibleValue::boolean);
const INTEGER: Constructor = Constructor::Integer(AccessibleValue::integer);
const TRISTATE: Constructor = Constructor::Tristate(AccessibleValue::tristate);
const NUMBER: Constructor = Constructor::Number(AccessibleValue::number);
const STRING: Constructor = Constructor::String(AccessibleValue::string);
const REFERENCE: Constructor = Constructor::Reference(AccessibleValue::reference_to);

const fn token<T: AccessibleToken>() -> Constructor {
    Constructor::Token(TokenConstructor::of::<T>())
}

// =============================================================================
// Attribute tables
// =============================================================================

/// One row of an attribute table.
#[derive(Debug, Clone, Copy)]
pub struct AttributeInfo<A> {
    /// The attribute this row describes.
    pub id: A,
    /// Printable attribute name.
    pub name: &'static str,
    /// How values of this attribute are built.
    pub constructor: Constructor,
}

impl<A> AttributeInfo<A> {
    const fn new(id: A, name: &'static str, constructor: Constructor) -> Self {
        Self {
            id,
            name,
            constructor,
        }
    }

    /// The argument shape this attribute consumes.
    pub const fn collect_kind(&self) -> CollectKind {
        self.constructor.collect_kind()
    }
}

/// A closed family of accessible attributes backed by a dense table.
pub trait Attribute: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Number of attributes in the family.
    const COUNT: usize;

    /// The attribute table, indexed by [`Attribute::index`].
    const TABLE: &'static [AttributeInfo<Self>];

    /// Position of this attribute in [`Attribute::TABLE`].
    fn index(self) -> usize;

    /// The value used when the attribute has not been set.
    fn default_value(self) -> Option<AccessibleValue>;

    /// This attribute's table row.
    fn info(self) -> &'static AttributeInfo<Self> {
        &Self::TABLE[self.index()]
    }

    /// Printable attribute name.
    fn name(self) -> &'static str {
        self.info().name
    }

    /// The argument shape this attribute consumes.
    fn collect_kind(self) -> CollectKind {
        self.info().collect_kind()
    }

    /// Every attribute of the family, in table order.
    fn all() -> impl Iterator<Item = Self> {
        Self::TABLE.iter().map(|info| info.id)
    }

    /// Look up an attribute by its printable name.
    fn from_name(name: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.id)
    }
}

/// Accessible states: dynamic, frequently changing conditions of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessibleState {
    Busy,
    Checked,
    Disabled,
    Expanded,
    Grabbed,
    Hidden,
    Invalid,
    Pressed,
    Selected,
}

impl AccessibleState {
    /// Number of states.
    pub const COUNT: usize = 9;
}

const_assert_eq!(AccessibleState::Selected as usize + 1, AccessibleState::COUNT);

const STATE_TABLE: [AttributeInfo<AccessibleState>; AccessibleState::COUNT] = [
    AttributeInfo::new(AccessibleState::Busy, "busy", BOOLEAN),
    AttributeInfo::new(AccessibleState::Checked, "checked", token::<CheckedState>()),
    AttributeInfo::new(AccessibleState::Disabled, "disabled", BOOLEAN),
    AttributeInfo::new(AccessibleState::Expanded, "expanded", TRISTATE),
    AttributeInfo::new(AccessibleState::Grabbed, "grabbed", TRISTATE),
    AttributeInfo::new(AccessibleState::Hidden, "hidden", BOOLEAN),
    AttributeInfo::new(AccessibleState::Invalid, "invalid", token::<InvalidState>()),
    AttributeInfo::new(AccessibleState::Pressed, "pressed", token::<PressedState>()),
    AttributeInfo::new(AccessibleState::Selected, "selected", TRISTATE),
];

impl Attribute for AccessibleState {
    const COUNT: usize = AccessibleState::COUNT;
    const TABLE: &'static [AttributeInfo<Self>] = &STATE_TABLE;

    fn index(self) -> usize {
        self as usize
    }

    fn default_value(self) -> Option<AccessibleValue> {
        Some(default_for_state(self))
    }
}

/// Accessible properties: mostly static characteristics and relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessibleProperty {
    ActiveDescendant,
    Autocomplete,
    Controls,
    DescribedBy,
    FlowTo,
    HasPopup,
    Label,
    LabelledBy,
    Level,
    MultiLine,
    MultiSelectable,
    Orientation,
    Owns,
    PosInSet,
    ReadOnly,
    Relevant,
    Required,
    SetSize,
    Sort,
    ValueMax,
    ValueMin,
    ValueNow,
    ValueText,
}

impl AccessibleProperty {
    /// Number of properties.
    pub const COUNT: usize = 23;
}

const_assert_eq!(AccessibleProperty::ValueText as usize + 1, AccessibleProperty::COUNT);

const PROPERTY_TABLE: [AttributeInfo<AccessibleProperty>; AccessibleProperty::COUNT] = [
    AttributeInfo::new(AccessibleProperty::ActiveDescendant, "activedescendant", REFERENCE),
    AttributeInfo::new(AccessibleProperty::Autocomplete, "autocomplete", token::<Autocomplete>()),
    AttributeInfo::new(AccessibleProperty::Controls, "controls", REFERENCE),
    AttributeInfo::new(AccessibleProperty::DescribedBy, "describedby", REFERENCE),
    AttributeInfo::new(AccessibleProperty::FlowTo, "flowto", REFERENCE),
    AttributeInfo::new(AccessibleProperty::HasPopup, "haspopup", BOOLEAN),
    AttributeInfo::new(AccessibleProperty::Label, "label", STRING),
    AttributeInfo::new(AccessibleProperty::LabelledBy, "labelledby", REFERENCE),
    AttributeInfo::new(AccessibleProperty::Level, "level", INTEGER),
    AttributeInfo::new(AccessibleProperty::MultiLine, "multiline", BOOLEAN),
    AttributeInfo::new(AccessibleProperty::MultiSelectable, "multiselectable", BOOLEAN),
    AttributeInfo::new(AccessibleProperty::Orientation, "orientation", token::<Orientation>()),
    AttributeInfo::new(AccessibleProperty::Owns, "owns", REFERENCE),
    AttributeInfo::new(AccessibleProperty::PosInSet, "posinset", INTEGER),
    AttributeInfo::new(AccessibleProperty::ReadOnly, "readonly", BOOLEAN),
    AttributeInfo::new(AccessibleProperty::Relevant, "relevant", STRING),
    AttributeInfo::new(AccessibleProperty::Required, "required", BOOLEAN),
    AttributeInfo::new(AccessibleProperty::SetSize, "setsize", INTEGER),
    AttributeInfo::new(AccessibleProperty::Sort, "sort", token::<Sort>()),
    AttributeInfo::new(AccessibleProperty::ValueMax, "valuemax", NUMBER),
    AttributeInfo::new(AccessibleProperty::ValueMin, "valuemin", NUMBER),
    AttributeInfo::new(AccessibleProperty::ValueNow, "valuenow", NUMBER),
    AttributeInfo::new(AccessibleProperty::ValueText, "valuetext", STRING),
];

impl Attribute for AccessibleProperty {
    const COUNT: usize = AccessibleProperty::COUNT;
    const TABLE: &'static [AttributeInfo<Self>] = &PROPERTY_TABLE;

    fn index(self) -> usize {
        self as usize
    }

    fn default_value(self) -> Option<AccessibleValue> {
        default_for_property(self)
    }
}

// Each table row must sit at its attribute's index.
const _: () = {
    let mut i = 0;
    while i < STATE_TABLE.len() {
        assert!(STATE_TABLE[i].id as usize == i, "state table out of order");
        i += 1;
    }
    let mut i = 0;
    while i < PROPERTY_TABLE.len() {
        assert!(PROPERTY_TABLE[i].id as usize == i, "property table out of order");
        i += 1;
    }
};
