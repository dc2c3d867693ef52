//! Value kind descriptors.

use std::fmt;
use std::mem::size_of;

use super::token::{
    Autocomplete, CheckedState, InvalidState, Orientation, PressedState, Sort, Tristate,
};
use super::{ReferenceLink, StringPayload};

/// The kind of payload an [`AccessibleValue`](super::AccessibleValue) holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Tristate,
    Checked,
    Invalid,
    Pressed,
    Autocomplete,
    Orientation,
    Sort,
    Integer,
    Number,
    String,
    Reference,
}

/// Static description of a value kind.
#[derive(Debug, PartialEq, Eq)]
pub struct ValueKindInfo {
    /// Printable kind name.
    pub name: &'static str,
    /// Size of the kind's payload in bytes.
    pub instance_size: usize,
    /// Whether releasing the last handle runs kind-specific cleanup.
    pub has_finalizer: bool,
    /// Whether values of this kind are hard-coded process-lifetime instances.
    pub is_static: bool,
}

const fn info(
    name: &'static str,
    instance_size: usize,
    has_finalizer: bool,
    is_static: bool,
) -> ValueKindInfo {
    ValueKindInfo {
        name,
        instance_size,
        has_finalizer,
        is_static,
    }
}

static KIND_INFO: [ValueKindInfo; ValueKind::ALL.len()] = [
    info("boolean", size_of::<bool>(), false, true),
    info("tristate", size_of::<Tristate>(), false, true),
    info("checked", size_of::<CheckedState>(), false, true),
    info("invalid", size_of::<InvalidState>(), false, true),
    info("pressed", size_of::<PressedState>(), false, true),
    info("autocomplete", size_of::<Autocomplete>(), false, true),
    info("orientation", size_of::<Orientation>(), false, true),
    info("sort", size_of::<Sort>(), false, true),
    info("integer", size_of::<i32>(), false, false),
    info("number", size_of::<f64>(), false, false),
    info("string", size_of::<StringPayload>(), true, false),
    info("reference", size_of::<ReferenceLink>(), true, false),
];

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [ValueKind; 12] = [
        ValueKind::Boolean,
        ValueKind::Tristate,
        ValueKind::Checked,
        ValueKind::Invalid,
        ValueKind::Pressed,
        ValueKind::Autocomplete,
        ValueKind::Orientation,
        ValueKind::Sort,
        ValueKind::Integer,
        ValueKind::Number,
        ValueKind::String,
        ValueKind::Reference,
    ];

    /// The static descriptor of this kind.
    pub fn info(self) -> &'static ValueKindInfo {
        &KIND_INFO[self as usize]
    }

    /// Printable kind name.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Whether values of this kind never allocate.
    pub fn is_static(self) -> bool {
        self.info().is_static
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_table_matches_kinds() {
        for (index, kind) in ValueKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
            assert!(!kind.name().is_empty());
        }
        assert_eq!(ValueKind::Reference.name(), "reference");
    }

    #[test]
    fn test_static_split() {
        assert!(ValueKind::Boolean.is_static());
        assert!(ValueKind::Sort.is_static());
        assert!(!ValueKind::Integer.is_static());
        assert!(!ValueKind::Reference.is_static());
        assert!(ValueKind::String.info().has_finalizer);
        assert!(!ValueKind::Number.info().has_finalizer);
    }
}
