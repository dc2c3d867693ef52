//! WAI-ARIA state and property values for Horizon Aria.
//!
//! This crate provides the value layer that widgets use to describe
//! themselves to assistive technologies:
//!
//! - **Values**: Reference-counted [`AccessibleValue`] containers with
//!   kind-specific equality and printing
//! - **Tokens**: Closed vocabularies such as [`CheckedState`] and [`Sort`]
//!   backed by hard-coded instances
//! - **References**: Weak links to other [`Accessible`] objects that clear
//!   themselves when the target is destroyed
//! - **Attributes**: Static tables for [`AccessibleState`] and
//!   [`AccessibleProperty`] with defaults and typed decoding
//!
//! # Example
//!
//! ```
//! use horizon_aria::prelude::*;
//!
//! let mut properties = AccessibleProperties::new();
//! properties.update(AccessibleProperty::Label, "Volume".into()).unwrap();
//! properties.update(AccessibleProperty::ValueNow, 0.5.into()).unwrap();
//!
//! let orientation = properties.value_or_default(AccessibleProperty::Orientation).unwrap();
//! assert_eq!(orientation.as_token(), Some(Orientation::Horizontal));
//! assert_eq!(properties.to_string(), "label: Volume, valuenow: 0.5");
//! ```

pub mod accessible;
pub mod attribute;
pub mod value;

mod error;

pub use accessible::Accessible;
pub use attribute::{
    AccessibleAttributeSet, AccessibleProperties, AccessibleProperty, AccessibleState,
    AccessibleStates, Attribute, AttributeArg, AttributeInfo, CollectKind, Constructor,
    TokenConstructor, collect_for_property, collect_for_property_value, collect_for_state,
    collect_for_state_value, default_for_property, default_for_state, parse_for_property,
    parse_for_state,
};
pub use error::{Error, Result};
pub use value::{
    AccessibleToken, AccessibleValue, Autocomplete, CheckedState, InvalidState,
    NUMBER_TOLERANCE, Orientation, PressedState, Sort, Tristate, ValueKind, ValueKindInfo,
    values_equal,
};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::accessible::Accessible;
    pub use crate::attribute::{
        AccessibleProperties, AccessibleProperty, AccessibleState, AccessibleStates, Attribute,
        AttributeArg,
    };
    pub use crate::value::{
        AccessibleToken, AccessibleValue, Autocomplete, CheckedState, InvalidState, Orientation,
        PressedState, Sort, Tristate, ValueKind,
    };
    pub use crate::{Error, Result};
}
