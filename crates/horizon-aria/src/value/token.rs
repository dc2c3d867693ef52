//! Enumerated token vocabularies.
//!
//! Each vocabulary maps a fixed set of tokens to stable raw integers and
//! printable names. Token values are hard-coded: every token has exactly one
//! process-lifetime [`AccessibleValue`] instance.

use std::fmt;

use super::{AccessibleValue, ValueData, ValueKind};

/// A closed vocabulary of accessible tokens.
pub trait AccessibleToken:
    Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// The value kind carrying tokens of this vocabulary.
    const KIND: ValueKind;

    /// The stable raw integer of this token.
    fn to_raw(self) -> i32;

    /// The token for a raw integer, if it belongs to the vocabulary.
    fn from_raw(raw: i32) -> Option<Self>;

    /// The printable name of this token.
    fn token(self) -> &'static str;

    /// The token with the given printable name.
    fn from_token(token: &str) -> Option<Self>;

    /// The hard-coded value instance for this token.
    fn to_value(self) -> AccessibleValue;

    /// The token held by `value`, if it is of this vocabulary.
    fn from_value(value: &AccessibleValue) -> Option<Self>;
}

macro_rules! accessible_token {
    (
        $(#[$meta:meta])*
        pub enum $name:ident => $kind:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $raw:literal => $token:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Every token of the vocabulary, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];
        }

        impl AccessibleToken for $name {
            const KIND: ValueKind = ValueKind::$kind;

            fn to_raw(self) -> i32 {
                match self {
                    $($name::$variant => $raw,)+
                }
            }

            fn from_raw(raw: i32) -> Option<Self> {
                match raw {
                    $($raw => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn token(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }

            fn from_token(token: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|candidate| candidate.token() == token)
            }

            fn to_value(self) -> AccessibleValue {
                static INSTANCES: [ValueData; $name::ALL.len()] =
                    [$(ValueData::$kind($name::$variant),)+];
                AccessibleValue::from_static(&INSTANCES[self as usize])
            }

            fn from_value(value: &AccessibleValue) -> Option<Self> {
                match value.data() {
                    ValueData::$kind(token) => Some(*token),
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

accessible_token! {
    /// A boolean that may also be left undefined.
    ///
    /// Used by the `expanded`, `grabbed` and `selected` states.
    pub enum Tristate => Tristate {
        False = 0 => "false",
        True = 1 => "true",
        Undefined = -1 => "undefined",
    }
}

accessible_token! {
    /// The `checked` state of check boxes and toggles.
    pub enum CheckedState => Checked {
        False = 0 => "false",
        True = 1 => "true",
        /// Partially checked, as for a group whose children disagree.
        Mixed = 2 => "mixed",
        Undefined = -1 => "undefined",
    }
}

accessible_token! {
    /// The `pressed` state of toggle buttons.
    pub enum PressedState => Pressed {
        False = 0 => "false",
        True = 1 => "true",
        Mixed = 2 => "mixed",
        Undefined = -1 => "undefined",
    }
}

accessible_token! {
    /// The `invalid` state of input widgets.
    pub enum InvalidState => Invalid {
        False = 0 => "false",
        True = 1 => "true",
        /// A grammatical error was detected.
        Grammar = 2 => "grammar",
        /// A spelling error was detected.
        Spelling = 3 => "spelling",
    }
}

accessible_token! {
    /// How text input offers completions.
    pub enum Autocomplete => Autocomplete {
        None = 0 => "none",
        /// The completion is inserted inline after the caret.
        Inline = 1 => "inline",
        /// Candidates are shown in a popup list.
        List = 2 => "list",
        Both = 3 => "both",
    }
}

accessible_token! {
    /// Layout orientation of sliders, scroll bars and separators.
    pub enum Orientation => Orientation {
        Horizontal = 0 => "horizontal",
        Vertical = 1 => "vertical",
    }
}

accessible_token! {
    /// Sort direction of a table column header.
    pub enum Sort => Sort {
        None = 0 => "none",
        Ascending = 1 => "ascending",
        Descending = 2 => "descending",
        Other = 3 => "other",
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value { Tristate::True } else { Tristate::False }
    }
}

impl From<Option<bool>> for Tristate {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Tristate::Undefined, Tristate::from)
    }
}

impl From<Tristate> for Option<bool> {
    fn from(value: Tristate) -> Self {
        match value {
            Tristate::False => Some(false),
            Tristate::True => Some(true),
            Tristate::Undefined => None,
        }
    }
}
