//! Error types for accessible value decoding.

use horizon_aria_core::ObjectError;

use crate::attribute::CollectKind;

/// Result type alias for accessible value operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported while constructing or decoding accessible values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An argument of the wrong kind was supplied for an attribute.
    #[error("Attribute '{attribute}' expects a {expected} argument, got {got}")]
    ArgumentMismatch {
        attribute: &'static str,
        expected: CollectKind,
        got: CollectKind,
    },

    /// The argument list ran out before the attribute's value.
    #[error("Missing argument for attribute '{attribute}'")]
    MissingArgument { attribute: &'static str },

    /// A boxed value holds a type the attribute cannot accept.
    #[error("Boxed value for attribute '{attribute}' does not hold a {expected}")]
    BoxedTypeMismatch {
        attribute: &'static str,
        expected: CollectKind,
    },

    /// A boxed optional value was empty where the attribute needs a value.
    #[error("Attribute '{attribute}' does not accept an empty {expected}")]
    NullValue {
        attribute: &'static str,
        expected: CollectKind,
    },

    /// A raw token or token name outside the attribute's vocabulary.
    #[error("Invalid token '{value}' for attribute '{attribute}'")]
    InvalidToken {
        attribute: &'static str,
        value: String,
    },

    /// Text that does not parse as the attribute's kind.
    #[error("Invalid value '{value}' for attribute '{attribute}'")]
    InvalidValue {
        attribute: &'static str,
        value: String,
    },

    /// A parsed value outside the representable range.
    #[error("Value '{value}' out of range for attribute '{attribute}'")]
    InvalidRange {
        attribute: &'static str,
        value: String,
    },

    /// The referenced object could not be linked.
    #[error("Cannot reference object: {0}")]
    Object(#[from] ObjectError),
}

impl Error {
    /// Create an invalid token error.
    pub fn invalid_token(attribute: &'static str, value: impl ToString) -> Self {
        Self::InvalidToken {
            attribute,
            value: value.to_string(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(attribute: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            attribute,
            value: value.into(),
        }
    }

    /// Create an out-of-range error.
    pub fn invalid_range(attribute: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidRange {
            attribute,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::ArgumentMismatch {
            attribute: "label",
            expected: CollectKind::String,
            got: CollectKind::Integer,
        };
        assert_eq!(
            err.to_string(),
            "Attribute 'label' expects a string argument, got integer"
        );

        let err = Error::invalid_token("sort", 9);
        assert_eq!(err.to_string(), "Invalid token '9' for attribute 'sort'");
    }

    #[test]
    fn test_object_error_converts() {
        let err: Error = ObjectError::InvalidObjectId.into();
        assert!(matches!(err, Error::Object(ObjectError::InvalidObjectId)));
        assert!(err.to_string().contains("destroyed"));
    }
}
