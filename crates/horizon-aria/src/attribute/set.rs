//! Per-widget storage of accessible attribute values.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use horizon_aria_core::ThreadAffinity;
use horizon_aria_core::logging::targets;

use super::collect::{collect_arg, collect_boxed};
use super::{AccessibleProperty, AccessibleState, Attribute, AttributeArg};
use crate::error::Result;
use crate::value::AccessibleValue;

/// A dense map from the attributes of one family to their explicit values.
///
/// Unset attributes fall back to the family's defaults through
/// [`value_or_default`](Self::value_or_default). Mutation is checked against
/// the thread that created the set.
///
/// # Example
///
/// ```
/// use horizon_aria::{AccessibleStates, AccessibleState, AccessibleValue, CheckedState};
///
/// let mut states = AccessibleStates::new();
/// assert!(states.add(AccessibleState::Busy, AccessibleValue::boolean(true)));
/// assert!(!states.add(AccessibleState::Busy, AccessibleValue::boolean(true)));
///
/// states.add(AccessibleState::Checked, AccessibleValue::token(CheckedState::Mixed));
/// assert_eq!(states.to_string(), "busy: true, checked: mixed");
///
/// let hidden = states.value_or_default(AccessibleState::Hidden).unwrap();
/// assert_eq!(hidden.as_boolean(), Some(false));
/// ```
pub struct AccessibleAttributeSet<A: Attribute> {
    values: Vec<Option<AccessibleValue>>,
    affinity: ThreadAffinity,
    _family: PhantomData<A>,
}

/// Explicit accessible states of a widget.
pub type AccessibleStates = AccessibleAttributeSet<AccessibleState>;

/// Explicit accessible properties of a widget.
pub type AccessibleProperties = AccessibleAttributeSet<AccessibleProperty>;

impl<A: Attribute> AccessibleAttributeSet<A> {
    /// Create an empty set bound to the current thread.
    pub fn new() -> Self {
        Self {
            values: vec![None; A::COUNT],
            affinity: ThreadAffinity::current(),
            _family: PhantomData,
        }
    }

    /// Store `value` for `attribute`.
    ///
    /// Returns `true` if the stored value changed, that is, if the attribute
    /// was unset or held a value not [`equal`](AccessibleValue::equal) to
    /// `value`.
    pub fn add(&mut self, attribute: A, value: AccessibleValue) -> bool {
        self.affinity.check("AccessibleAttributeSet::add");

        let slot = &mut self.values[attribute.index()];
        if slot.as_ref().is_some_and(|current| current.equal(&value)) {
            return false;
        }

        tracing::debug!(
            target: targets::ATTRIBUTES,
            attribute = attribute.name(),
            %value,
            "attribute changed"
        );
        *slot = Some(value);
        true
    }

    /// Clear the explicit value of `attribute`. Returns `true` if one was set.
    pub fn remove(&mut self, attribute: A) -> bool {
        self.affinity.check("AccessibleAttributeSet::remove");

        let removed = self.values[attribute.index()].take().is_some();
        if removed {
            tracing::debug!(
                target: targets::ATTRIBUTES,
                attribute = attribute.name(),
                "attribute removed"
            );
        }
        removed
    }

    /// Decode `arg` for `attribute` and store it.
    ///
    /// Returns whether the stored value changed. On a decoding error the set
    /// is left untouched.
    pub fn update(&mut self, attribute: A, arg: AttributeArg<'_>) -> Result<bool> {
        let value = collect_arg(attribute, arg)?;
        Ok(self.add(attribute, value))
    }

    /// Decode a boxed value for `attribute` and store it.
    pub fn update_from_boxed(&mut self, attribute: A, boxed: &dyn Any) -> Result<bool> {
        let value = collect_boxed(attribute, boxed)?;
        Ok(self.add(attribute, value))
    }

    /// Clear every explicit value.
    pub fn clear(&mut self) {
        self.affinity.check("AccessibleAttributeSet::clear");
        self.values.iter_mut().for_each(|slot| *slot = None);
    }

    /// Whether `attribute` has an explicit value.
    pub fn contains(&self, attribute: A) -> bool {
        self.values[attribute.index()].is_some()
    }

    /// The explicit value of `attribute`.
    pub fn get(&self, attribute: A) -> Option<&AccessibleValue> {
        self.values[attribute.index()].as_ref()
    }

    /// The explicit value of `attribute`, or its default.
    pub fn value_or_default(&self, attribute: A) -> Option<AccessibleValue> {
        self.get(attribute)
            .cloned()
            .or_else(|| attribute.default_value())
    }

    /// Number of attributes with explicit values.
    pub fn len(&self) -> usize {
        self.values.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether no attribute has an explicit value.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Explicitly set attributes and their values, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (A, &AccessibleValue)> + '_ {
        A::all()
            .zip(self.values.iter())
            .filter_map(|(attribute, slot)| slot.as_ref().map(|value| (attribute, value)))
    }

    /// Append `name: value` pairs for the explicit values to `buffer`.
    pub fn print(&self, buffer: &mut String) {
        for (i, (attribute, value)) in self.iter().enumerate() {
            if i > 0 {
                buffer.push_str(", ");
            }
            buffer.push_str(attribute.name());
            buffer.push_str(": ");
            value.print(buffer);
        }
    }
}

impl<A: Attribute> Default for AccessibleAttributeSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Attribute> Clone for AccessibleAttributeSet<A> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            affinity: ThreadAffinity::current(),
            _family: PhantomData,
        }
    }
}

impl<A: Attribute> fmt::Display for AccessibleAttributeSet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = String::new();
        self.print(&mut buffer);
        f.write_str(&buffer)
    }
}

impl<A: Attribute> fmt::Debug for AccessibleAttributeSet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(attribute, value)| (attribute.name(), value)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::value::{CheckedState, Sort, Tristate};

    #[test]
    fn test_add_reports_changes() {
        let mut states = AccessibleStates::new();
        assert!(states.is_empty());

        assert!(states.add(AccessibleState::Busy, AccessibleValue::boolean(true)));
        assert!(!states.add(AccessibleState::Busy, AccessibleValue::boolean(true)));
        assert!(states.add(AccessibleState::Busy, AccessibleValue::boolean(false)));
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn test_number_within_tolerance_is_unchanged() {
        let mut properties = AccessibleProperties::new();
        assert!(properties.add(AccessibleProperty::ValueNow, AccessibleValue::number(0.5)));
        assert!(!properties.add(AccessibleProperty::ValueNow, AccessibleValue::number(0.5004)));
        assert!(properties.add(AccessibleProperty::ValueNow, AccessibleValue::number(0.6)));
    }

    #[test]
    fn test_remove_and_defaults() {
        let mut states = AccessibleStates::new();
        states.add(AccessibleState::Expanded, AccessibleValue::tristate(Tristate::True));
        assert!(states.contains(AccessibleState::Expanded));

        assert!(states.remove(AccessibleState::Expanded));
        assert!(!states.remove(AccessibleState::Expanded));
        assert!(states.get(AccessibleState::Expanded).is_none());

        let fallback = states.value_or_default(AccessibleState::Expanded).unwrap();
        assert_eq!(fallback.as_token(), Some(Tristate::Undefined));
    }

    #[test]
    fn test_property_without_default() {
        let properties = AccessibleProperties::new();
        assert!(properties.value_or_default(AccessibleProperty::LabelledBy).is_none());
        assert_eq!(
            properties
                .value_or_default(AccessibleProperty::Label)
                .and_then(|value| value.as_str().map(str::len)),
            Some(0)
        );
    }

    #[test]
    fn test_update_from_arguments() {
        let mut properties = AccessibleProperties::new();
        assert!(properties.update(AccessibleProperty::Label, "Zoom".into()).unwrap());
        assert!(properties.update(AccessibleProperty::Sort, AttributeArg::token(Sort::Descending)).unwrap());

        let err = properties
            .update(AccessibleProperty::Level, AttributeArg::Boolean(true))
            .unwrap_err();
        assert!(matches!(err, Error::ArgumentMismatch { .. }));
        assert!(!properties.contains(AccessibleProperty::Level));

        assert!(properties.update_from_boxed(AccessibleProperty::Level, &2i32).unwrap());
        assert!(!properties.update_from_boxed(AccessibleProperty::Level, &2i32).unwrap());
    }

    #[test]
    fn test_iteration_follows_table_order() {
        let mut states = AccessibleStates::new();
        states.add(AccessibleState::Selected, AccessibleValue::tristate(Tristate::False));
        states.add(AccessibleState::Busy, AccessibleValue::boolean(true));
        states.add(AccessibleState::Checked, AccessibleValue::token(CheckedState::True));

        let names: Vec<_> = states.iter().map(|(state, _)| state.name()).collect();
        assert_eq!(names, ["busy", "checked", "selected"]);
        assert_eq!(states.to_string(), "busy: true, checked: true, selected: false");

        states.clear();
        assert!(states.is_empty());
        assert_eq!(states.to_string(), "");
    }

    #[test]
    fn test_clone_shares_values() {
        let mut properties = AccessibleProperties::new();
        properties.add(AccessibleProperty::ValueText, AccessibleValue::string("half"));

        let copy = properties.clone();
        let original = properties.get(AccessibleProperty::ValueText).unwrap();
        let cloned = copy.get(AccessibleProperty::ValueText).unwrap();
        assert!(original.ptr_eq(cloned));
        assert_eq!(original.ref_count(), Some(2));
    }

    #[test]
    fn test_mutation_from_other_thread_panics() {
        horizon_aria_core::set_thread_checks_enabled(true);
        let states = std::sync::Arc::new(parking_lot::Mutex::new(AccessibleStates::new()));
        let shared = states.clone();

        let result = std::thread::spawn(move || {
            shared.lock().add(AccessibleState::Hidden, AccessibleValue::boolean(true));
        })
        .join();

        assert!(result.is_err());
    }
}
