//! The accessible object trait.

use horizon_aria_core::Object;

use crate::error::Result;
use crate::value::AccessibleValue;

/// An object that assistive technologies can address.
///
/// Accessible objects are the targets of reference values such as
/// `labelled-by` or `active-descendant`. Implementors only need to provide
/// the [`Object`] identity; the registry tracks their lifetime.
///
/// # Example
///
/// ```
/// use horizon_aria::{Accessible, AccessibleValue};
/// use horizon_aria_core::{Object, ObjectBase, ObjectId, init_global_registry};
///
/// init_global_registry();
///
/// struct Label {
///     base: ObjectBase,
///     text: String,
/// }
///
/// impl Object for Label {
///     fn object_id(&self) -> ObjectId {
///         self.base.id()
///     }
/// }
///
/// impl Accessible for Label {
///     fn accessible_name(&self) -> Option<String> {
///         Some(self.text.clone())
///     }
/// }
///
/// let label = Label { base: ObjectBase::new::<Label>(), text: "Name".into() };
/// let labelled_by = label.to_reference_value().unwrap();
/// assert_eq!(labelled_by.as_reference(), Some(label.object_id()));
///
/// drop(label);
/// assert_eq!(labelled_by.as_reference(), None);
/// assert_eq!(labelled_by.to_string(), "<null>");
/// ```
pub trait Accessible: Object {
    /// The name announced for this object, if any.
    fn accessible_name(&self) -> Option<String> {
        None
    }

    /// A longer description of this object, if any.
    fn accessible_description(&self) -> Option<String> {
        None
    }

    /// A weak reference value pointing at this object.
    fn to_reference_value(&self) -> Result<AccessibleValue> {
        AccessibleValue::reference_to(self.object_id())
    }
}
