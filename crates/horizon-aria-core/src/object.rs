//! Object model for Horizon Aria.
//!
//! Provides the minimal object system accessible values rely on:
//! - Unique, versioned object identifiers via arena-based storage
//! - Object naming and type names for diagnostics
//! - Weak references with synchronous destroy notification
//!
//! # Key Types
//!
//! - [`Object`] - Base trait that all objects implement
//! - [`ObjectBase`] - Helper struct for implementing [`Object`]
//! - [`ObjectId`] - Unique stable identifier for each object
//! - [`ObjectRegistry`] - Central registry managing all objects
//! - [`SharedObjectRegistry`] - Thread-safe wrapper around [`ObjectRegistry`]
//!
//! # Weak References
//!
//! A weak reference does not keep its object alive. Holders register a
//! [`WeakNotify`] callback with [`SharedObjectRegistry::add_weak_ref`]; when
//! the object is destroyed the callback runs exactly once, on the destroying
//! thread, after the registry lock has been released. A holder that goes away
//! first unregisters with [`SharedObjectRegistry::remove_weak_ref`].
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use horizon_aria_core::{Object, ObjectBase, ObjectId, init_global_registry, global_registry};
//!
//! init_global_registry();
//!
//! struct Label {
//!     base: ObjectBase,
//! }
//!
//! impl Object for Label {
//!     fn object_id(&self) -> ObjectId {
//!         self.base.id()
//!     }
//! }
//!
//! let label = Label { base: ObjectBase::new::<Label>() };
//! let cleared = Arc::new(AtomicBool::new(false));
//! let flag = Arc::clone(&cleared);
//!
//! global_registry()
//!     .unwrap()
//!     .add_weak_ref(label.object_id(), Box::new(move |_| flag.store(true, Ordering::SeqCst)))
//!     .unwrap();
//!
//! drop(label);
//! assert!(cleared.load(Ordering::SeqCst));
//! ```

use std::fmt;
use std::sync::OnceLock;

use parking_lot::RwLock;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for an object in the registry.
    ///
    /// `ObjectId`s are versioned: once an object is destroyed its id never
    /// refers to another object, even if the storage slot is reused.
    pub struct ObjectId;

    /// Identifies one weak reference registered on an object.
    pub struct WeakRefId;
}

impl ObjectId {
    /// Convert the ObjectId to a raw u64 value.
    ///
    /// The raw value can be converted back using [`ObjectId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create an ObjectId from a raw u64 value.
    ///
    /// This does not check if the ObjectId exists in the registry.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Callback invoked when a weakly referenced object is destroyed.
///
/// Receives the id of the object that went away.
pub type WeakNotify = Box<dyn FnOnce(ObjectId) + Send + Sync>;

/// Errors that can occur during object operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The object ID is invalid or has been destroyed.
    InvalidObjectId,
    /// The weak reference ID is unknown for this object.
    InvalidWeakRef,
    /// The object registry is not initialized.
    RegistryNotInitialized,
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjectId => write!(f, "Invalid or destroyed object ID"),
            Self::InvalidWeakRef => write!(f, "Unknown weak reference for object"),
            Self::RegistryNotInitialized => write!(f, "Object registry not initialized"),
        }
    }
}

impl std::error::Error for ObjectError {}

/// Result type for object operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// Internal data stored in the registry for each object.
struct ObjectData {
    /// Human-readable name for debugging.
    name: String,
    /// The type name for debugging.
    type_name: &'static str,
    /// Pending destroy notifications.
    weak_refs: SlotMap<WeakRefId, WeakNotify>,
}

impl ObjectData {
    fn new(type_name: &'static str) -> Self {
        Self {
            name: String::new(),
            type_name,
            weak_refs: SlotMap::with_key(),
        }
    }
}

/// The central registry that manages all live objects.
///
/// Uses arena-based storage via SlotMap for stable, versioned object IDs.
pub struct ObjectRegistry {
    objects: SlotMap<ObjectId, ObjectData>,
}

impl ObjectRegistry {
    /// Create a new empty object registry.
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
        }
    }

    /// Register a new object and return its ID.
    pub fn register<T: Object + 'static>(&mut self) -> ObjectId {
        let type_name = std::any::type_name::<T>();
        let id = self.objects.insert(ObjectData::new(type_name));
        tracing::trace!(target: targets::OBJECT, ?id, type_name, "registered object");
        id
    }

    /// Remove an object from the registry.
    ///
    /// Returns the weak notifications that were pending on the object. The
    /// caller is responsible for running them; [`SharedObjectRegistry::destroy`]
    /// does so once its lock is released.
    pub fn destroy(&mut self, id: ObjectId) -> ObjectResult<Vec<WeakNotify>> {
        let data = self.objects.remove(id).ok_or(ObjectError::InvalidObjectId)?;
        tracing::trace!(
            target: targets::OBJECT,
            ?id,
            type_name = data.type_name,
            weak_refs = data.weak_refs.len(),
            "destroyed object"
        );
        Ok(data.weak_refs.into_iter().map(|(_, notify)| notify).collect())
    }

    /// Check if an object exists in the registry.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Get the object's name.
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<&str> {
        self.objects
            .get(id)
            .map(|d| d.name.as_str())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Set the object's name.
    pub fn set_object_name(&mut self, id: ObjectId, name: String) -> ObjectResult<()> {
        self.objects
            .get_mut(id)
            .map(|d| d.name = name)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the type name of an object.
    pub fn type_name(&self, id: ObjectId) -> ObjectResult<&'static str> {
        self.objects
            .get(id)
            .map(|d| d.type_name)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Register a destroy notification on an object.
    pub fn add_weak_ref(&mut self, id: ObjectId, notify: WeakNotify) -> ObjectResult<WeakRefId> {
        let data = self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)?;
        let weak = data.weak_refs.insert(notify);
        tracing::trace!(target: targets::OBJECT, ?id, ?weak, "added weak reference");
        Ok(weak)
    }

    /// Unregister a destroy notification without running it.
    pub fn remove_weak_ref(&mut self, id: ObjectId, weak: WeakRefId) -> ObjectResult<()> {
        let data = self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)?;
        data.weak_refs
            .remove(weak)
            .map(drop)
            .ok_or(ObjectError::InvalidWeakRef)?;
        tracing::trace!(target: targets::OBJECT, ?id, ?weak, "removed weak reference");
        Ok(())
    }

    /// Number of weak references currently registered on an object.
    pub fn weak_ref_count(&self, id: ObjectId) -> ObjectResult<usize> {
        self.objects
            .get(id)
            .map(|d| d.weak_refs.len())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the number of registered objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around [`ObjectRegistry`].
///
/// Provides concurrent read access with exclusive write access via `RwLock`.
pub struct SharedObjectRegistry {
    inner: RwLock<ObjectRegistry>,
}

static_assertions::assert_impl_all!(SharedObjectRegistry: Send, Sync);

impl SharedObjectRegistry {
    /// Create a new shared object registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ObjectRegistry::new()),
        }
    }

    /// Register a new object.
    pub fn register<T: Object + 'static>(&self) -> ObjectId {
        self.inner.write().register::<T>()
    }

    /// Destroy an object and run its weak notifications.
    ///
    /// Notifications run after the write lock is released, so they may call
    /// back into the registry.
    pub fn destroy(&self, id: ObjectId) -> ObjectResult<()> {
        let pending = self.inner.write().destroy(id)?;
        for notify in pending {
            notify(id);
        }
        Ok(())
    }

    /// Check if an object exists.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.inner.read().contains(id)
    }

    /// Get the object's name.
    pub fn object_name(&self, id: ObjectId) -> ObjectResult<String> {
        self.inner.read().object_name(id).map(|s| s.to_string())
    }

    /// Set the object's name.
    pub fn set_object_name(&self, id: ObjectId, name: String) -> ObjectResult<()> {
        self.inner.write().set_object_name(id, name)
    }

    /// Get the type name of an object.
    pub fn type_name(&self, id: ObjectId) -> ObjectResult<&'static str> {
        self.inner.read().type_name(id)
    }

    /// Register a destroy notification on an object.
    pub fn add_weak_ref(&self, id: ObjectId, notify: WeakNotify) -> ObjectResult<WeakRefId> {
        self.inner.write().add_weak_ref(id, notify)
    }

    /// Unregister a destroy notification without running it.
    pub fn remove_weak_ref(&self, id: ObjectId, weak: WeakRefId) -> ObjectResult<()> {
        self.inner.write().remove_weak_ref(id, weak)
    }

    /// Number of weak references currently registered on an object.
    pub fn weak_ref_count(&self, id: ObjectId) -> ObjectResult<usize> {
        self.inner.read().weak_ref_count(id)
    }

    /// Get the number of registered objects.
    pub fn object_count(&self) -> usize {
        self.inner.read().object_count()
    }
}

impl Default for SharedObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global object registry (lazy initialized).
static GLOBAL_REGISTRY: OnceLock<SharedObjectRegistry> = OnceLock::new();

/// Initialize the global object registry.
///
/// Calling this more than once is harmless.
pub fn init_global_registry() {
    GLOBAL_REGISTRY.get_or_init(SharedObjectRegistry::new);
}

/// Get a reference to the global object registry.
///
/// Returns an error if the registry hasn't been initialized.
pub fn global_registry() -> ObjectResult<&'static SharedObjectRegistry> {
    GLOBAL_REGISTRY.get().ok_or(ObjectError::RegistryNotInitialized)
}

/// The base trait that all objects must implement.
///
/// Types implementing this trait live in the [`global_registry`] and can be
/// the target of weak references.
pub trait Object: Send + Sync {
    /// Get this object's unique identifier.
    fn object_id(&self) -> ObjectId;
}

/// Base implementation helper for objects.
///
/// Include this as a field in your object types to handle registration
/// and provide the object ID. On construction, it registers the object with
/// the [`global_registry`]; on drop it destroys the object, which fires any
/// weak notifications registered on it.
///
/// # Example
///
/// ```
/// use horizon_aria_core::{Object, ObjectId, ObjectBase, init_global_registry};
///
/// init_global_registry();
///
/// struct MyWidget {
///     base: ObjectBase,
/// }
///
/// impl Object for MyWidget {
///     fn object_id(&self) -> ObjectId {
///         self.base.id()
///     }
/// }
///
/// let widget = MyWidget { base: ObjectBase::new::<MyWidget>() };
/// widget.base.set_name("my_widget");
/// assert_eq!(widget.base.name(), "my_widget");
/// ```
pub struct ObjectBase {
    id: ObjectId,
}

impl ObjectBase {
    /// Create a new ObjectBase, registering the object in the global registry.
    ///
    /// # Panics
    ///
    /// Panics if the global registry is not initialized.
    pub fn new<T: Object + 'static>() -> Self {
        let registry = global_registry().expect("Object registry not initialized");
        let id = registry.register::<T>();
        Self { id }
    }

    /// Get the object's ID.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Get the object's name from the registry.
    pub fn name(&self) -> String {
        global_registry()
            .and_then(|r| r.object_name(self.id))
            .unwrap_or_default()
    }

    /// Set the object's name in the registry.
    pub fn set_name(&self, name: impl Into<String>) {
        if let Ok(registry) = global_registry() {
            let _ = registry.set_object_name(self.id, name.into());
        }
    }
}

impl fmt::Debug for ObjectBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBase").field("id", &self.id).finish()
    }
}

impl Drop for ObjectBase {
    fn drop(&mut self) {
        if let Ok(registry) = global_registry() {
            let _ = registry.destroy(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestObject {
        base: ObjectBase,
    }

    impl TestObject {
        fn new() -> Self {
            Self {
                base: ObjectBase::new::<Self>(),
            }
        }
    }

    impl Object for TestObject {
        fn object_id(&self) -> ObjectId {
            self.base.id()
        }
    }

    fn setup() {
        init_global_registry();
    }

    fn counter() -> (Arc<AtomicUsize>, WeakNotify) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let notify: WeakNotify = Box::new(move |_| {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (count, notify)
    }

    #[test]
    fn test_object_creation() {
        setup();
        let obj = TestObject::new();
        assert!(global_registry().unwrap().contains(obj.object_id()));
    }

    #[test]
    fn test_object_name() {
        setup();
        let obj = TestObject::new();
        obj.base.set_name("test_object");
        assert_eq!(obj.base.name(), "test_object");
    }

    #[test]
    fn test_type_name() {
        setup();
        let obj = TestObject::new();
        let name = global_registry().unwrap().type_name(obj.object_id()).unwrap();
        assert!(name.ends_with("TestObject"));
    }

    #[test]
    fn test_drop_destroys() {
        setup();
        let obj = TestObject::new();
        let id = obj.object_id();
        drop(obj);
        assert!(!global_registry().unwrap().contains(id));
    }

    #[test]
    fn test_destroyed_id_is_not_reused() {
        let mut registry = ObjectRegistry::new();
        let first = registry.register::<TestObject>();
        registry.destroy(first).unwrap();
        let second = registry.register::<TestObject>();
        assert_ne!(first, second);
        assert!(!registry.contains(first));
    }

    #[test]
    fn test_weak_ref_fires_once_on_destroy() {
        setup();
        let registry = global_registry().unwrap();
        let obj = TestObject::new();
        let (count, notify) = counter();
        registry.add_weak_ref(obj.object_id(), notify).unwrap();
        assert_eq!(registry.weak_ref_count(obj.object_id()).unwrap(), 1);

        drop(obj);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_removed_weak_ref_does_not_fire() {
        setup();
        let registry = global_registry().unwrap();
        let obj = TestObject::new();
        let (count, notify) = counter();
        let weak = registry.add_weak_ref(obj.object_id(), notify).unwrap();
        registry.remove_weak_ref(obj.object_id(), weak).unwrap();
        assert_eq!(registry.weak_ref_count(obj.object_id()).unwrap(), 0);
        assert_eq!(
            registry.remove_weak_ref(obj.object_id(), weak),
            Err(ObjectError::InvalidWeakRef)
        );

        drop(obj);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_notify_may_reenter_registry() {
        setup();
        let registry = global_registry().unwrap();
        let obj = TestObject::new();
        let id = obj.object_id();
        let seen_alive = Arc::new(AtomicUsize::new(usize::MAX));
        let inner = Arc::clone(&seen_alive);
        registry
            .add_weak_ref(
                id,
                Box::new(move |gone| {
                    let alive = global_registry().unwrap().contains(gone);
                    inner.store(alive as usize, Ordering::SeqCst);
                }),
            )
            .unwrap();

        drop(obj);
        assert_eq!(seen_alive.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_weak_ref_on_dead_object() {
        let mut registry = ObjectRegistry::new();
        let id = registry.register::<TestObject>();
        registry.destroy(id).unwrap();
        let (_, notify) = counter();
        assert!(matches!(
            registry.add_weak_ref(id, notify),
            Err(ObjectError::InvalidObjectId)
        ));
        assert!(matches!(registry.destroy(id), Err(ObjectError::InvalidObjectId)));
    }

    #[test]
    fn test_raw_round_trip() {
        let mut registry = ObjectRegistry::new();
        let id = registry.register::<TestObject>();
        assert_eq!(ObjectId::from_raw(id.as_raw()), id);
    }
}
