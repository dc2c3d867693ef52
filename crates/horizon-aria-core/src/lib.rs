//! Core systems for Horizon Aria.
//!
//! This crate provides the object system that accessible values build on:
//!
//! - **Object Model**: Versioned object identifiers, names and type names
//! - **Weak References**: Destroy notifications that clear dangling links
//! - **Thread Checks**: Affinity tracking for UI-thread-only state
//! - **Logging**: `tracing` target names and helper macros
//!
//! # Example
//!
//! ```
//! use horizon_aria_core::{Object, ObjectBase, ObjectId, init_global_registry, global_registry};
//!
//! init_global_registry();
//!
//! struct Button {
//!     base: ObjectBase,
//! }
//!
//! impl Object for Button {
//!     fn object_id(&self) -> ObjectId {
//!         self.base.id()
//!     }
//! }
//!
//! let button = Button { base: ObjectBase::new::<Button>() };
//! let id = button.object_id();
//! assert!(global_registry().unwrap().contains(id));
//!
//! drop(button);
//! assert!(!global_registry().unwrap().contains(id));
//! ```

pub mod logging;
pub mod object;
pub mod thread_check;

pub use object::{
    Object, ObjectBase, ObjectError, ObjectId, ObjectRegistry, ObjectResult,
    SharedObjectRegistry, WeakNotify, WeakRefId, global_registry, init_global_registry,
};
pub use thread_check::{ThreadAffinity, are_thread_checks_enabled, set_thread_checks_enabled};
