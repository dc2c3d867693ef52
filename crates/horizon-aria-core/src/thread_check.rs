//! Thread affinity checks for Horizon Aria.
//!
//! Accessible state belongs to the UI thread that owns the widget tree.
//! Structures that must stay on their creating thread carry a
//! [`ThreadAffinity`] and check it on mutation:
//!
//! ```
//! use horizon_aria_core::thread_check::ThreadAffinity;
//!
//! struct WidgetState {
//!     affinity: ThreadAffinity,
//!     busy: bool,
//! }
//!
//! impl WidgetState {
//!     fn set_busy(&mut self, busy: bool) {
//!         self.affinity.check("WidgetState::set_busy");
//!         self.busy = busy;
//!     }
//! }
//!
//! let mut state = WidgetState { affinity: ThreadAffinity::current(), busy: false };
//! state.set_busy(true);
//! assert!(state.busy);
//! ```
//!
//! Checks are enabled by default in debug builds and disabled in release
//! builds; [`set_thread_checks_enabled`] overrides the default.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

/// Flag to enable/disable runtime thread checks globally.
static THREAD_CHECKS_ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Enable or disable runtime thread checks.
pub fn set_thread_checks_enabled(enabled: bool) {
    THREAD_CHECKS_ENABLED.store(enabled, Ordering::SeqCst);
    crate::aria_debug!(enabled, "thread checks toggled");
}

/// Check if runtime thread checks are currently enabled.
#[inline]
pub fn are_thread_checks_enabled() -> bool {
    THREAD_CHECKS_ENABLED.load(Ordering::Relaxed)
}

/// Thread affinity tracker.
///
/// Records the thread on which a structure was created and verifies that
/// later operations happen on that same thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Panic if called from another thread while thread checks are enabled.
    ///
    /// `operation` names the offending call in the panic message.
    #[inline]
    pub fn check(&self, operation: &str) {
        if are_thread_checks_enabled() && !self.is_same_thread() {
            self.panic_wrong_thread(operation);
        }
    }

    /// Panic if called from another thread, regardless of the global flag.
    #[inline]
    pub fn assert_same_thread(&self) {
        if !self.is_same_thread() {
            self.panic_wrong_thread("object accessed from wrong thread");
        }
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, operation: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");

        panic!(
            "thread affinity violation: {operation}\n\
             owner thread: {:?}\n\
             current thread: \"{current_name}\" ({:?})\n\
             accessible state must only be touched from the thread that owns the widget tree",
            self.thread_id,
            current.id()
        )
    }
}
