//! Weak links from reference values to their target objects.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_aria_core::logging::targets;
use horizon_aria_core::{ObjectId, WeakRefId, global_registry};
use parking_lot::Mutex;

use crate::error::Result;

#[derive(Debug, Clone, Copy)]
struct LinkedObject {
    id: ObjectId,
    type_name: &'static str,
    weak: WeakRefId,
}

type Slot = Arc<Mutex<Option<LinkedObject>>>;

/// The payload of a reference value.
///
/// Holds a registry weak reference to the target. When the target is
/// destroyed the registry notification empties the slot; when the link is
/// dropped first it unregisters its weak reference.
pub(crate) struct ReferenceLink {
    slot: Slot,
}

impl ReferenceLink {
    pub(crate) fn new(target: ObjectId) -> Result<Self> {
        let registry = global_registry()?;
        let type_name = registry.type_name(target)?;

        let slot: Slot = Arc::new(Mutex::new(None));
        let notify_slot: Weak<Mutex<Option<LinkedObject>>> = Arc::downgrade(&slot);

        // Hold the slot while registering so a concurrent destroy cannot
        // clear it before it is filled.
        let mut guard = slot.lock();
        let weak = registry.add_weak_ref(
            target,
            Box::new(move |destroyed| {
                if let Some(slot) = notify_slot.upgrade() {
                    slot.lock().take();
                    tracing::trace!(
                        target: targets::VALUE,
                        object = ?destroyed,
                        "reference target destroyed, link cleared"
                    );
                }
            }),
        )?;
        *guard = Some(LinkedObject {
            id: target,
            type_name,
            weak,
        });
        drop(guard);

        tracing::trace!(target: targets::VALUE, object = ?target, type_name, "reference value created");
        Ok(Self { slot })
    }

    /// The target, or `None` once it has been destroyed.
    pub(crate) fn target(&self) -> Option<ObjectId> {
        self.slot.lock().map(|linked| linked.id)
    }

    pub(crate) fn fmt_target(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let linked = *self.slot.lock();
        match linked {
            Some(linked) => write!(f, "{}<{:#x}>", linked.type_name, linked.id.as_raw()),
            None => f.write_str("<null>"),
        }
    }
}

impl Drop for ReferenceLink {
    fn drop(&mut self) {
        // Release the slot before calling into the registry.
        let linked = self.slot.lock().take();
        let Some(linked) = linked else {
            return;
        };

        if let Ok(registry) = global_registry() {
            // The target may be going away concurrently; its weak list is
            // dropped with it.
            let _ = registry.remove_weak_ref(linked.id, linked.weak);
        }
        tracing::trace!(target: targets::VALUE, object = ?linked.id, "reference value finalized");
    }
}
