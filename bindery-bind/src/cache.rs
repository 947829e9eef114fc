use alloc::sync::Arc;
use std::collections::HashMap;
use std::sync::OnceLock;

use bindery_core::{ShapeDescriptor, ShapeError, ShapeProvider};
use parking_lot::Mutex;

type Entry = Arc<OnceLock<Result<Arc<ShapeDescriptor>, ShapeError>>>;

/// Builds and caches one [`ShapeDescriptor`] per type.
///
/// Concurrent first use of a type blocks on that type's cell: exactly one
/// build runs and every caller observes the same `Arc`. Build failures are
/// cached as well.
pub struct DescriptorCache {
    provider: Box<dyn ShapeProvider>,
    entries: Mutex<HashMap<Arc<str>, Entry>>,
}

impl DescriptorCache {
    /// A cache over the given shape provider.
    pub fn new(provider: impl ShapeProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The descriptor of `type_name`, building it on first use.
    pub fn get(&self, type_name: &str) -> Result<Arc<ShapeDescriptor>, ShapeError> {
        // the map lock is only held to find the cell, never while building
        let cell = {
            let mut entries = self.entries.lock();
            match entries.get(type_name) {
                Some(cell) => cell.clone(),
                None => {
                    let cell = Entry::default();
                    entries.insert(type_name.into(), cell.clone());
                    cell
                }
            }
        };

        cell.get_or_init(|| self.build(type_name)).clone()
    }

    fn build(&self, type_name: &str) -> Result<Arc<ShapeDescriptor>, ShapeError> {
        let Some(raw) = self.provider.describe(type_name) else {
            debug!(type_name, "no shape for type");
            return Err(ShapeError::UnboundableType {
                type_name: type_name.into(),
                reason: "no shape is known for it".into(),
            });
        };
        match ShapeDescriptor::build(raw) {
            Ok(descriptor) => {
                debug!(
                    type_name,
                    creator_slots = descriptor.creator_slots().len(),
                    slots = descriptor.slots().len(),
                    "built descriptor"
                );
                Ok(Arc::new(descriptor))
            }
            Err(e) => {
                debug!(type_name, error = %e, "descriptor build failed");
                Err(e)
            }
        }
    }

    /// Returns `true` if a build of `type_name` has completed, successfully
    /// or not.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries
            .lock()
            .get(type_name)
            .is_some_and(|cell| cell.get().is_some())
    }

    /// Number of types looked up so far.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if no type was looked up yet.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl core::fmt::Debug for DescriptorCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DescriptorCache")
            .field("types", &self.len())
            .finish_non_exhaustive()
    }
}
