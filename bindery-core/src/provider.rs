use alloc::sync::Arc;
use std::collections::HashMap;

use crate::RawShape;

/// Source of raw shape metadata.
///
/// Implementations are discovery mechanisms: derive macros, schema files,
/// hand-written registries. The descriptor cache calls [`describe`] at most
/// once per type name.
///
/// [`describe`]: ShapeProvider::describe
pub trait ShapeProvider: Send + Sync {
    /// Raw metadata for `type_name`, or `None` if the type is unknown.
    fn describe(&self, type_name: &str) -> Option<RawShape>;
}

/// A [`ShapeProvider`] backed by shapes registered up front.
#[derive(Clone, Debug, Default)]
pub struct ShapeRegistry {
    shapes: HashMap<Arc<str>, RawShape>,
}

impl ShapeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`ShapeRegistry::register`].
    pub fn with(mut self, shape: RawShape) -> Self {
        self.register(shape);
        self
    }

    /// Register a shape, replacing any earlier one with the same name.
    pub fn register(&mut self, shape: RawShape) -> &mut Self {
        self.shapes.insert(shape.name.clone(), shape);
        self
    }

    /// Number of registered shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl ShapeProvider for ShapeRegistry {
    fn describe(&self, type_name: &str) -> Option<RawShape> {
        self.shapes.get(type_name).cloned()
    }
}

impl<P: ShapeProvider + ?Sized> ShapeProvider for Arc<P> {
    fn describe(&self, type_name: &str) -> Option<RawShape> {
        (**self).describe(type_name)
    }
}
