//! The binding engine.

use alloc::sync::Arc;

use bindery_core::{Obj, ShapeDescriptor, ShapeProvider, ValueKind};

use crate::document::raw_type;
use crate::{
    BindConfig, BindError, Coercer, CoercionError, DescriptorCache, DocumentSource,
    InjectableValues, MapDocument, MergeRegistry, RawValue, StdCoercer,
};

mod context;
pub(crate) use context::BindContext;

/// What a bind produces.
#[derive(Clone, Debug)]
pub enum BindTarget {
    /// Construct a fresh instance.
    New,
    /// Update an existing instance.
    ///
    /// Mutable types are updated in place and the same handle is returned.
    /// Immutable types are reconstructed: the creator runs and the result
    /// replaces the original, taking over the values the document doesn't
    /// supply.
    Update(Obj),
}

/// Binds documents into instances.
///
/// Cheap to clone; clones share the descriptor cache. A binder holds no
/// per-bind state, so any number of binds can run through it concurrently.
#[derive(Clone)]
pub struct Binder {
    pub(crate) cache: Arc<DescriptorCache>,
    pub(crate) config: Arc<BindConfig>,
    pub(crate) coercer: Arc<dyn Coercer>,
    pub(crate) merges: Arc<MergeRegistry>,
}

impl Binder {
    /// A binder over `provider` with the default configuration.
    pub fn new(provider: impl ShapeProvider + 'static) -> Self {
        Self::from_cache(Arc::new(DescriptorCache::new(provider)))
    }

    /// A binder over an existing, possibly shared, descriptor cache.
    pub fn from_cache(cache: Arc<DescriptorCache>) -> Self {
        Self {
            cache,
            config: Arc::new(BindConfig::default()),
            coercer: Arc::new(StdCoercer::default()),
            merges: Arc::new(MergeRegistry::default()),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: BindConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Replace the scalar coercer.
    pub fn with_coercer(mut self, coercer: impl Coercer + 'static) -> Self {
        self.coercer = Arc::new(coercer);
        self
    }

    /// Replace the merge strategies.
    pub fn with_merges(mut self, merges: MergeRegistry) -> Self {
        self.merges = Arc::new(merges);
        self
    }

    /// The configuration binds run with.
    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// The descriptor cache.
    pub fn cache(&self) -> &Arc<DescriptorCache> {
        &self.cache
    }

    /// The descriptor of `type_name`.
    pub fn descriptor(&self, type_name: &str) -> Result<Arc<ShapeDescriptor>, BindError> {
        Ok(self.cache.get(type_name)?)
    }

    /// Bind `doc` into an instance of `type_name`.
    ///
    /// On failure nothing is left behind: every record the bind wrote to,
    /// including nested objects it merged into, is restored.
    pub fn bind(
        &self,
        type_name: &str,
        doc: &mut dyn DocumentSource,
        target: BindTarget,
        injectables: &dyn InjectableValues,
    ) -> Result<Obj, BindError> {
        let mut cx = BindContext::new(self, injectables);
        match cx.bind_object(type_name, doc, target) {
            Ok(obj) => {
                cx.commit();
                Ok(obj)
            }
            Err(e) => {
                debug!(type_name, error = %e, "bind failed, rolling back");
                cx.rollback();
                Err(e)
            }
        }
    }

    /// Bind a JSON object into an instance of `type_name`.
    pub fn bind_value(
        &self,
        type_name: &str,
        value: RawValue,
        target: BindTarget,
        injectables: &dyn InjectableValues,
    ) -> Result<Obj, BindError> {
        match value {
            RawValue::Object(map) => {
                let mut doc = MapDocument::from_map(map.into_iter().collect());
                self.bind(type_name, &mut doc, target, injectables)
            }
            other => Err(CoercionError::TypeMismatch {
                expected: ValueKind::object(type_name),
                got: raw_type(&other),
            }
            .into()),
        }
    }
}

impl core::fmt::Debug for Binder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Binder")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .field("merges", &self.merges)
            .finish_non_exhaustive()
    }
}
