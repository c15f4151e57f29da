//! Graph registry (C3)
//!
//! A process-wide, read-mostly map from `graph_id` to a factory that builds
//! a [`CompiledGraph`] for a given run's `configurable` dict plus the
//! per-request checkpointer/store handles. Writes only happen at startup;
//! after that every lookup is a lock-free read through `dashmap`.

use dashmap::DashMap;
use langgraph_checkpoint::CheckpointSaver;
use langgraph_core::compiled::CompiledGraph;
use langgraph_core::store::Store;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

pub const DEFAULT_GRAPH_ID: &str = "agent";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("graph factory for '{0}' failed: {1}")]
    FactoryFailed(String, String),
}

/// A function producing a compiled graph for one run. `configurable` is the
/// run's merged config; `checkpointer`/`store` are freshly acquired,
/// per-request persistence handles (never cached across calls).
pub type GraphBuilder = Arc<
    dyn Fn(
            &Value,
            Option<Arc<dyn CheckpointSaver>>,
            Option<Arc<dyn Store>>,
        ) -> Result<CompiledGraph, RegistryError>
        + Send
        + Sync,
>;

/// A factory registered by module path + attribute name. The real
/// [`GraphBuilder`] behind it isn't constructed until the graph is first
/// resolved, then cached for the lifetime of the process.
pub struct LazyGraphFactory {
    pub module_path: &'static str,
    pub attribute: &'static str,
    resolver: fn() -> GraphBuilder,
    cell: OnceLock<GraphBuilder>,
}

impl LazyGraphFactory {
    fn get(&self) -> &GraphBuilder {
        self.cell.get_or_init(|| {
            tracing::info!(
                module = self.module_path,
                attribute = self.attribute,
                "resolving lazy graph factory on first use"
            );
            (self.resolver)()
        })
    }
}

/// Either an eagerly-provided builder, or a lazy one resolved (module path +
/// attribute name) on first use. Both are stored side by side in the
/// registry so callers can mix startup-cheap lazy graphs with ad hoc eager
/// registrations (e.g. in tests).
#[derive(Clone)]
pub enum GraphFactory {
    Eager(GraphBuilder),
    Lazy(Arc<LazyGraphFactory>),
}

impl GraphFactory {
    pub fn eager(builder: GraphBuilder) -> Self {
        GraphFactory::Eager(builder)
    }

    /// Register a factory identified by `module_path`/`attribute` whose
    /// builder is only produced by calling `resolver` the first time this
    /// graph is actually used.
    pub fn lazy(module_path: &'static str, attribute: &'static str, resolver: fn() -> GraphBuilder) -> Self {
        GraphFactory::Lazy(Arc::new(LazyGraphFactory { module_path, attribute, resolver, cell: OnceLock::new() }))
    }

    fn call(
        &self,
        configurable: &Value,
        checkpointer: Option<Arc<dyn CheckpointSaver>>,
        store: Option<Arc<dyn Store>>,
    ) -> Result<CompiledGraph, RegistryError> {
        match self {
            GraphFactory::Eager(builder) => builder(configurable, checkpointer, store),
            GraphFactory::Lazy(lazy) => (lazy.get())(configurable, checkpointer, store),
        }
    }
}

/// Read-mostly `graph_id -> factory` map.
#[derive(Clone)]
pub struct GraphRegistry {
    factories: Arc<DashMap<String, GraphFactory>>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self {
            factories: Arc::new(DashMap::new()),
        }
    }

    /// Register a factory under `graph_id`, overwriting any previous entry.
    /// Only ever called during startup wiring.
    pub fn register(&self, graph_id: impl Into<String>, factory: GraphFactory) {
        self.factories.insert(graph_id.into(), factory);
    }

    pub fn contains(&self, graph_id: &str) -> bool {
        self.factories.contains_key(graph_id)
    }

    pub fn graph_ids(&self) -> Vec<String> {
        self.factories.iter().map(|e| e.key().clone()).collect()
    }

    /// Resolve `graph_id`, falling back to [`DEFAULT_GRAPH_ID`] with a
    /// warning when the requested id is unregistered.
    pub fn resolve(
        &self,
        graph_id: &str,
        configurable: &Value,
        checkpointer: Option<Arc<dyn CheckpointSaver>>,
        store: Option<Arc<dyn Store>>,
    ) -> Result<CompiledGraph, RegistryError> {
        let factory = match self.factories.get(graph_id) {
            Some(f) => f.clone(),
            None => {
                tracing::warn!(graph_id, "unregistered graph_id, falling back to default");
                self.factories.get(DEFAULT_GRAPH_ID).map(|f| f.clone()).ok_or_else(|| {
                    RegistryError::FactoryFailed(
                        graph_id.to_string(),
                        "no default graph registered".to_string(),
                    )
                })?
            }
        };

        factory.call(configurable, checkpointer, store)
    }
}

impl Default for GraphRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langgraph_core::StateGraph;
    use serde_json::json;

    fn dummy_builder() -> GraphBuilder {
        Arc::new(|_cfg, _cp, _store| {
            StateGraph::new()
                .compile()
                .map_err(|e| RegistryError::FactoryFailed("dummy".into(), e.to_string()))
        })
    }

    fn dummy_factory() -> GraphFactory {
        GraphFactory::eager(dummy_builder())
    }

    #[test]
    fn register_and_resolve() {
        let registry = GraphRegistry::new();
        registry.register("echo", dummy_factory());
        assert!(registry.contains("echo"));
        assert!(registry.resolve("echo", &json!({}), None, None).is_ok());
    }

    #[test]
    fn unknown_id_falls_back_to_default() {
        let registry = GraphRegistry::new();
        registry.register(DEFAULT_GRAPH_ID, dummy_factory());
        assert!(registry.resolve("nonexistent", &json!({}), None, None).is_ok());
    }

    #[test]
    fn unknown_id_without_default_errors() {
        let registry = GraphRegistry::new();
        assert!(registry.resolve("nonexistent", &json!({}), None, None).is_err());
    }

    #[test]
    fn graph_ids_lists_registered_entries() {
        let registry = GraphRegistry::new();
        registry.register("a", dummy_factory());
        registry.register("b", dummy_factory());
        let mut ids = registry.graph_ids();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    static LAZY_RESOLUTIONS: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

    fn counting_resolver() -> GraphBuilder {
        LAZY_RESOLUTIONS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        dummy_builder()
    }

    #[test]
    fn lazy_factory_resolves_its_builder_on_first_use_only() {
        let before = LAZY_RESOLUTIONS.load(std::sync::atomic::Ordering::SeqCst);
        let registry = GraphRegistry::new();
        registry.register("lazy", GraphFactory::lazy("agent_runtime::registry::tests", "counting_resolver", counting_resolver));

        assert_eq!(LAZY_RESOLUTIONS.load(std::sync::atomic::Ordering::SeqCst), before, "not resolved until first use");

        assert!(registry.resolve("lazy", &json!({}), None, None).is_ok());
        assert_eq!(LAZY_RESOLUTIONS.load(std::sync::atomic::Ordering::SeqCst), before + 1);

        assert!(registry.resolve("lazy", &json!({}), None, None).is_ok());
        assert_eq!(LAZY_RESOLUTIONS.load(std::sync::atomic::Ordering::SeqCst), before + 1, "cached after first resolution");
    }
}
