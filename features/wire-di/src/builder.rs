use crate::{
    container::Container,
    dependency_graph::DependencyGraph,
    descriptor::Component,
    errors::{ContextError, PlanError},
    provider::{ComponentProvider, Provider},
    types::{Injectable, Instance},
};

/// Collects the bindings of a [Container]
///
/// 1. Register existing instances and components
/// 2. `build` checks the dependency graph as a whole and returns the container
pub struct ContextBuilder {
    /// Registered providers which produce a new instance per request
    pub(crate) registered_providers: Vec<Box<dyn Provider>>,
    /// Registered already created instances, duplicates are reported by `build`
    pub(crate) registered_instances: Vec<Instance>,
}
impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        ContextBuilder {
            registered_providers: Vec::new(),
            registered_instances: Vec::new(),
        }
    }
}
impl ContextBuilder {
    pub fn add_instance<T: Injectable>(self, instance: T) -> Self {
        self.add_shared_instance(Instance::new(instance))
    }

    /// Binds an instance which is already shared
    pub fn add_shared_instance(mut self, instance: Instance) -> Self {
        self.registered_instances.push(instance);
        self
    }

    /// Binds `T` to a [ComponentProvider], failing if `T` can not be assembled
    pub fn add_component<T: Component>(self) -> Result<Self, PlanError> {
        Ok(self.add_provider(ComponentProvider::<T>::new()?))
    }

    pub fn add_provider<P: Provider + 'static>(mut self, provider: P) -> Self {
        self.registered_providers.push(Box::new(provider));
        self
    }

    pub fn build(self) -> Result<Container, ContextError> {
        tracing::debug!(
            "Building context with {} providers and {} instances",
            self.registered_providers.len(),
            self.registered_instances.len()
        );

        let graph = DependencyGraph::new(&self)?;
        graph.check()?;

        let ContextBuilder {
            registered_providers,
            registered_instances,
        } = self;

        Ok(Container::new(
            registered_instances,
            registered_providers,
            graph,
        ))
    }
}
