use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
};

use crate::{
    context::Context,
    dependency_graph::DependencyGraph,
    errors::{ProduceError, RequireError},
    provider::Provider,
    types::{Injectable, Instance, TypeInfo},
};

enum Binding {
    Instance(Instance),
    Provider(Box<dyn Provider>),
}

/// A checked set of bindings, answering requests for instances
///
/// Instance bindings are shared, provider bindings produce a new instance per request.
#[derive(Clone)]
pub struct Container(pub Arc<ContainerInner>);
pub struct ContainerInner {
    bindings: HashMap<TypeId, (TypeInfo, Binding)>,
    graph: DependencyGraph,
}
impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Container");
        for (info, binding) in self.0.bindings.values() {
            let val = match binding {
                Binding::Instance(_) => "instance",
                Binding::Provider(_) => "provider",
            };
            map.field(info.type_name, &val);
        }
        map.finish()
    }
}

impl Container {
    pub(crate) fn new(
        instances: Vec<Instance>,
        providers: Vec<Box<dyn Provider>>,
        graph: DependencyGraph,
    ) -> Self {
        let instances = instances.into_iter().map(|instance| {
            let info = instance.info;
            (info.type_id, (info, Binding::Instance(instance)))
        });
        let providers = providers.into_iter().map(|provider| {
            let info = provider.supplies();
            (info.type_id, (info, Binding::Provider(provider)))
        });

        Self(Arc::new(ContainerInner {
            bindings: instances.chain(providers).collect(),
            graph,
        }))
    }

    /// Attempts to get the requested type
    pub fn require<T: Injectable>(&self) -> Result<Arc<T>, RequireError> {
        match self.get(TypeInfo::of::<T>())? {
            Some(instance) => {
                instance
                    .downcast()
                    .map_err(|actual_type| RequireError::DowncastFailed {
                        required_type: type_name::<T>(),
                        actual_type,
                    })
            }
            None => Err(RequireError::TypeMissing(type_name::<T>())),
        }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.0.graph
    }
}

impl Context for Container {
    fn get(&self, info: TypeInfo) -> Result<Option<Instance>, ProduceError> {
        match self.0.bindings.get(&info.type_id) {
            Some((_, Binding::Instance(instance))) => Ok(Some(instance.clone())),
            Some((_, Binding::Provider(provider))) => provider.provide(self).map(Some),
            None => {
                tracing::trace!("Context has no binding for {info}");
                Ok(None)
            }
        }
    }
}
