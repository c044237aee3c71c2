use std::{any::TypeId, collections::HashMap, sync::Arc};

use wire_di::{
    context::Context,
    errors::ProduceError,
    types::{Injectable, Instance, TypeInfo},
    ContextBuilder,
};

use crate::errors::ConfigError;

/// A provider to register all configs.
///
/// Configs can be registered and retrieved based on type.
#[derive(Default)]
pub struct ConfigProvider {
    configs: HashMap<TypeId, Instance>,
}

impl ConfigProvider {
    /// Initializes an empty Config Provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a config with specified type.
    pub fn get_config<T: Injectable>(&self) -> Option<Arc<T>> {
        self.configs
            .get(&TypeId::of::<T>())
            .and_then(|config| config.downcast().ok())
    }

    /// Add a config to the registry.
    ///
    /// If the config type is already registered, it will return
    /// [`ConfigError::AlreadyRegistered`]
    pub fn add_config<T: Injectable>(&mut self, config: T) -> Result<&mut Self, ConfigError> {
        let info = TypeInfo::of::<T>();

        if self.configs.contains_key(&info.type_id) {
            return Err(ConfigError::AlreadyRegistered(info));
        }

        tracing::debug!("Registered config {info}");
        self.configs.insert(info.type_id, Instance::new(config));
        Ok(self)
    }

    /// Can optionally add a config to the registry.
    ///
    /// If the config provided is `Some(T)`, it will be the same as calling [`ConfigProvider::add_config`]
    /// If the config provided is `None`, then the function just returns `Ok(self)` for chaining
    pub fn maybe_add_config<T: Injectable>(
        &mut self,
        config: Option<T>,
    ) -> Result<&mut Self, ConfigError> {
        match config {
            Some(c) => self.add_config(c),
            None => Ok(self),
        }
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Binds every registered config as a shared instance of `builder`
    pub fn bind(&self, builder: ContextBuilder) -> ContextBuilder {
        self.configs
            .values()
            .cloned()
            .fold(builder, ContextBuilder::add_shared_instance)
    }
}

impl Context for ConfigProvider {
    fn get(&self, info: TypeInfo) -> Result<Option<Instance>, ProduceError> {
        Ok(self.configs.get(&info.type_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use wire_di::{
        dependency_graph::DependencyGraphError, type_list, Component, ComponentProvider,
        ConstructorDescriptor, ContextError, TypeDescriptor,
    };

    use super::*;

    #[derive(Debug, PartialEq)]
    struct ServerConfig {
        port: u16,
    }

    struct Server {
        config: Arc<ServerConfig>,
    }
    impl Component for Server {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Server>()
                .constructor(
                    ConstructorDescriptor::new(type_list![ServerConfig], |args| {
                        Ok(Server {
                            config: args.next()?,
                        })
                    })
                    .inject(),
                )
                .build()
        }
    }

    #[test]
    fn registered_config_is_returned_by_type() {
        let mut configs = ConfigProvider::new();
        configs.add_config(ServerConfig { port: 8080 }).unwrap();

        assert_eq!(
            configs.get_config::<ServerConfig>().as_deref(),
            Some(&ServerConfig { port: 8080 })
        );
        assert!(configs.get_config::<String>().is_none());
    }

    #[test]
    fn registering_twice_fails() {
        let mut configs = ConfigProvider::new();
        configs.add_config(ServerConfig { port: 8080 }).unwrap();

        let error = configs.add_config(ServerConfig { port: 9090 }).err();

        assert_eq!(
            error,
            Some(ConfigError::AlreadyRegistered(TypeInfo::of::<ServerConfig>()))
        );
        assert_eq!(configs.get_config::<ServerConfig>().unwrap().port, 8080);
    }

    #[test]
    fn maybe_add_skips_none() {
        let mut configs = ConfigProvider::new();
        configs
            .maybe_add_config::<ServerConfig>(None)
            .unwrap()
            .maybe_add_config(Some("name".to_string()))
            .unwrap();

        assert_eq!(configs.len(), 1);
        assert!(configs.get_config::<ServerConfig>().is_none());
    }

    #[test]
    fn components_are_produced_directly_from_configs() {
        let mut configs = ConfigProvider::new();
        configs.add_config(ServerConfig { port: 8080 }).unwrap();

        let server = ComponentProvider::<Server>::new()
            .unwrap()
            .produce(&configs)
            .unwrap();

        assert_eq!(server.config.port, 8080);
    }

    #[test]
    fn bound_configs_are_shared_with_the_container() {
        let mut configs = ConfigProvider::new();
        configs.add_config(ServerConfig { port: 8080 }).unwrap();

        let container = configs
            .bind(ContextBuilder::new())
            .add_component::<Server>()
            .unwrap()
            .build()
            .unwrap();

        let server = container.require::<Server>().unwrap();
        assert!(Arc::ptr_eq(
            &server.config,
            &configs.get_config::<ServerConfig>().unwrap()
        ));
    }

    #[test]
    fn instance_bound_next_to_a_config_is_a_duplicate() {
        let mut configs = ConfigProvider::new();
        configs.add_config(ServerConfig { port: 8080 }).unwrap();

        let error = configs
            .bind(ContextBuilder::new())
            .add_instance(ServerConfig { port: 9090 })
            .build()
            .unwrap_err();

        let ContextError::DependencyGraph(graph_errors) = error else {
            panic!("expected dependency graph errors, got {error}");
        };
        assert_eq!(
            graph_errors.errors,
            vec![DependencyGraphError::Duplicate(TypeInfo::of::<ServerConfig>())]
        );
    }
}
