use std::{any::Any, marker::PhantomData, sync::Arc};

use crate::{
    cache::PlanCache,
    context::Context,
    descriptor::{Arguments, Component},
    errors::{ConstructionStep, PlanError, ProduceError},
    plan::{AssemblyPlan, InjectField, InjectMethod},
    types::{Instance, TypeInfo},
};

/// Anything which can produce instances of one type out of a [Context]
pub trait Provider: Send + Sync {
    /// Returns the typeinfo about the provided type
    fn supplies(&self) -> TypeInfo;

    /// Returns every type the provider requests from the context
    fn dependencies(&self) -> Vec<TypeInfo>;

    /// Produces a new instance of the provided type
    fn provide(&self, context: &dyn Context) -> Result<Instance, ProduceError>;
}

/// Assembles instances of `T` following its [AssemblyPlan]
///
/// Creating the provider resolves the plan, so a malformed component is rejected before any
/// instance is requested.
pub struct ComponentProvider<T> {
    plan: Arc<AssemblyPlan>,
    _component: PhantomData<fn() -> T>,
}

impl<T> Clone for ComponentProvider<T> {
    fn clone(&self) -> Self {
        Self {
            plan: self.plan.clone(),
            _component: PhantomData,
        }
    }
}

impl<T: Component> ComponentProvider<T> {
    /// Creates a provider using the process wide plan cache
    pub fn new() -> Result<Self, PlanError> {
        Self::with_cache(PlanCache::global())
    }

    pub fn with_cache(cache: &PlanCache) -> Result<Self, PlanError> {
        Ok(Self::from_plan(cache.get_or_resolve::<T>()?))
    }

    fn from_plan(plan: Arc<AssemblyPlan>) -> Self {
        ComponentProvider {
            plan,
            _component: PhantomData,
        }
    }

    pub fn plan(&self) -> &AssemblyPlan {
        &self.plan
    }

    /// Every type requested from the context while producing `T`
    pub fn dependencies(&self) -> Vec<TypeInfo> {
        self.plan.dependencies()
    }

    /// Constructs a new `T`, then injects its fields and calls its injection methods
    pub fn produce(&self, context: &dyn Context) -> Result<T, ProduceError> {
        let component = self.plan.component();
        let instance = self.assemble(context)?;

        instance.downcast::<T>().map(|instance| *instance).map_err(|_| {
            ProduceError::construction(
                component,
                ConstructionStep::Downcast,
                "the constructor produced another type",
            )
        })
    }

    fn assemble(&self, context: &dyn Context) -> Result<Box<dyn Any + Send + Sync>, ProduceError> {
        let plan = &*self.plan;
        let component = plan.component();
        tracing::debug!("Assembling {component}");

        let constructor = plan.constructor();
        let mut args = resolve_all(component, constructor.parameters(), context)?;
        let mut instance = constructor.call(&mut args).map_err(|error| {
            ProduceError::construction(component, ConstructionStep::Constructor, error)
        })?;

        for InjectField { field, depth } in plan.inject_fields() {
            let step = ConstructionStep::Field(field.name());
            let value = resolve(component, field.field_type(), context)?;

            let target = plan
                .project(&mut *instance, *depth)
                .ok_or_else(|| ProduceError::construction(component, step, "base not found"))?;
            field
                .set(target, value)
                .map_err(|error| ProduceError::construction(component, step, error))?;

            tracing::trace!("Injected field {} of {}", field.name(), field.declared_in());
        }

        for InjectMethod { method, depth } in plan.inject_methods() {
            let step = ConstructionStep::Method(method.name());
            let mut args = resolve_all(component, method.parameters(), context)?;

            let target = plan
                .project(&mut *instance, *depth)
                .ok_or_else(|| ProduceError::construction(component, step, "base not found"))?;
            method
                .call(target, &mut args)
                .map_err(|error| ProduceError::construction(component, step, error))?;

            tracing::trace!("Invoked method {} of {}", method.name(), method.declared_in());
        }

        tracing::debug!("Assembled {component}");
        Ok(instance)
    }
}

impl<T: Component> Provider for ComponentProvider<T> {
    fn supplies(&self) -> TypeInfo {
        self.plan.component()
    }

    fn dependencies(&self) -> Vec<TypeInfo> {
        self.plan.dependencies()
    }

    fn provide(&self, context: &dyn Context) -> Result<Instance, ProduceError> {
        self.produce(context).map(Instance::new)
    }
}

fn resolve(
    component: TypeInfo,
    dependency: TypeInfo,
    context: &dyn Context,
) -> Result<Instance, ProduceError> {
    match context.get(dependency)? {
        Some(instance) => Ok(instance),
        None => {
            tracing::error!("{component} needs {dependency} but the context could not supply it");
            Err(ProduceError::DependencyNotFound {
                component,
                dependency,
            })
        }
    }
}

fn resolve_all(
    component: TypeInfo,
    dependencies: &[TypeInfo],
    context: &dyn Context,
) -> Result<Arguments, ProduceError> {
    dependencies
        .iter()
        .map(|dependency| resolve(component, *dependency, context))
        .collect::<Result<Vec<_>, _>>()
        .map(Arguments::new)
}
