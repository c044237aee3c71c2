use std::sync::Arc;

use thiserror::Error;

use crate::{
    dependency_graph::DependencyGraphErrors,
    types::{DynError, TypeInfo},
};

/// Errors while resolving the assembly plan of a component
///
/// These are raised when a provider is created, never when an instance is requested.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// More than one constructor carries the inject marker
    #[error("'{component}' declares {count} injectable constructors, only one is allowed")]
    AmbiguousConstructor { component: TypeInfo, count: usize },
    /// No constructor carries the inject marker and there is no zero-argument constructor
    #[error("'{component}' has neither an injectable nor a zero-argument constructor")]
    NoUsableConstructor { component: TypeInfo },
    /// A constructor, field or method registered on a type it does not belong to
    #[error("'{component}' registers '{member}' of '{declared_in}' on '{registered_on}'")]
    MisplacedMember {
        component: TypeInfo,
        member: &'static str,
        declared_in: TypeInfo,
        registered_on: TypeInfo,
    },
    /// An injectable field or method can not receive injections
    #[error("'{component}' can not inject into '{target}': {reason}")]
    IllegalInjectionTarget {
        component: TypeInfo,
        target: &'static str,
        reason: IllegalInjection,
    },
}

/// Why an injection point was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalInjection {
    #[error("the field is immutable")]
    ImmutableField,
    #[error("the method declares its own type parameters")]
    GenericMethod,
}

/// The step of the assembly that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionStep {
    Constructor,
    Field(&'static str),
    Method(&'static str),
    /// The produced value did not have the type the plan was resolved for
    Downcast,
}
impl std::fmt::Display for ConstructionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstructionStep::Constructor => f.write_str("constructor"),
            ConstructionStep::Field(name) => write!(f, "field '{name}'"),
            ConstructionStep::Method(name) => write!(f, "method '{name}'"),
            ConstructionStep::Downcast => f.write_str("downcast"),
        }
    }
}

/// Errors while producing an instance from an assembly plan
#[derive(Error, Debug, Clone)]
pub enum ProduceError {
    /// The context could not supply a required dependency
    #[error("'{component}' needs '{dependency}' but the context could not supply it")]
    DependencyNotFound {
        component: TypeInfo,
        dependency: TypeInfo,
    },
    /// The constructor, a field assignment or an injection method failed
    #[error("Constructing '{component}' failed in {step} - error: {error:?}")]
    ComponentConstruction {
        component: TypeInfo,
        step: ConstructionStep,
        error: Arc<DynError>,
    },
}

impl ProduceError {
    pub(crate) fn construction(
        component: TypeInfo,
        step: ConstructionStep,
        error: impl Into<DynError>,
    ) -> Self {
        ProduceError::ComponentConstruction {
            component,
            step,
            error: Arc::new(error.into()),
        }
    }
}

/// Errors when trying to require a certain type from a [crate::container::Container]
#[derive(Error, Debug, Clone)]
pub enum RequireError {
    /// The required type is not bound
    #[error("The required type '{0}' is not known.")]
    TypeMissing(&'static str),
    /// Producing the required type failed
    #[error(transparent)]
    Produce(#[from] ProduceError),

    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },
}

/// Errors while building a [crate::container::Container]
#[derive(Error, Debug, Clone)]
pub enum ContextError {
    /// A component could not be planned
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// There are issues with the dependency graph
    #[error(transparent)]
    DependencyGraph(#[from] DependencyGraphErrors),
}
