//! Wire DI assembles components out of a dependency context.
//!
//! For every component type the [AssemblyPlan] is resolved once from the component's
//! [TypeDescriptor]: one constructor, the injectable fields of the whole base chain, and the
//! injectable methods ordered from the outermost base down to the component itself.
//! A [ComponentProvider] then follows the plan to produce wired instances, fetching every
//! dependency from a [Context].
//!
//! The crate consists of the following parts:
//!
//! 1. Descriptor - components declaring their constructors, fields, methods and base
//! 2. Plan - resolving a descriptor into an assembly plan, cached per type
//! 3. Provider - producing instances by following a plan
//! 4. Builder / Container - a context binding instances and providers, checked as a graph
//!    before anything is produced

pub mod builder;
pub mod cache;
pub mod container;
pub mod context;
pub mod dependency_graph;
pub mod descriptor;
pub mod errors;
pub mod plan;
pub mod provider;
pub mod types;

pub use builder::ContextBuilder;
pub use cache::PlanCache;
pub use container::Container;
pub use context::Context;
pub use descriptor::{
    Arguments, Component, ConstructorDescriptor, DescriptorBuilder, FieldDescriptor,
    MethodDescriptor, MethodSignature, Mutability, Superclass, TypeDescriptor,
};
pub use errors::{
    ConstructionStep, ContextError, IllegalInjection, PlanError, ProduceError, RequireError,
};
pub use plan::AssemblyPlan;
pub use provider::{ComponentProvider, Provider};
pub use types::{DynError, Injectable, Instance, TypeInfo};
