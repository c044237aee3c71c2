//! Declarative metadata about components.
//!
//! Rust has no runtime introspection of constructors, fields and methods, so every component
//! describes itself through a [TypeDescriptor]. Each declared member carries its parameter types,
//! an inject marker and a type-erased body the provider can call. Inheritance is modelled by
//! composition: a component embeds its base and declares it through
//! [DescriptorBuilder::extends], which gives the resolver a superclass chain to walk.
//!
//! ```rust
//! use std::sync::Arc;
//! use wire_di::{Component, ConstructorDescriptor, FieldDescriptor, TypeDescriptor};
//!
//! struct Clock;
//! impl Component for Clock {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Clock>()
//!             .constructor(ConstructorDescriptor::zero_arg(|| Clock))
//!             .build()
//!     }
//! }
//!
//! struct Scheduler {
//!     clock: Option<Arc<Clock>>,
//! }
//! impl Component for Scheduler {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Scheduler>()
//!             .constructor(ConstructorDescriptor::zero_arg(|| Scheduler { clock: None }))
//!             .field(
//!                 FieldDescriptor::new("clock", |s: &mut Scheduler, clock: Arc<Clock>| {
//!                     s.clock = Some(clock)
//!                 })
//!                 .inject(),
//!             )
//!             .build()
//!     }
//! }
//! ```

use std::{
    any::{type_name, Any},
    marker::PhantomData,
    sync::Arc,
};

use crate::types::{DynError, Injectable, Instance, TypeInfo};

/// A type the container can assemble from its descriptor
pub trait Component: Injectable + Sized {
    fn descriptor() -> TypeDescriptor;
}

/// Builds a `Vec<TypeInfo>` from a list of types
#[macro_export]
macro_rules! type_list {
    ($($ty:ty),* $(,)?) => {
        vec![$($crate::types::TypeInfo::of::<$ty>()),*]
    };
}

type Construct = dyn Fn(&mut Arguments) -> Result<Box<dyn Any + Send + Sync>, DynError> + Send + Sync;
type Assign = dyn Fn(&mut dyn Any, Instance) -> Result<(), DynError> + Send + Sync;
type Invoke = dyn Fn(&mut dyn Any, &mut Arguments) -> Result<(), DynError> + Send + Sync;

/// Resolved dependencies handed to a constructor or method body, in declared parameter order
pub struct Arguments {
    values: std::vec::IntoIter<Instance>,
}
impl Arguments {
    pub(crate) fn new(values: Vec<Instance>) -> Self {
        Arguments {
            values: values.into_iter(),
        }
    }

    /// Takes the next argument
    pub fn next<D: Injectable>(&mut self) -> Result<Arc<D>, DynError> {
        let value = self
            .values
            .next()
            .ok_or_else(|| format!("no argument left for '{}'", type_name::<D>()))?;

        let downcasted = value.downcast::<D>().map_err(|actual| {
            format!("argument should be '{}' but is '{actual}'", type_name::<D>())
        })?;

        Ok(downcasted)
    }

    /// Number of arguments not yet taken
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// A constructor of a component
#[derive(Clone)]
pub struct ConstructorDescriptor {
    produces: TypeInfo,
    parameters: Vec<TypeInfo>,
    injected: bool,
    construct: Arc<Construct>,
}
impl ConstructorDescriptor {
    /// A constructor taking `parameters`, which are passed to `body` in the same order
    pub fn new<T, F>(parameters: Vec<TypeInfo>, body: F) -> Self
    where
        T: Injectable,
        F: Fn(&mut Arguments) -> Result<T, DynError> + Send + Sync + 'static,
    {
        let construct: Arc<Construct> = Arc::new(move |args: &mut Arguments| {
            body(args).map(|instance| Box::new(instance) as Box<dyn Any + Send + Sync>)
        });

        ConstructorDescriptor {
            produces: TypeInfo::of::<T>(),
            parameters,
            injected: false,
            construct,
        }
    }

    /// A constructor without parameters
    pub fn zero_arg<T, F>(body: F) -> Self
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(Vec::new(), move |_| Ok(body()))
    }

    /// Marks the constructor for injection
    pub fn inject(mut self) -> Self {
        self.injected = true;
        self
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }

    pub fn produces(&self) -> TypeInfo {
        self.produces
    }

    pub fn parameters(&self) -> &[TypeInfo] {
        &self.parameters
    }

    pub(crate) fn call(&self, args: &mut Arguments) -> Result<Box<dyn Any + Send + Sync>, DynError> {
        (self.construct)(args)
    }
}

/// Whether a field may be reassigned after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    Immutable,
}

/// A field of a component
#[derive(Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    field_type: TypeInfo,
    declared_in: TypeInfo,
    mutability: Mutability,
    injected: bool,
    assign: Arc<Assign>,
}
impl FieldDescriptor {
    /// A field of `C` holding a `D`, written through `assign`
    pub fn new<C, D, F>(name: &'static str, assign: F) -> Self
    where
        C: Injectable,
        D: Injectable,
        F: Fn(&mut C, Arc<D>) + Send + Sync + 'static,
    {
        let assign: Arc<Assign> = Arc::new(
            move |target: &mut dyn Any, value: Instance| -> Result<(), DynError> {
                let target = target
                    .downcast_mut::<C>()
                    .ok_or_else(|| format!("field '{name}' is not declared on the target"))?;
                let value = value.downcast::<D>().map_err(|actual| {
                    format!("field '{name}' holds '{}' not '{actual}'", type_name::<D>())
                })?;

                assign(target, value);
                Ok(())
            },
        );

        FieldDescriptor {
            name,
            field_type: TypeInfo::of::<D>(),
            declared_in: TypeInfo::of::<C>(),
            mutability: Mutability::Mutable,
            injected: false,
            assign,
        }
    }

    /// Marks the field for injection
    pub fn inject(mut self) -> Self {
        self.injected = true;
        self
    }

    /// Declares the field as not reassignable after construction
    pub fn immutable(mut self) -> Self {
        self.mutability = Mutability::Immutable;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> TypeInfo {
        self.field_type
    }

    pub fn declared_in(&self) -> TypeInfo {
        self.declared_in
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }

    pub(crate) fn set(&self, target: &mut dyn Any, value: Instance) -> Result<(), DynError> {
        (self.assign)(target, value)
    }
}

/// Name and parameter types of a method - two methods with equal signatures override each other
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: &'static str,
    pub parameters: Vec<TypeInfo>,
}

/// A method of a component
#[derive(Clone)]
pub struct MethodDescriptor {
    signature: MethodSignature,
    declared_in: TypeInfo,
    type_parameters: Vec<&'static str>,
    injected: bool,
    invoke: Arc<Invoke>,
}
impl MethodDescriptor {
    /// A method of `C` taking `parameters`, which are passed to `body` in the same order
    pub fn new<C, F>(name: &'static str, parameters: Vec<TypeInfo>, body: F) -> Self
    where
        C: Injectable,
        F: Fn(&mut C, &mut Arguments) -> Result<(), DynError> + Send + Sync + 'static,
    {
        let invoke: Arc<Invoke> = Arc::new(
            move |target: &mut dyn Any, args: &mut Arguments| -> Result<(), DynError> {
                let target = target
                    .downcast_mut::<C>()
                    .ok_or_else(|| format!("method '{name}' is not declared on the target"))?;
                body(target, args)
            },
        );

        MethodDescriptor {
            signature: MethodSignature { name, parameters },
            declared_in: TypeInfo::of::<C>(),
            type_parameters: Vec::new(),
            injected: false,
            invoke,
        }
    }

    /// Marks the method for injection
    pub fn inject(mut self) -> Self {
        self.injected = true;
        self
    }

    /// Declares type parameters of the method itself, e.g. `fn setup<T>()`
    pub fn type_parameters(mut self, names: &[&'static str]) -> Self {
        self.type_parameters.extend_from_slice(names);
        self
    }

    pub fn name(&self) -> &'static str {
        self.signature.name
    }

    pub fn parameters(&self) -> &[TypeInfo] {
        &self.signature.parameters
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn declared_in(&self) -> TypeInfo {
        self.declared_in
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }

    pub(crate) fn call(&self, target: &mut dyn Any, args: &mut Arguments) -> Result<(), DynError> {
        (self.invoke)(target, args)
    }
}

/// Moves from a component to the base it embeds
pub(crate) trait Projection: Send + Sync {
    fn project<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct EmbeddedBase<S, B> {
    project: fn(&mut S) -> &mut B,
}
impl<S: Injectable, B: Injectable> Projection for EmbeddedBase<S, B> {
    fn project<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let sub = instance.downcast_mut::<S>()?;
        let base: &mut dyn Any = (self.project)(sub);
        Some(base)
    }
}

/// The direct base of a component
#[derive(Clone)]
pub struct Superclass {
    descriptor: Arc<TypeDescriptor>,
    projection: Arc<dyn Projection>,
}
impl Superclass {
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub(crate) fn projection(&self) -> Arc<dyn Projection> {
        self.projection.clone()
    }
}

/// Everything a component declares about itself
#[derive(Clone)]
pub struct TypeDescriptor {
    info: TypeInfo,
    constructors: Vec<ConstructorDescriptor>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    superclass: Option<Superclass>,
}
impl TypeDescriptor {
    pub fn builder<T: Injectable>() -> DescriptorBuilder<T> {
        DescriptorBuilder {
            descriptor: TypeDescriptor {
                info: TypeInfo::of::<T>(),
                constructors: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                superclass: None,
            },
            _component: PhantomData,
        }
    }

    pub fn info(&self) -> TypeInfo {
        self.info
    }

    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn superclass(&self) -> Option<&Superclass> {
        self.superclass.as_ref()
    }

    /// Iterates this descriptor followed by every ancestor, most derived first
    pub fn hierarchy(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |current| {
            current.superclass().map(Superclass::descriptor)
        })
    }
}

/// Builder for a [TypeDescriptor] of `T`
pub struct DescriptorBuilder<T> {
    descriptor: TypeDescriptor,
    _component: PhantomData<fn(T)>,
}
impl<T: Injectable> DescriptorBuilder<T> {
    pub fn constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.descriptor.constructors.push(constructor);
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.descriptor.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.descriptor.methods.push(method);
        self
    }

    /// Declares `B` as the base of `T`, reachable through `project`
    pub fn extends<B: Component>(mut self, project: fn(&mut T) -> &mut B) -> Self {
        self.descriptor.superclass = Some(Superclass {
            descriptor: Arc::new(B::descriptor()),
            projection: Arc::new(EmbeddedBase { project }),
        });
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}
