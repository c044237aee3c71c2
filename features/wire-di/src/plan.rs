use std::{
    any::Any,
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    descriptor::{
        ConstructorDescriptor, FieldDescriptor, MethodDescriptor, MethodSignature, Mutability,
        Projection, Superclass, TypeDescriptor,
    },
    errors::{IllegalInjection, PlanError},
    types::TypeInfo,
};

/// An injectable field and the depth of the type declaring it (0 = the component itself)
#[derive(Clone)]
pub struct InjectField {
    pub field: FieldDescriptor,
    pub depth: usize,
}

/// An injectable method and the depth of the type declaring it (0 = the component itself)
#[derive(Clone)]
pub struct InjectMethod {
    pub method: MethodDescriptor,
    pub depth: usize,
}

/// How to assemble one component: which constructor to call, which fields to set and which
/// methods to invoke afterwards.
///
/// The plan is resolved once from a [TypeDescriptor] and never changes afterwards.
#[derive(Clone)]
pub struct AssemblyPlan {
    component: TypeInfo,
    constructor: ConstructorDescriptor,
    inject_fields: Vec<InjectField>,
    /// Ordered superclass to subclass
    inject_methods: Vec<InjectMethod>,
    /// `projections[d]` moves from the type at depth `d` to its base at `d + 1`
    projections: Vec<Arc<dyn Projection>>,
}

impl AssemblyPlan {
    /// Resolves the plan, rejecting components which can not be assembled
    pub fn resolve(descriptor: &TypeDescriptor) -> Result<Self, PlanError> {
        let component = descriptor.info();
        let plan = Self::try_resolve(descriptor)
            .inspect_err(|error| tracing::warn!("Rejected component {component}: {error}"))?;

        tracing::debug!(
            "Resolved plan for {component}: {} constructor parameters, {} fields, {} methods",
            plan.constructor.parameters().len(),
            plan.inject_fields.len(),
            plan.inject_methods.len()
        );

        Ok(plan)
    }

    fn try_resolve(descriptor: &TypeDescriptor) -> Result<Self, PlanError> {
        check_declarations(descriptor)?;

        Ok(AssemblyPlan {
            component: descriptor.info(),
            constructor: select_constructor(descriptor)?,
            inject_fields: collect_fields(descriptor)?,
            inject_methods: collect_methods(descriptor)?,
            projections: descriptor
                .hierarchy()
                .filter_map(TypeDescriptor::superclass)
                .map(Superclass::projection)
                .collect(),
        })
    }

    pub fn component(&self) -> TypeInfo {
        self.component
    }

    pub fn constructor(&self) -> &ConstructorDescriptor {
        &self.constructor
    }

    pub fn inject_fields(&self) -> &[InjectField] {
        &self.inject_fields
    }

    pub fn inject_methods(&self) -> &[InjectMethod] {
        &self.inject_methods
    }

    /// Every type needed to assemble the component: constructor parameters, field types and
    /// method parameters. Each type is listed once, in order of first use.
    pub fn dependencies(&self) -> Vec<TypeInfo> {
        let constructor = self.constructor.parameters().iter();
        let fields = self.inject_fields.iter().map(|f| &f.field).map(FieldDescriptor::field_type);
        let methods = self
            .inject_methods
            .iter()
            .flat_map(|m| m.method.parameters().iter());

        let mut seen = HashSet::new();
        constructor
            .copied()
            .chain(fields)
            .chain(methods.copied())
            .filter(|info| seen.insert(*info))
            .collect()
    }

    /// Moves from the component to the part of it declared at `depth`
    pub(crate) fn project<'a>(
        &self,
        instance: &'a mut dyn Any,
        depth: usize,
    ) -> Option<&'a mut dyn Any> {
        let mut current = instance;
        for projection in self.projections.iter().take(depth) {
            current = projection.project(current)?;
        }
        Some(current)
    }
}

/// Every member must belong to the level it is registered on
fn check_declarations(descriptor: &TypeDescriptor) -> Result<(), PlanError> {
    let component = descriptor.info();
    let misplaced = |member, declared_in, registered_on| PlanError::MisplacedMember {
        component,
        member,
        declared_in,
        registered_on,
    };

    if let Some(constructor) = descriptor
        .constructors()
        .iter()
        .find(|constructor| constructor.produces() != component)
    {
        return Err(misplaced("constructor", constructor.produces(), component));
    }

    for level in descriptor.hierarchy() {
        if let Some(field) = level.fields().iter().find(|f| f.declared_in() != level.info()) {
            return Err(misplaced(field.name(), field.declared_in(), level.info()));
        }
        if let Some(method) = level.methods().iter().find(|m| m.declared_in() != level.info()) {
            return Err(misplaced(method.name(), method.declared_in(), level.info()));
        }
    }

    Ok(())
}

/// The single marked constructor, or the zero-argument one if none is marked
fn select_constructor(descriptor: &TypeDescriptor) -> Result<ConstructorDescriptor, PlanError> {
    let component = descriptor.info();
    let injected = descriptor
        .constructors()
        .iter()
        .filter(|constructor| constructor.is_injected())
        .collect::<Vec<_>>();

    match injected.as_slice() {
        [constructor] => Ok((*constructor).clone()),
        [] => descriptor
            .constructors()
            .iter()
            .find(|constructor| constructor.parameters().is_empty())
            .cloned()
            .ok_or(PlanError::NoUsableConstructor { component }),
        many => Err(PlanError::AmbiguousConstructor {
            component,
            count: many.len(),
        }),
    }
}

fn collect_fields(descriptor: &TypeDescriptor) -> Result<Vec<InjectField>, PlanError> {
    let mut fields = Vec::new();

    for (depth, level) in descriptor.hierarchy().enumerate() {
        for field in level.fields().iter().filter(|field| field.is_injected()) {
            if field.mutability() == Mutability::Immutable {
                return Err(PlanError::IllegalInjectionTarget {
                    component: descriptor.info(),
                    target: field.name(),
                    reason: IllegalInjection::ImmutableField,
                });
            }

            fields.push(InjectField {
                field: field.clone(),
                depth,
            });
        }
    }

    Ok(fields)
}

fn collect_methods(descriptor: &TypeDescriptor) -> Result<Vec<InjectMethod>, PlanError> {
    // Overriding without the marker opts the whole override chain out of injection
    let opted_out = descriptor
        .methods()
        .iter()
        .filter(|method| !method.is_injected())
        .map(MethodDescriptor::signature)
        .collect::<HashSet<_>>();

    // Most derived declaration of every signature, marked or not, and its depth
    let mut dispatch: HashMap<&MethodSignature, (&MethodDescriptor, usize)> = HashMap::new();
    let mut collected: HashSet<&MethodSignature> = HashSet::new();
    let mut levels = Vec::new();

    for (depth, level) in descriptor.hierarchy().enumerate() {
        let mut methods = Vec::new();

        for method in level.methods() {
            let signature = method.signature();
            let (body, body_depth) = *dispatch.entry(signature).or_insert((method, depth));

            if !method.is_injected() {
                continue;
            }
            // The most derived marked declaration wins
            if opted_out.contains(signature) || !collected.insert(signature) {
                tracing::trace!(
                    "Skipping {}::{} - overridden by a subclass",
                    level.info(),
                    signature.name
                );
                continue;
            }

            if method.is_generic() {
                return Err(PlanError::IllegalInjectionTarget {
                    component: descriptor.info(),
                    target: method.name(),
                    reason: IllegalInjection::GenericMethod,
                });
            }

            if body_depth != depth {
                tracing::trace!(
                    "{}::{} dispatches to the override in {}",
                    level.info(),
                    signature.name,
                    body.declared_in()
                );
            }
            methods.push(InjectMethod {
                method: body.clone(),
                depth: body_depth,
            });
        }

        levels.push(methods);
    }

    Ok(levels.into_iter().rev().flatten().collect())
}
