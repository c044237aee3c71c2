use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use wire_di::{
    dependency_graph::DependencyGraphError, type_list, Component, ConstructorDescriptor,
    ContextBuilder, ContextError, FieldDescriptor, PlanError, ProduceError, RequireError,
    TypeDescriptor, TypeInfo,
};

#[derive(Debug)]
struct Settings {
    name: &'static str,
}

struct Repository {
    settings: Arc<Settings>,
}
impl Component for Repository {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Repository>()
            .constructor(
                ConstructorDescriptor::new(type_list![Settings], |args| {
                    Ok(Repository {
                        settings: args.next()?,
                    })
                })
                .inject(),
            )
            .build()
    }
}

#[derive(Default)]
struct Service {
    repository: Option<Arc<Repository>>,
}
impl Component for Service {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Service>()
            .constructor(ConstructorDescriptor::zero_arg(Service::default))
            .field(
                FieldDescriptor::new("repository", |s: &mut Service, r: Arc<Repository>| {
                    s.repository = Some(r)
                })
                .inject(),
            )
            .build()
    }
}

#[test]
fn require_assembles_nested_components() {
    let container = ContextBuilder::new()
        .add_instance(Settings { name: "primary" })
        .add_component::<Repository>()
        .unwrap()
        .add_component::<Service>()
        .unwrap()
        .build()
        .unwrap();

    let service = container.require::<Service>().unwrap();

    let repository = service.repository.as_ref().unwrap();
    assert_eq!(repository.settings.name, "primary");
}

#[test]
fn instances_are_shared_and_components_are_produced_per_request() {
    let container = ContextBuilder::new()
        .add_instance(Settings { name: "primary" })
        .add_component::<Repository>()
        .unwrap()
        .build()
        .unwrap();

    let first = container.require::<Repository>().unwrap();
    let second = container.require::<Repository>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.settings, &second.settings));
    assert!(Arc::ptr_eq(
        &first.settings,
        &container.require::<Settings>().unwrap()
    ));
}

#[test]
fn build_reports_missing_dependency() {
    let error = ContextBuilder::new()
        .add_component::<Repository>()
        .unwrap()
        .build()
        .unwrap_err();

    let ContextError::DependencyGraph(graph_errors) = error else {
        panic!("expected dependency graph errors, got {error}");
    };
    assert_eq!(
        graph_errors.errors,
        vec![DependencyGraphError::MissingDependency {
            dependency: TypeInfo::of::<Settings>(),
            required_by: TypeInfo::of::<Repository>(),
        }]
    );
}

struct Left;
struct Right;
impl Component for Left {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Left>()
            .constructor(ConstructorDescriptor::new(type_list![Right], |_| Ok(Left)).inject())
            .build()
    }
}
impl Component for Right {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Right>()
            .constructor(ConstructorDescriptor::new(type_list![Left], |_| Ok(Right)).inject())
            .build()
    }
}

#[test]
fn build_reports_circular_dependency() {
    let error = ContextBuilder::new()
        .add_component::<Left>()
        .unwrap()
        .add_component::<Right>()
        .unwrap()
        .build()
        .unwrap_err();

    let ContextError::DependencyGraph(graph_errors) = error else {
        panic!("expected dependency graph errors, got {error}");
    };
    assert!(graph_errors
        .errors
        .iter()
        .any(|e| matches!(e, DependencyGraphError::CircularDependency { .. })));
}

#[test]
fn build_reports_duplicate_binding() {
    let error = ContextBuilder::new()
        .add_instance(Settings { name: "primary" })
        .add_component::<Repository>()
        .unwrap()
        .add_component::<Repository>()
        .unwrap()
        .build()
        .unwrap_err();

    let ContextError::DependencyGraph(graph_errors) = error else {
        panic!("expected dependency graph errors, got {error}");
    };
    assert_eq!(
        graph_errors.errors,
        vec![DependencyGraphError::Duplicate(TypeInfo::of::<Repository>())]
    );
}

#[test]
fn build_reports_duplicate_instance_binding() {
    let error = ContextBuilder::new()
        .add_instance(Settings { name: "primary" })
        .add_instance(Settings { name: "secondary" })
        .build()
        .unwrap_err();

    let ContextError::DependencyGraph(graph_errors) = error else {
        panic!("expected dependency graph errors, got {error}");
    };
    assert_eq!(
        graph_errors.errors,
        vec![DependencyGraphError::Duplicate(TypeInfo::of::<Settings>())]
    );
}

struct Unconstructible;
impl Component for Unconstructible {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Unconstructible>()
            .constructor(ConstructorDescriptor::new(type_list![Settings], |_| {
                Ok(Unconstructible)
            }))
            .build()
    }
}

#[test]
fn add_component_reports_plan_errors() {
    let result = ContextBuilder::new().add_component::<Unconstructible>();

    assert_eq!(
        result.err(),
        Some(PlanError::NoUsableConstructor {
            component: TypeInfo::of::<Unconstructible>(),
        })
    );
}

#[test]
fn require_unknown_type_fails() {
    let container = ContextBuilder::new().build().unwrap();

    let error = container.require::<Settings>().unwrap_err();

    assert!(matches!(error, RequireError::TypeMissing(_)));
}

static FLAKY_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

struct Flaky;
impl Component for Flaky {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Flaky>()
            .constructor(
                ConstructorDescriptor::new(Vec::new(), |_| -> Result<Flaky, _> {
                    FLAKY_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
                    Err("unavailable".into())
                })
                .inject(),
            )
            .build()
    }
}

#[derive(Debug)]
struct DependsOnFlaky;
impl Component for DependsOnFlaky {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<DependsOnFlaky>()
            .constructor(
                ConstructorDescriptor::new(type_list![Flaky], |_| Ok(DependsOnFlaky)).inject(),
            )
            .build()
    }
}

#[test]
fn nested_construction_failure_reaches_the_caller() {
    let container = ContextBuilder::new()
        .add_component::<Flaky>()
        .unwrap()
        .add_component::<DependsOnFlaky>()
        .unwrap()
        .build()
        .unwrap();

    let error = container.require::<DependsOnFlaky>().unwrap_err();

    let RequireError::Produce(ProduceError::ComponentConstruction { component, .. }) = error
    else {
        panic!("expected a construction error, got {error}");
    };
    assert_eq!(component, TypeInfo::of::<Flaky>());
    assert_eq!(FLAKY_CONSTRUCTIONS.load(Ordering::SeqCst), 1);
}
