use std::{error::Error, sync::Arc};

use tracing_subscriber::EnvFilter;
use wire_di::{
    type_list, Component, ConstructorDescriptor, ContextBuilder, FieldDescriptor,
    MethodDescriptor, TypeDescriptor,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = ContextBuilder::new()
        .add_instance("test".to_string())
        .add_component::<Greeter>()?
        .add_component::<Test>()?
        .build()?;

    println!("{:?}", app);
    let t = app.require::<Test>()?;
    println!("{}", t.greeting);
    Ok(())
}

struct Greeter {
    name: Arc<String>,
}
impl Component for Greeter {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Greeter>()
            .constructor(
                ConstructorDescriptor::new(type_list![String], |args| {
                    Ok(Greeter { name: args.next()? })
                })
                .inject(),
            )
            .build()
    }
}

#[derive(Default)]
struct Test {
    greeter: Option<Arc<Greeter>>,
    greeting: String,
}
impl Component for Test {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Test>()
            .constructor(ConstructorDescriptor::zero_arg(Test::default))
            .field(
                FieldDescriptor::new("greeter", |t: &mut Test, greeter: Arc<Greeter>| {
                    t.greeter = Some(greeter)
                })
                .inject(),
            )
            .method(
                MethodDescriptor::new("greet", type_list![String], |t: &mut Test, args| {
                    let greeter = t.greeter.as_ref().ok_or("greeter is not injected")?;
                    t.greeting = format!("hello {}, from {}", args.next::<String>()?, greeter.name);
                    Ok(())
                })
                .inject(),
            )
            .build()
    }
}
