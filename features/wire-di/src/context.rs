use crate::{
    errors::ProduceError,
    types::{Instance, TypeInfo},
};

/// Supplies dependency instances by type
///
/// The context decides whether a request is answered with an existing instance or a newly
/// produced one. Providers only ever ask it for types listed in their dependencies.
pub trait Context {
    /// Returns `Ok(None)` if the context does not know the type, and an error if it knows the
    /// type but producing it failed.
    fn get(&self, info: TypeInfo) -> Result<Option<Instance>, ProduceError>;
}

impl<C: Context + ?Sized> Context for &C {
    fn get(&self, info: TypeInfo) -> Result<Option<Instance>, ProduceError> {
        (**self).get(info)
    }
}
