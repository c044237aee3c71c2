use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use crate::{descriptor::Component, errors::PlanError, plan::AssemblyPlan};

/// Resolved plans keyed by component type
///
/// Resolution runs outside the lock. Two threads racing on the same type may both resolve it,
/// the first plan stored wins and the other is dropped.
#[derive(Default)]
pub struct PlanCache {
    plans: Mutex<HashMap<TypeId, Arc<AssemblyPlan>>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process wide cache used by [crate::provider::ComponentProvider::new]
    pub fn global() -> &'static PlanCache {
        static GLOBAL: OnceLock<PlanCache> = OnceLock::new();
        GLOBAL.get_or_init(PlanCache::new)
    }

    /// Returns the cached plan of `T`, resolving it on first use
    ///
    /// Rejected components are not cached, every call reports the error again.
    pub fn get_or_resolve<T: Component>(&self) -> Result<Arc<AssemblyPlan>, PlanError> {
        let type_id = TypeId::of::<T>();
        if let Some(plan) = self.lock().get(&type_id) {
            return Ok(plan.clone());
        }

        let plan = Arc::new(AssemblyPlan::resolve(&T::descriptor())?);

        Ok(self.lock().entry(type_id).or_insert(plan).clone())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Plans are inserted whole, a poisoned map is still consistent
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<TypeId, Arc<AssemblyPlan>>> {
        self.plans.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ConstructorDescriptor, TypeDescriptor};

    struct Cached;
    impl Component for Cached {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Cached>()
                .constructor(ConstructorDescriptor::zero_arg(|| Cached))
                .build()
        }
    }

    struct Rejected;
    impl Component for Rejected {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Rejected>().build()
        }
    }

    #[test]
    fn plan_is_resolved_once_per_type() {
        let cache = PlanCache::new();

        let first = cache.get_or_resolve::<Cached>().unwrap();
        let second = cache.get_or_resolve::<Cached>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn rejected_components_are_not_cached() {
        let cache = PlanCache::new();

        assert!(matches!(
            cache.get_or_resolve::<Rejected>(),
            Err(PlanError::NoUsableConstructor { .. })
        ));
        assert!(cache.is_empty());
    }
}
