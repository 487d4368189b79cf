//! Schema cache keyed by type identity.
//!
//! Registering `T` records its schema once and makes `T` resolvable along
//! with one level of indirection: `Option<T>`, `Box<T>`, `Arc<T>` and the
//! nullable pointers `Option<Box<T>>` / `Option<Arc<T>>`. Anything else
//! resolves to nothing, which the engine treats as "not a struct, nothing
//! to validate".

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;

use crate::schema::{StructSchema, Validate};

type View = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Validate>;

#[derive(Clone)]
struct Entry {
    schema: Arc<StructSchema>,
    view: View,
}

/// A `#[derive(Validate)]` registration collected through [`inventory`].
///
/// Generic structs cannot be submitted statically; register those with
/// [`SchemaRegistry::register`] at startup.
pub struct SchemaRegistration {
    register: fn(&SchemaRegistry),
}

impl SchemaRegistration {
    #[must_use]
    pub const fn of<T: Validate>() -> Self {
        Self {
            register: SchemaRegistry::register::<T>,
        }
    }
}

inventory::collect!(SchemaRegistration);

fn view_direct<T: Validate>(value: &dyn Any) -> Option<&dyn Validate> {
    value.downcast_ref::<T>().map(|v| v as &dyn Validate)
}

fn view_option<T: Validate>(value: &dyn Any) -> Option<&dyn Validate> {
    value
        .downcast_ref::<Option<T>>()?
        .as_ref()
        .map(|v| v as &dyn Validate)
}

fn view_box<T: Validate>(value: &dyn Any) -> Option<&dyn Validate> {
    value
        .downcast_ref::<Box<T>>()
        .map(|v| v.as_ref() as &dyn Validate)
}

fn view_arc<T: Validate>(value: &dyn Any) -> Option<&dyn Validate> {
    value
        .downcast_ref::<Arc<T>>()
        .map(|v| v.as_ref() as &dyn Validate)
}

fn view_option_box<T: Validate>(value: &dyn Any) -> Option<&dyn Validate> {
    value
        .downcast_ref::<Option<Box<T>>>()?
        .as_deref()
        .map(|v| v as &dyn Validate)
}

fn view_option_arc<T: Validate>(value: &dyn Any) -> Option<&dyn Validate> {
    value
        .downcast_ref::<Option<Arc<T>>>()?
        .as_deref()
        .map(|v| v as &dyn Validate)
}

/// Concurrent `TypeId` → schema map.
#[derive(Default)]
pub struct SchemaRegistry {
    entries: DashMap<TypeId, Entry>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every [`SchemaRegistration`] in the inventory.
    #[must_use]
    pub fn from_inventory() -> Self {
        let registry = Self::new();
        for registration in inventory::iter::<SchemaRegistration> {
            (registration.register)(&registry);
        }
        tracing::debug!(types = registry.entries.len(), "validation schemas registered");
        registry
    }

    /// Record `T`'s schema. Registering the same type again is a no-op.
    pub fn register<T: Validate>(&self) {
        if self.entries.contains_key(&TypeId::of::<T>()) {
            return;
        }
        let schema = Arc::new(T::schema());
        let views: [(TypeId, View); 6] = [
            (TypeId::of::<T>(), view_direct::<T>),
            (TypeId::of::<Option<T>>(), view_option::<T>),
            (TypeId::of::<Box<T>>(), view_box::<T>),
            (TypeId::of::<Arc<T>>(), view_arc::<T>),
            (TypeId::of::<Option<Box<T>>>(), view_option_box::<T>),
            (TypeId::of::<Option<Arc<T>>>(), view_option_arc::<T>),
        ];
        for (id, view) in views {
            self.entries.entry(id).or_insert_with(|| Entry {
                schema: Arc::clone(&schema),
                view,
            });
        }
    }

    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Schema and struct view for `value`, dereferencing at most one level.
    ///
    /// Returns `None` for unregistered types and for `None` optionals.
    #[must_use]
    pub fn resolve<'a>(&self, value: &'a dyn Any) -> Option<(Arc<StructSchema>, &'a dyn Validate)> {
        let entry = self.entries.get(&value.type_id()).map(|e| e.value().clone())?;
        (entry.view)(value).map(|target| (entry.schema, target))
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("entries", &self.entries.len())
            .finish()
    }
}
