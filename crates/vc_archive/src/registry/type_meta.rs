use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;
use core::ops::Deref;

use vc_utils::TypeIdMap;

use crate::object::{BaseObject, Object};
use crate::registry::{FromType, TypeTrait, TypeTraitFactory};
use crate::schema::ObjectSchema;
use crate::tag::TypeTag;

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime storage for one registered type, owned by the [`TypeRegistry`].
///
/// This includes the identity of the type, its [`ObjectSchema`], and a
/// [`TypeTrait`] table. A `TypeMeta` is created once, when the type is
/// registered, and never removed.
///
/// # Example
///
/// ```
/// # use vc_archive::impl_type_path;
/// # use vc_archive::object::Object;
/// # use vc_archive::schema::Schema;
/// use vc_archive::registry::{TypeRegistry, TypeTraitUpcast};
///
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
/// # impl_type_path!(Person => "app::Person");
/// # impl Object for Person {
/// #     const VERSION: u32 = 2;
/// #     fn schema() -> Schema<Self> {
/// #         Schema::new()
/// #             .field("name", |p: &Person| &p.name, |p| &mut p.name)
/// #             .field("age", |p: &Person| &p.age, |p| &mut p.age)
/// #     }
/// # }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Person>().unwrap();
///
/// let meta = registry.get_with_type_path("app::Person").unwrap();
///
/// assert_eq!(meta.type_name(), "Person");
/// assert_eq!(meta.version(), 2);
/// assert_eq!(meta.schema().flat_names(), &["name", "age"]);
/// assert!(meta.has_trait::<TypeTraitUpcast<Person>>());
/// ```
///
/// [`TypeRegistry`]: crate::registry::TypeRegistry
pub struct TypeMeta {
    tag: TypeTag,
    type_path: &'static str,
    type_name: &'static str,
    type_id: TypeId,
    version: u32,
    schema: ObjectSchema,
    // Looked up for every constructed object, kept out of the table.
    factory: TypeTraitFactory,
    trait_table: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Creates the meta of `T` with an empty trait table.
    pub(crate) fn of<T: Object>(schema: ObjectSchema) -> Self {
        Self {
            tag: T::type_tag(),
            type_path: T::type_path(),
            type_name: T::type_name(),
            type_id: TypeId::of::<T>(),
            version: T::VERSION,
            schema,
            factory: <TypeTraitFactory as FromType<T>>::from_type(),
            trait_table: TypeIdMap::new(),
        }
    }

    #[inline(always)]
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    #[inline(always)]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline(always)]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the registered [`Object::VERSION`].
    #[inline(always)]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline(always)]
    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    /// Builds a default initialized instance of the type.
    #[inline]
    pub fn construct(&self) -> Box<dyn BaseObject> {
        self.factory.construct()
    }

    /// Insert a new [`TypeTrait`], replacing an existing one of the same type.
    #[inline(always)]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.insert_trait_by_id(TypeId::of::<T>(), Box::new(data));
    }

    #[inline(never)]
    fn insert_trait_by_id(&mut self, id: TypeId, val: Box<dyn TypeTrait>) {
        self.trait_table.insert(id, val);
    }

    /// Get a [`TypeTrait`] reference, or return `None` if it doesn't exist.
    ///
    /// [`TypeTraitFactory`] is always present.
    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        let any: &dyn core::any::Any = &self.factory;
        match any.downcast_ref::<T>() {
            Some(factory) => Some(factory),
            None => self
                .get_trait_by_id(TypeId::of::<T>())
                .and_then(<dyn TypeTrait>::downcast_ref),
        }
    }

    /// Get a [`TypeTrait`] reference, or return `None` if it doesn't exist.
    pub fn get_trait_by_id(&self, type_id: TypeId) -> Option<&dyn TypeTrait> {
        self.trait_table.get(&type_id).map(Deref::deref)
    }

    /// Return true if the specific [`TypeTrait`] exists.
    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.get_trait::<T>().is_some()
    }

    /// Return the number of [`TypeTrait`] this meta holds.
    ///
    /// The factory is always present and is counted.
    #[inline]
    pub fn trait_len(&self) -> usize {
        self.trait_table.len() + 1
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("tag", &self.tag)
            .field("type_path", &self.type_path)
            .field("version", &self.version)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
