use alloc::boxed::Box;
use core::any::TypeId;

use vc_utils::TypeIdMap;
use vc_utils::hash::{HashMap, NoOpHashMap};

use crate::error::{ArchiveError, RegisterError, UnregisteredRef};
use crate::object::{BaseObject, Object};
use crate::registry::{FromType, TypeMeta, TypeTrait, TypeTraitUpcast};
use crate::tag::TypeTag;

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of archivable types.
///
/// This is the central store of type information: it maps every [`TypeTag`]
/// (and type path, and [`TypeId`]) to the [`TypeMeta`] used to rebuild an
/// object of that type from an archive.
///
/// # Example
///
/// ```
/// use vc_archive::impl_type_path;
/// use vc_archive::object::Object;
/// use vc_archive::registry::TypeRegistry;
/// use vc_archive::schema::Schema;
///
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// impl_type_path!(Person => "app::Person");
///
/// impl Object for Person {
///     fn schema() -> Schema<Self> {
///         Schema::new()
///             .field("name", |p: &Person| &p.name, |p| &mut p.name)
///             .field("age", |p: &Person| &p.age, |p| &mut p.age)
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Person>().unwrap();
///
/// let object = registry.construct(Person::type_tag()).unwrap();
/// assert!(object.is::<Person>());
/// ```
pub struct TypeRegistry {
    type_meta_table: NoOpHashMap<TypeTag, TypeMeta>,
    type_id_to_tag: TypeIdMap<TypeTag>,
    type_path_to_tag: HashMap<&'static str, TypeTag>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty [`TypeRegistry`].
    #[inline]
    pub fn new() -> Self {
        Self {
            type_meta_table: NoOpHashMap::default(),
            type_id_to_tag: TypeIdMap::new(),
            type_path_to_tag: HashMap::default(),
        }
    }

    // Fails if a type other than `T` owns the tag or the path of `T`.
    fn check_vacant<T: Object>(&self, tag: TypeTag) -> Result<(), RegisterError> {
        let incoming = T::type_path();

        let existing = match self.type_meta_table.get(&tag) {
            Some(meta) => Some((tag, meta.type_path())),
            None => self
                .type_path_to_tag
                .get(incoming)
                .map(|owner| (*owner, incoming)),
        };

        match existing {
            None => Ok(()),
            Some((tag, existing)) => {
                log::error!("Failed to register `{incoming}`: tag `{tag}` is owned by `{existing}`");
                Err(RegisterError::DuplicateTagCollision {
                    tag,
                    existing,
                    incoming,
                })
            }
        }
    }

    /// Registers the type `T` if it has not yet been registered already.
    ///
    /// The base and nested types named by [`Object::schema`] are registered
    /// first. Registering the same type again is a cheap no-op.
    ///
    /// Every registration carries a [`TypeTraitFactory`](crate::registry::TypeTraitFactory)
    /// and the [`TypeTraitUpcast`] conversions to `T` and to `dyn BaseObject`.
    ///
    /// # Errors
    ///
    /// - [`RegisterError::DuplicateTagCollision`] if another type already
    ///   owns the tag or the type path of `T`. Nothing is overwritten.
    /// - [`RegisterError::InvalidSchema`] if the field list is malformed.
    ///
    /// # Example
    ///
    /// ```
    /// # use vc_archive::impl_type_path;
    /// # use vc_archive::object::Object;
    /// # use vc_archive::schema::Schema;
    /// use vc_archive::registry::TypeRegistry;
    ///
    /// #[derive(Default)]
    /// struct Unit;
    /// # impl_type_path!(Unit => "doc::Unit");
    /// # impl Object for Unit {
    /// #     fn schema() -> Schema<Self> { Schema::new() }
    /// # }
    ///
    /// let mut registry = TypeRegistry::new();
    ///
    /// assert!(registry.register::<Unit>().is_ok());
    /// assert!(registry.register::<Unit>().is_ok());
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn register<T: Object>(&mut self) -> Result<(), RegisterError> {
        if self.type_id_to_tag.contains_type::<T>() {
            log::debug!("`{}` is already registered", T::type_path());
            return Ok(());
        }

        let tag = T::type_tag();
        self.check_vacant::<T>(tag)?;

        let schema = T::schema().build(self)?;
        // Dependencies may have claimed the tag in the meantime.
        self.check_vacant::<T>(tag)?;

        let mut meta = TypeMeta::of::<T>(schema);
        meta.insert_trait(<TypeTraitUpcast<T> as FromType<T>>::from_type());
        meta.insert_trait(TypeTraitUpcast::<dyn BaseObject>::new::<T>(|object| {
            object as Box<dyn BaseObject>
        }));

        self.type_id_to_tag.insert_type::<T>(tag);
        self.type_path_to_tag.insert(T::type_path(), tag);
        self.type_meta_table.insert(tag, meta);

        log::debug!("Registered `{}` with tag `{tag}`", T::type_path());
        Ok(())
    }

    /// Declares that `T` may be handed out as `Box<D>`.
    ///
    /// After this, [`ObjectSerializer::deserialize::<D>`] accepts archives of
    /// `T`. Redeclaring the same pair replaces the conversion.
    ///
    /// # Errors
    ///
    /// [`RegisterError::NotRegistered`] if `T` is not registered.
    ///
    /// # Example
    ///
    /// ```
    /// # use vc_archive::impl_type_path;
    /// # use vc_archive::object::Object;
    /// # use vc_archive::schema::Schema;
    /// use vc_archive::registry::{TypeRegistry, TypeTraitUpcast};
    ///
    /// trait Animal: Send + Sync {
    ///     fn name(&self) -> &str;
    /// }
    ///
    /// #[derive(Default)]
    /// struct Dog;
    /// # impl_type_path!(Dog => "zoo::Dog");
    /// # impl Object for Dog {
    /// #     fn schema() -> Schema<Self> { Schema::new() }
    /// # }
    ///
    /// impl Animal for Dog {
    ///     fn name(&self) -> &str {
    ///         "dog"
    ///     }
    /// }
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register::<Dog>().unwrap();
    /// registry.register_upcast::<Dog, dyn Animal>(|dog| dog as Box<dyn Animal>).unwrap();
    ///
    /// let meta = registry.get_with_type_path("zoo::Dog").unwrap();
    /// assert!(meta.has_trait::<TypeTraitUpcast<dyn Animal>>());
    /// ```
    ///
    /// [`ObjectSerializer::deserialize::<D>`]: crate::serializer::ObjectSerializer::deserialize
    pub fn register_upcast<T: Object, D: ?Sized + 'static>(
        &mut self,
        cast: fn(Box<T>) -> Box<D>,
    ) -> Result<(), RegisterError> {
        let Some(meta) = self.get_mut(TypeId::of::<T>()) else {
            return Err(RegisterError::NotRegistered {
                type_path: T::type_path(),
            });
        };

        if meta.has_trait::<TypeTraitUpcast<D>>() {
            log::warn!(
                "Upcast of `{}` to `{}` is redeclared",
                T::type_path(),
                core::any::type_name::<D>(),
            );
        }
        meta.insert_trait(TypeTraitUpcast::<D>::new::<T>(cast));
        Ok(())
    }

    /// Inserts an additional [`TypeTrait`] `D` for the registered type `T`.
    ///
    /// # Errors
    ///
    /// [`RegisterError::NotRegistered`] if `T` is not registered.
    pub fn register_type_trait<T: Object, D: TypeTrait + FromType<T>>(
        &mut self,
    ) -> Result<(), RegisterError> {
        match self.get_mut(TypeId::of::<T>()) {
            Some(meta) => {
                meta.insert_trait(D::from_type());
                Ok(())
            }
            None => Err(RegisterError::NotRegistered {
                type_path: T::type_path(),
            }),
        }
    }

    /// Registers every type submitted with [`auto_register!`](crate::auto_register).
    ///
    /// This method is equivalent to calling [`register`](Self::register) for
    /// each submitted type. Repeated calls are cheap and will not insert
    /// duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `Ok(true)` if automatic registration works on the current
    /// platform, otherwise `Ok(false)`.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it
    /// does nothing and returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// The first error of [`register`](Self::register), e.g. a tag collision
    /// between two submitted types.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> Result<bool, RegisterError> {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;
            // Reduce the cost of duplicate registrations.
            if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
                return Ok(true);
            }
            auto_register::__register_types(self)?;
            Ok(self.contains(TypeId::of::<auto_register::__AvailFlag>()))
        }

        #[cfg(not(feature = "auto_register"))]
        Ok(false)
    }

    /// Whether the type with given [`TypeId`] has been registered in this registry.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_id_to_tag.contains(&type_id)
    }

    /// Whether the type `T` has been registered in this registry.
    #[inline]
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.type_id_to_tag.contains_type::<T>()
    }

    /// Whether a type with the given tag has been registered in this registry.
    #[inline]
    pub fn contains_tag(&self, tag: TypeTag) -> bool {
        self.type_meta_table.contains_key(&tag)
    }

    /// Returns the [`TypeMeta`] of the type with the given [`TypeTag`].
    #[inline]
    pub fn get_with_tag(&self, tag: TypeTag) -> Option<&TypeMeta> {
        self.type_meta_table.get(&tag)
    }

    /// Returns the [`TypeMeta`] of the type with the given [`TypeId`].
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        match self.type_id_to_tag.get(&type_id) {
            Some(tag) => self.get_with_tag(*tag),
            None => None,
        }
    }

    fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        match self.type_id_to_tag.get(&type_id) {
            Some(tag) => self.type_meta_table.get_mut(tag),
            None => None,
        }
    }

    /// Returns the [`TypeMeta`] of the type with the given [type path].
    ///
    /// [type path]: crate::tag::TypePath::type_path
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_tag.get(type_path) {
            Some(tag) => self.get_with_tag(*tag),
            None => None,
        }
    }

    /// Returns a reference to the [`TypeTrait`] of type `T` of the type with
    /// the given [`TypeId`].
    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        match self.get(type_id) {
            Some(meta) => meta.get_trait::<T>(),
            None => None,
        }
    }

    /// Builds a default initialized instance of the type with the given tag.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::UnregisteredType`] if no type owns the tag.
    pub fn construct(&self, tag: TypeTag) -> Result<Box<dyn BaseObject>, ArchiveError> {
        match self.get_with_tag(tag) {
            Some(meta) => Ok(meta.construct()),
            None => Err(ArchiveError::UnregisteredType(UnregisteredRef::Tag(tag))),
        }
    }

    /// Returns an iterator over the [`TypeMeta`]s of the registered types.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.type_path_to_tag.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared [`TypeRegistry`], read-locked for archiving and write-locked for
/// registration.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Wraps an existing registry.
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.read().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests
