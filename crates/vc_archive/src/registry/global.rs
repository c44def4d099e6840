use std::sync::LazyLock;

use crate::error::RegisterError;
use crate::object::Object;
use crate::registry::{TypeRegistry, TypeRegistryArc};
use crate::tag::TypeTag;

static GLOBAL_REGISTRY: LazyLock<TypeRegistryArc> = LazyLock::new(|| {
    let mut registry = TypeRegistry::new();
    // Two submitted types sharing a tag is a build mistake, not a runtime condition.
    if let Err(err) = registry.auto_register() {
        panic!("Failed to auto register archivable types: {err}");
    }
    TypeRegistryArc::new(registry)
});

/// Returns the process wide registry.
///
/// It is created on first use and holds every type submitted with
/// [`auto_register!`](crate::auto_register).
///
/// # Panics
///
/// On first use, if two submitted types collide.
#[inline]
pub fn global_registry() -> &'static TypeRegistryArc {
    &GLOBAL_REGISTRY
}

/// Registers `T` in the [global registry](global_registry).
///
/// See [`TypeRegistry::register`].
pub fn register_type<T: Object>() -> Result<(), RegisterError> {
    global_registry().write().register::<T>()
}

/// Returns the [`TypeTag`] of `T`, without an instance.
///
/// # Examples
///
/// ```
/// # use vc_archive::impl_type_path;
/// # use vc_archive::object::Object;
/// # use vc_archive::schema::Schema;
/// use vc_archive::registry::object_type;
///
/// #[derive(Default)]
/// struct Ping;
/// # impl_type_path!(Ping => "doc::Ping");
/// # impl Object for Ping {
/// #     fn schema() -> Schema<Self> { Schema::new() }
/// # }
///
/// assert_eq!(object_type::<Ping>(), object_type::<Ping>());
/// ```
#[inline]
pub fn object_type<T: Object>() -> TypeTag {
    T::type_tag()
}
