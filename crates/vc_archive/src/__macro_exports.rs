//! Items used by exported macros. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::error::RegisterError;
    use crate::object::Object;
    use crate::registry::TypeRegistry;
    use crate::schema::Schema;

    /// A registration function collected at link time.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry) -> Result<(), RegisterError>);

    inventory::collect!(__AutoRegisterFunc);

    /// Registered only if `inventory` works on the current platform.
    #[derive(Default)]
    pub struct __AvailFlag;

    crate::impl_type_path!(__AvailFlag => "vc_archive::__macro_exports::auto_register::__AvailFlag");

    impl Object for __AvailFlag {
        fn schema() -> Schema<Self> {
            Schema::new()
        }
    }

    inventory::submit! {
        __AutoRegisterFunc(TypeRegistry::register::<__AvailFlag>)
    }

    pub fn __register_types(registry: &mut TypeRegistry) -> Result<(), RegisterError> {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry)?;
        }
        Ok(())
    }
}

/// Submits types to [`TypeRegistry::auto_register`] at link time.
///
/// Only non-generic types can be submitted. The global registry runs the
/// auto registration on first use.
///
/// This macro does nothing if the `auto_register` feature is disabled.
///
/// # Examples
///
/// ```
/// use vc_archive::object::Object;
/// use vc_archive::registry::TypeRegistry;
/// use vc_archive::schema::Schema;
/// use vc_archive::{auto_register, impl_type_path};
///
/// #[derive(Default)]
/// struct Marker;
///
/// impl_type_path!(Marker => "doc::Marker");
///
/// impl Object for Marker {
///     fn schema() -> Schema<Self> {
///         Schema::new()
///     }
/// }
///
/// auto_register!(Marker);
///
/// let mut registry = TypeRegistry::new();
/// if registry.auto_register().unwrap() {
///     assert!(registry.contains_type::<Marker>());
/// }
/// ```
///
/// [`TypeRegistry::auto_register`]: crate::registry::TypeRegistry::auto_register
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        const _: () = {
            $(
                $crate::__macro_exports::auto_register::inventory::submit! {
                    $crate::__macro_exports::auto_register::__AutoRegisterFunc(
                        $crate::registry::TypeRegistry::register::<$ty>
                    )
                }
            )+
        };
    };
}

/// Submits types to [`TypeRegistry::auto_register`] at link time.
///
/// The `auto_register` feature is disabled, so this does nothing.
///
/// [`TypeRegistry::auto_register`]: crate::registry::TypeRegistry::auto_register
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {};
}
