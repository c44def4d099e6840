use crate::object::Object;

/// Creates a [`TypeTrait`] for a concrete [`Object`] type.
///
/// [`TypeRegistry::register`] inserts the built-in traits through this,
/// [`TypeRegistry::register_type_trait`] inserts additional ones.
///
/// # Example
///
/// ```
/// # use vc_archive::impl_type_path;
/// # use vc_archive::object::Object;
/// # use vc_archive::schema::Schema;
/// use vc_archive::registry::{FromType, TypeTraitFactory};
///
/// #[derive(Default)]
/// struct Empty;
/// # impl_type_path!(Empty => "doc::Empty");
/// # impl Object for Empty {
/// #     fn schema() -> Schema<Self> { Schema::new() }
/// # }
///
/// let factory = <TypeTraitFactory as FromType<Empty>>::from_type();
/// assert!(factory.construct().is::<Empty>());
/// ```
///
/// [`TypeTrait`]: crate::registry::TypeTrait
/// [`TypeRegistry::register`]: crate::registry::TypeRegistry::register
/// [`TypeRegistry::register_type_trait`]: crate::registry::TypeRegistry::register_type_trait
pub trait FromType<T: Object> {
    fn from_type() -> Self;
}
