use alloc::boxed::Box;

use crate::object::{BaseObject, Object};
use crate::registry::{FromType, TypeTrait};

/// Builds a default initialized instance of a registered type.
///
/// Deserialization constructs the blank object through this, then fills in
/// its fields.
///
/// # Examples
///
/// ```
/// # use vc_archive::impl_type_path;
/// # use vc_archive::object::Object;
/// # use vc_archive::schema::Schema;
/// use vc_archive::registry::{TypeRegistry, TypeTraitFactory};
///
/// #[derive(Default)]
/// struct Counter {
///     count: u32,
/// }
/// # impl_type_path!(Counter => "doc::Counter");
/// # impl Object for Counter {
/// #     fn schema() -> Schema<Self> {
/// #         Schema::new().field("count", |c: &Counter| &c.count, |c| &mut c.count)
/// #     }
/// # }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Counter>().unwrap();
///
/// let factory = registry
///     .get_with_type_path("doc::Counter").unwrap()
///     .get_trait::<TypeTraitFactory>().unwrap();
///
/// let counter = factory.construct().downcast::<Counter>().ok().unwrap();
/// assert_eq!(counter.count, 0);
/// ```
#[derive(Clone, Copy)]
pub struct TypeTraitFactory {
    func: fn() -> Box<dyn BaseObject>,
}

impl TypeTraitFactory {
    /// Calls the [`Default`] of the registered type.
    #[inline(always)]
    pub fn construct(&self) -> Box<dyn BaseObject> {
        (self.func)()
    }
}

impl<T: Object> FromType<T> for TypeTraitFactory {
    fn from_type() -> Self {
        Self {
            func: || Box::<T>::default(),
        }
    }
}

impl TypeTrait for TypeTraitFactory {}
