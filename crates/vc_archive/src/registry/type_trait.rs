use core::any::Any;

/// A capability attached to a registered type, stored in its [`TypeMeta`].
///
/// The table is keyed by the `TypeId` of the trait container itself, so
/// each container type appears at most once per registered type.
///
/// [`TypeMeta`]: crate::registry::TypeMeta
pub trait TypeTrait: Any + Send + Sync {}

impl dyn TypeTrait {
    /// Returns `true` if the container is of type `T`.
    #[inline]
    pub fn is<T: TypeTrait>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: TypeTrait>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }
}
