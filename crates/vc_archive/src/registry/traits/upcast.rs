use alloc::boxed::Box;

use crate::object::{BaseObject, Object};
use crate::registry::{FromType, TypeTrait};

/// Converts a constructed object into `Box<D>`.
///
/// `D` is usually a trait object implemented by a family of types, e.g.
/// `dyn Animal`. Every registered `T` carries the conversions to `T` itself
/// and to `dyn BaseObject`, others are declared with
/// [`TypeRegistry::register_upcast`](crate::registry::TypeRegistry::register_upcast).
///
/// # Examples
///
/// ```
/// # use vc_archive::impl_type_path;
/// # use vc_archive::object::{BaseObject, Object};
/// # use vc_archive::schema::Schema;
/// use vc_archive::registry::TypeTraitUpcast;
///
/// trait Shape {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Default)]
/// struct Square {
///     side: f64,
/// }
/// # impl_type_path!(Square => "doc::Square");
/// # impl Object for Square {
/// #     fn schema() -> Schema<Self> {
/// #         Schema::new().field("side", |s: &Square| &s.side, |s| &mut s.side)
/// #     }
/// # }
///
/// impl Shape for Square {
///     fn area(&self) -> f64 {
///         self.side * self.side
///     }
/// }
///
/// let upcast = TypeTraitUpcast::<dyn Shape>::new::<Square>(|s| s as Box<dyn Shape>);
///
/// let object: Box<dyn BaseObject> = Box::new(Square { side: 2.0 });
/// let shape = upcast.upcast(object).unwrap();
/// assert_eq!(shape.area(), 4.0);
/// ```
pub struct TypeTraitUpcast<D: ?Sized + 'static> {
    func: Box<dyn Fn(Box<dyn BaseObject>) -> Option<Box<D>> + Send + Sync>,
}

impl<D: ?Sized + 'static> TypeTraitUpcast<D> {
    /// Creates the conversion from the concrete type `T`.
    pub fn new<T: Object>(cast: fn(Box<T>) -> Box<D>) -> Self {
        Self {
            func: Box::new(move |object| object.downcast::<T>().ok().map(cast)),
        }
    }

    /// Converts the object, or returns `None` if it is not of the type
    /// this conversion was created for.
    #[inline]
    pub fn upcast(&self, object: Box<dyn BaseObject>) -> Option<Box<D>> {
        (self.func)(object)
    }
}

impl<T: Object> FromType<T> for TypeTraitUpcast<T> {
    fn from_type() -> Self {
        Self::new::<T>(|object| object)
    }
}

impl<D: ?Sized + 'static> TypeTrait for TypeTraitUpcast<D> {}
