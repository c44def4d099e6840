//! The capability shared by every archivable type.
//!
//! - [`Object`]: the static side, implemented by users (version, tag, field schema).
//! - [`BaseObject`]: the object safe side, blanket implemented for every [`Object`].
//!
//! Archives are written from and read into `dyn BaseObject`, which lets a value
//! held through a base handle be rebuilt as its exact concrete type.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::schema::Schema;
use crate::tag::{TypePath, TypeTag};

// -----------------------------------------------------------------------------
// Object

/// A concrete type that can be registered and archived.
///
/// [`Default`] provides the blank instance that deserialization fills in,
/// [`schema`](Object::schema) the ordered field list.
///
/// # Examples
///
/// ```
/// use vc_archive::impl_type_path;
/// use vc_archive::object::Object;
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
/// ```
pub trait Object: TypePath + Default + Send + Sync + Sized {
    /// The single version tag of this type, checked when reading.
    const VERSION: u32 = 0;

    /// Returns the stable tag of the type.
    ///
    /// Derived from [`TypePath::type_path`] unless overridden.
    fn type_tag() -> TypeTag {
        TypeTag::from_path(Self::type_path())
    }

    /// Returns the field list, base chain first.
    ///
    /// Called once when the type is registered.
    fn schema() -> Schema<Self>;
}

// -----------------------------------------------------------------------------
// BaseObject

/// The object safe capability set: report the tag and give `Any` access.
///
/// Field enumeration goes through the [`TypeMeta`](crate::registry::TypeMeta)
/// registered for the tag.
pub trait BaseObject: Any + Send + Sync {
    /// Returns the [`TypeTag`] of the concrete type.
    fn object_tag(&self) -> TypeTag;

    /// Returns the [`TypePath`] of the concrete type.
    fn object_path(&self) -> &'static str;

    /// Returns the [`Object::VERSION`] of the concrete type.
    fn object_version(&self) -> u32;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Object> BaseObject for T {
    #[inline]
    fn object_tag(&self) -> TypeTag {
        T::type_tag()
    }

    #[inline]
    fn object_path(&self) -> &'static str {
        T::type_path()
    }

    #[inline]
    fn object_version(&self) -> u32 {
        T::VERSION
    }

    #[inline(always)]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline(always)]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline(always)]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn BaseObject {
    /// Returns the [`TypeId`] of the concrete type.
    #[inline]
    pub fn concrete_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Returns `true` if the concrete type is `T`.
    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Takes the concrete value out of the box.
    #[inline]
    pub fn downcast<T: Object>(self: Box<Self>) -> Result<Box<T>, Box<dyn Any>> {
        self.into_any().downcast::<T>()
    }
}

impl fmt::Debug for dyn BaseObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseObject")
            .field("type_path", &self.object_path())
            .field("tag", &self.object_tag())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::{BaseObject, Object};
    use crate::schema::Schema;
    use crate::tag::{TypePath, TypeTag};

    #[derive(Default, Debug, PartialEq)]
    struct Circle {
        radius: u32,
    }

    crate::impl_type_path!(Circle => "shapes::Circle");

    impl Object for Circle {
        const VERSION: u32 = 3;

        fn schema() -> Schema<Self> {
            Schema::new().field("radius", |c: &Circle| &c.radius, |c| &mut c.radius)
        }
    }

    #[derive(Default)]
    struct Label {
        text: String,
    }

    crate::impl_type_path!(Label => "shapes::Label");

    impl Object for Label {
        fn type_tag() -> TypeTag {
            TypeTag::new(7)
        }

        fn schema() -> Schema<Self> {
            Schema::new().field("text", |l: &Label| &l.text, |l| &mut l.text)
        }
    }

    #[test]
    fn reports_concrete_identity() {
        let object: Box<dyn BaseObject> = Box::new(Circle { radius: 2 });

        assert_eq!(object.object_path(), "shapes::Circle");
        assert_eq!(object.object_tag(), TypeTag::from_path(Circle::type_path()));
        assert_eq!(object.object_version(), 3);
        assert!(object.is::<Circle>());
        assert!(!object.is::<Label>());
    }

    #[test]
    fn pinned_tag() {
        let object: &dyn BaseObject = &Label::default();
        assert_eq!(object.object_tag(), TypeTag::new(7));
    }

    #[test]
    fn downcast_round() {
        let mut object: Box<dyn BaseObject> = Box::new(Circle { radius: 2 });

        if let Some(circle) = object.downcast_mut::<Circle>() {
            circle.radius = 5;
        }
        assert_eq!(object.downcast_ref::<Circle>(), Some(&Circle { radius: 5 }));

        let circle = object.downcast::<Circle>().ok();
        assert_eq!(circle.map(|c| c.radius), Some(5));
    }
}
