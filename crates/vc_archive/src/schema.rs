//! Data driven field lists.
//!
//! Every [`Object`] describes its fields once, at registration time, as an
//! ordered list of `(name, accessor, mutator)` descriptors:
//!
//! - [`Schema::base`]: the embedded base object, traversed first.
//! - [`Schema::field`]: a [`Primitive`] value.
//! - [`Schema::nested`]: an embedded object, archived without its own tag.
//! - [`Schema::polymorphic`]: an `Option<Box<dyn BaseObject>>` member, archived with its tag.
//!
//! The typed [`Schema<T>`] is erased into an [`ObjectSchema`] stored in the
//! type's [`TypeMeta`](crate::registry::TypeMeta).

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use serde_core::de::Error as _;

use crate::codec::Primitive;
use crate::error::RegisterError;
use crate::object::{BaseObject, Object};
use crate::registry::TypeRegistry;
use crate::tag::{TypePath, TypeTag};

// -----------------------------------------------------------------------------
// Erased accessors

pub(crate) type GetObject =
    Box<dyn for<'a> Fn(&'a dyn BaseObject) -> Option<&'a dyn BaseObject> + Send + Sync>;

pub(crate) type GetObjectMut =
    Box<dyn for<'a> Fn(&'a mut dyn BaseObject) -> Option<&'a mut dyn BaseObject> + Send + Sync>;

pub(crate) type GetMember =
    Box<dyn for<'a> Fn(&'a dyn BaseObject) -> Option<Option<&'a dyn BaseObject>> + Send + Sync>;

pub(crate) type GetMemberMut = Box<
    dyn for<'a> Fn(&'a mut dyn BaseObject) -> Option<&'a mut Option<Box<dyn BaseObject>>>
        + Send
        + Sync,
>;

pub(crate) type WriteValue =
    Box<dyn for<'a> Fn(&'a dyn BaseObject) -> Option<&'a dyn erased_serde::Serialize> + Send + Sync>;

pub(crate) type ReadValue = Box<
    dyn for<'de> Fn(
            &mut dyn BaseObject,
            &mut dyn erased_serde::Deserializer<'de>,
        ) -> Result<(), erased_serde::Error>
        + Send
        + Sync,
>;

type RegisterFn = fn(&mut TypeRegistry) -> Result<(), RegisterError>;

// Closures only get higher-ranked signatures when passed to a bound like these.

fn get_object<F>(f: F) -> GetObject
where
    F: for<'a> Fn(&'a dyn BaseObject) -> Option<&'a dyn BaseObject> + Send + Sync + 'static,
{
    Box::new(f)
}

fn get_object_mut<F>(f: F) -> GetObjectMut
where
    F: for<'a> Fn(&'a mut dyn BaseObject) -> Option<&'a mut dyn BaseObject>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

fn get_member<F>(f: F) -> GetMember
where
    F: for<'a> Fn(&'a dyn BaseObject) -> Option<Option<&'a dyn BaseObject>>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

fn get_member_mut<F>(f: F) -> GetMemberMut
where
    F: for<'a> Fn(&'a mut dyn BaseObject) -> Option<&'a mut Option<Box<dyn BaseObject>>>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

fn write_value<F>(f: F) -> WriteValue
where
    F: for<'a> Fn(&'a dyn BaseObject) -> Option<&'a dyn erased_serde::Serialize>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

fn read_value<F>(f: F) -> ReadValue
where
    F: for<'de> Fn(
            &mut dyn BaseObject,
            &mut dyn erased_serde::Deserializer<'de>,
        ) -> Result<(), erased_serde::Error>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

// -----------------------------------------------------------------------------
// FieldDescriptor

/// The kind of a [`FieldDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The embedded base object with the given tag.
    Base(TypeTag),
    /// A primitive value.
    Value,
    /// An embedded object with the given tag, archived without a tag.
    Nested(TypeTag),
    /// An optional boxed object of any registered type, archived with its tag.
    Polymorphic,
}

pub(crate) enum FieldAccess {
    Base {
        get: GetObject,
        get_mut: GetObjectMut,
    },
    Value {
        write: WriteValue,
        read: ReadValue,
    },
    Nested {
        get: GetObject,
        get_mut: GetObjectMut,
    },
    Polymorphic {
        get: GetMember,
        get_mut: GetMemberMut,
    },
}

/// One entry of an [`ObjectSchema`].
pub struct FieldDescriptor {
    name: &'static str,
    kind: FieldKind,
    pub(crate) access: FieldAccess,
}

impl FieldDescriptor {
    /// Returns the field name; base entries are named after the base type.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Schema

/// Builder for the ordered field list of `T`.
///
/// The base object, if any, must be declared first. Field names must be
/// unique identifiers, they are written as keys by the text format.
///
/// # Examples
///
/// ```
/// use vc_archive::impl_type_path;
/// use vc_archive::object::{BaseObject, Object};
/// use vc_archive::schema::Schema;
///
/// #[derive(Default)]
/// struct Animal {
///     name: String,
/// }
///
/// #[derive(Default)]
/// struct Dog {
///     animal: Animal,
///     good: bool,
///     friend: Option<Box<dyn BaseObject>>,
/// }
///
/// impl_type_path!(Animal => "zoo::Animal");
/// impl_type_path!(Dog => "zoo::Dog");
///
/// impl Object for Animal {
///     fn schema() -> Schema<Self> {
///         Schema::new().field("name", |a: &Animal| &a.name, |a| &mut a.name)
///     }
/// }
///
/// impl Object for Dog {
///     fn schema() -> Schema<Self> {
///         Schema::new()
///             .base(|d: &Dog| &d.animal, |d| &mut d.animal)
///             .field("good", |d: &Dog| &d.good, |d| &mut d.good)
///             .polymorphic("friend", |d: &Dog| &d.friend, |d| &mut d.friend)
///     }
/// }
/// ```
pub struct Schema<T> {
    fields: Vec<FieldDescriptor>,
    dependencies: Vec<RegisterFn>,
    problem: Option<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Object> Default for Schema<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Object> Schema<T> {
    /// Creates an empty field list.
    #[inline]
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            dependencies: Vec::new(),
            problem: None,
            _marker: PhantomData,
        }
    }

    /// Declares the embedded base object `B`, whose fields are archived
    /// before the fields of `T`.
    ///
    /// `B` is registered together with `T`.
    pub fn base<B: Object>(mut self, get: fn(&T) -> &B, get_mut: fn(&mut T) -> &mut B) -> Self {
        if !self.fields.is_empty() {
            self.report(format!("base `{}` must be declared first", B::type_path()));
        }
        self.dependencies.push(TypeRegistry::register::<B>);
        self.fields.push(FieldDescriptor {
            name: B::type_name(),
            kind: FieldKind::Base(B::type_tag()),
            access: FieldAccess::Base {
                get: get_object(move |obj| {
                    obj.downcast_ref::<T>().map(|t| get(t) as &dyn BaseObject)
                }),
                get_mut: get_object_mut(move |obj| {
                    obj.downcast_mut::<T>().map(|t| get_mut(t) as &mut dyn BaseObject)
                }),
            },
        });
        self
    }

    /// Declares a primitive field.
    pub fn field<V: Primitive>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        self.check_name(name);
        self.fields.push(FieldDescriptor {
            name,
            kind: FieldKind::Value,
            access: FieldAccess::Value {
                write: write_value(move |obj| {
                    obj.downcast_ref::<T>()
                        .map(|t| get(t) as &dyn erased_serde::Serialize)
                }),
                read: read_value(move |obj, deserializer| match obj.downcast_mut::<T>() {
                    Some(target) => {
                        *get_mut(target) = erased_serde::deserialize::<V>(deserializer)?;
                        Ok(())
                    }
                    None => Err(erased_serde::Error::custom(format!(
                        "field of `{}` applied to `{}`",
                        T::type_path(),
                        obj.object_path(),
                    ))),
                }),
            },
        });
        self
    }

    /// Declares an embedded object, archived without a tag.
    ///
    /// `O` is registered together with `T`.
    pub fn nested<O: Object>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &O,
        get_mut: fn(&mut T) -> &mut O,
    ) -> Self {
        self.check_name(name);
        self.dependencies.push(TypeRegistry::register::<O>);
        self.fields.push(FieldDescriptor {
            name,
            kind: FieldKind::Nested(O::type_tag()),
            access: FieldAccess::Nested {
                get: get_object(move |obj| {
                    obj.downcast_ref::<T>().map(|t| get(t) as &dyn BaseObject)
                }),
                get_mut: get_object_mut(move |obj| {
                    obj.downcast_mut::<T>().map(|t| get_mut(t) as &mut dyn BaseObject)
                }),
            },
        });
        self
    }

    /// Declares an optional member of any registered type.
    ///
    /// The member is archived with its own tag, its type must be registered
    /// before it is archived.
    pub fn polymorphic(
        mut self,
        name: &'static str,
        get: fn(&T) -> &Option<Box<dyn BaseObject>>,
        get_mut: fn(&mut T) -> &mut Option<Box<dyn BaseObject>>,
    ) -> Self {
        self.check_name(name);
        self.fields.push(FieldDescriptor {
            name,
            kind: FieldKind::Polymorphic,
            access: FieldAccess::Polymorphic {
                get: get_member(move |obj| obj.downcast_ref::<T>().map(|t| get(t).as_deref())),
                get_mut: get_member_mut(move |obj| obj.downcast_mut::<T>().map(get_mut)),
            },
        });
        self
    }

    fn check_name(&mut self, name: &'static str) {
        if !is_identifier(name) {
            self.report(format!("field name `{name}` is not an identifier"));
        } else if self
            .fields
            .iter()
            .any(|f| f.name == name && !matches!(f.kind, FieldKind::Base(_)))
        {
            self.report(format!("field `{name}` is declared twice"));
        }
    }

    fn report(&mut self, problem: String) {
        // Keep the first problem, later ones are usually consequences.
        self.problem.get_or_insert(problem);
    }

    /// Registers the base and nested types, then erases the schema.
    pub(crate) fn build(self, registry: &mut TypeRegistry) -> Result<ObjectSchema, RegisterError> {
        if let Some(reason) = self.problem {
            return Err(RegisterError::InvalidSchema {
                type_path: T::type_path(),
                reason,
            });
        }

        for register in &self.dependencies {
            register(registry)?;
        }

        let mut names = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            match field.kind {
                FieldKind::Base(tag) => match registry.get_with_tag(tag) {
                    Some(base) => names.extend_from_slice(base.schema().flat_names()),
                    None => {
                        return Err(RegisterError::NotRegistered {
                            type_path: field.name,
                        });
                    }
                },
                _ => names.push(field.name),
            }
        }

        if let Some(name) = names.iter().enumerate().find_map(|(i, name)| {
            names[..i].contains(name).then_some(*name)
        }) {
            return Err(RegisterError::InvalidSchema {
                type_path: T::type_path(),
                reason: format!("field `{name}` is also declared by the base"),
            });
        }

        Ok(ObjectSchema {
            fields: self.fields,
            // Registrations live for the whole process, so does this list.
            flat_names: names.leak(),
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// -----------------------------------------------------------------------------
// ObjectSchema

/// The erased field list of a registered type.
pub struct ObjectSchema {
    fields: Vec<FieldDescriptor>,
    flat_names: &'static [&'static str],
}

impl ObjectSchema {
    /// Returns the declared fields, base first.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the names of every archived field, with base chains expanded.
    ///
    /// This is the order in which fields appear in an archive.
    #[inline]
    pub fn flat_names(&self) -> &'static [&'static str] {
        self.flat_names
    }
}

impl fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::{FieldKind, Schema, is_identifier};
    use crate::error::RegisterError;
    use crate::object::{BaseObject, Object};
    use crate::registry::TypeRegistry;
    use crate::tag::TypePath;

    #[derive(Default)]
    struct Point {
        x: i32,
        y: i32,
    }

    crate::impl_type_path!(Point => "geo::Point");

    impl Object for Point {
        fn schema() -> Schema<Self> {
            Schema::new()
                .field("x", |p: &Point| &p.x, |p| &mut p.x)
                .field("y", |p: &Point| &p.y, |p| &mut p.y)
        }
    }

    #[derive(Default)]
    struct Marker {
        point: Point,
        label: String,
        anchor: Point,
        attached: Option<Box<dyn BaseObject>>,
    }

    crate::impl_type_path!(Marker => "geo::Marker");

    impl Object for Marker {
        fn schema() -> Schema<Self> {
            Schema::new()
                .base(|m: &Marker| &m.point, |m| &mut m.point)
                .field("label", |m: &Marker| &m.label, |m| &mut m.label)
                .nested("anchor", |m: &Marker| &m.anchor, |m| &mut m.anchor)
                .polymorphic("attached", |m: &Marker| &m.attached, |m| &mut m.attached)
        }
    }

    #[derive(Default)]
    struct LateBase {
        point: Point,
        flag: bool,
    }

    crate::impl_type_path!(LateBase => "geo::LateBase");

    impl Object for LateBase {
        fn schema() -> Schema<Self> {
            Schema::new()
                .field("flag", |m: &LateBase| &m.flag, |m| &mut m.flag)
                .base(|m: &LateBase| &m.point, |m| &mut m.point)
        }
    }

    #[derive(Default)]
    struct Twice {
        a: u8,
    }

    crate::impl_type_path!(Twice => "geo::Twice");

    impl Object for Twice {
        fn schema() -> Schema<Self> {
            Schema::new()
                .field("a", |t: &Twice| &t.a, |t| &mut t.a)
                .field("a", |t: &Twice| &t.a, |t| &mut t.a)
        }
    }

    #[test]
    fn flattened_names_and_kinds() {
        let mut registry = TypeRegistry::new();
        registry.register::<Marker>().unwrap();

        let meta = registry.get_with_type_path("geo::Marker").unwrap();
        let schema = meta.schema();

        assert_eq!(schema.flat_names(), &["x", "y", "label", "anchor", "attached"]);

        let kinds: alloc::vec::Vec<_> = schema.fields().iter().map(|f| f.kind()).collect();
        assert_eq!(
            kinds,
            [
                FieldKind::Base(Point::type_tag()),
                FieldKind::Value,
                FieldKind::Nested(Point::type_tag()),
                FieldKind::Polymorphic,
            ]
        );
        assert_eq!(schema.fields()[0].name(), "Point");

        // Base and nested types are registered with the owner.
        assert!(registry.contains_type::<Point>());
    }

    #[test]
    fn base_must_come_first() {
        let mut registry = TypeRegistry::new();
        let err = registry.register::<LateBase>().unwrap_err();

        assert!(matches!(
            err,
            RegisterError::InvalidSchema { type_path, .. } if type_path == LateBase::type_path()
        ));
        assert!(!registry.contains_type::<LateBase>());
    }

    #[test]
    fn duplicate_field_rejected() {
        let mut registry = TypeRegistry::new();
        assert!(matches!(
            registry.register::<Twice>(),
            Err(RegisterError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("name"));
        assert!(is_identifier("_private2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2nd"));
        assert!(!is_identifier("first name"));
    }
}
