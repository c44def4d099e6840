//! Stable identities for archived types.
//!
//! - [`TypePath`]: a static, refactor independent name for a type.
//! - [`TypeTag`]: the numeric identifier written in binary archives.
//! - [`impl_type_path!`](crate::impl_type_path): implement [`TypePath`] without boilerplate.

use core::fmt;
use core::hash::BuildHasher;

use vc_utils::hash::FixedHashState;

// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// Unlike [`core::any::type_name`], the returned path is chosen by the
/// implementor and does not change with compiler versions. Archived text
/// data refers to types through this path, binary data through the
/// [`TypeTag`] derived from it.
///
/// Paths must be unique among registered types and should not start with `::`.
///
/// # Examples
///
/// ```
/// use vc_archive::tag::TypePath;
///
/// struct Foo;
///
/// impl TypePath for Foo {
///     fn type_path() -> &'static str {
///         "my_crate::foo::Foo"
///     }
/// }
///
/// assert_eq!(Foo::type_name(), "Foo");
/// ```
pub trait TypePath: 'static {
    /// Returns the full path of the type, e.g. `my_crate::foo::Foo`.
    fn type_path() -> &'static str;

    /// Returns the last segment of [`type_path`](TypePath::type_path).
    fn type_name() -> &'static str {
        let path = Self::type_path();
        match path.rfind("::") {
            Some(index) => &path[index + 2..],
            None => path,
        }
    }
}

/// Implement [`TypePath`] for a type.
///
/// - `impl_type_path!(Foo)` uses the module path of the invocation.
/// - `impl_type_path!(Foo => "my_crate::Foo")` pins the path explicitly, which
///   keeps archives readable after the definition is moved.
///
/// # Examples
///
/// ```
/// use vc_archive::impl_type_path;
/// use vc_archive::tag::TypePath;
///
/// struct Pinned;
/// impl_type_path!(Pinned => "zoo::Pinned");
///
/// assert_eq!(Pinned::type_path(), "zoo::Pinned");
/// assert_eq!(Pinned::type_name(), "Pinned");
/// ```
#[macro_export]
macro_rules! impl_type_path {
    ($ty:ty => $path:literal) => {
        impl $crate::tag::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }
        }
    };
    ($ty:ident) => {
        impl $crate::tag::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!($ty))
            }

            #[inline]
            fn type_name() -> &'static str {
                ::core::stringify!($ty)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// TypeTag

/// A stable identifier of one concrete registered type.
///
/// By default the tag is the [`FixedHashState`] hash of the type path,
/// so it is the same in every process that registers the type, independent
/// of memory layout, `TypeId` values or hash randomization.
///
/// Types may pin an explicit tag by overriding
/// [`Object::type_tag`](crate::object::Object::type_tag).
///
/// # Examples
///
/// ```
/// use vc_archive::tag::TypeTag;
///
/// let a = TypeTag::from_path("zoo::Dog");
/// let b = TypeTag::from_path("zoo::Dog");
///
/// assert_eq!(a, b);
/// assert_ne!(a, TypeTag::from_path("zoo::Cat"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(u64);

impl TypeTag {
    /// Creates a tag from an explicit value.
    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Derives the tag of a type path.
    #[inline]
    pub fn from_path(type_path: &str) -> Self {
        Self(FixedHashState.hash_one(type_path))
    }

    /// Returns the raw value written to binary archives.
    #[inline(always)]
    pub const fn to_bits(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({:#018x})", self.0)
    }
}

// -----------------------------------------------------------------------------
// Tests
