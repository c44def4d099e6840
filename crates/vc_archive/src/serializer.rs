//! The public entry points: [`ObjectSerializer`] and the free functions
//! working on the [global registry](crate::registry::global_registry).

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::codec;
use crate::engine::{ArchiveSession, TaggedSeed, TaggedSerializer};
use crate::error::ArchiveError;
use crate::object::BaseObject;
use crate::registry::{TypeRegistry, TypeTraitUpcast, global_registry};

pub use crate::codec::Format;

// -----------------------------------------------------------------------------
// ArchiveConfig

/// Options shared by every call of an [`ObjectSerializer`].
///
/// # Examples
///
/// ```
/// use vc_archive::serializer::ArchiveConfig;
///
/// let config = ArchiveConfig::default().with_max_depth(8).with_pretty_text(true);
///
/// assert_eq!(config.max_depth, 8);
/// assert!(config.pretty_text);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// The maximum number of nested object levels, the root included.
    pub max_depth: usize,
    /// Write text archives with line breaks and indentation.
    pub pretty_text: bool,
}

impl ArchiveConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub const fn with_pretty_text(mut self, pretty_text: bool) -> Self {
        self.pretty_text = pretty_text;
        self
    }
}

impl Default for ArchiveConfig {
    #[inline]
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            pretty_text: false,
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectSerializer

/// Writes objects to archives and rebuilds them, resolving types through a
/// [`TypeRegistry`].
///
/// The concrete type is recovered from the archive, so a value written
/// through `&dyn BaseObject` comes back as the type it was.
///
/// # Examples
///
/// ```
/// use vc_archive::impl_type_path;
/// use vc_archive::object::{BaseObject, Object};
/// use vc_archive::registry::TypeRegistry;
/// use vc_archive::schema::Schema;
/// use vc_archive::serializer::{Format, ObjectSerializer};
///
/// #[derive(Default, Debug, PartialEq)]
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
/// let serializer = ObjectSerializer::new(&registry);
/// let jack = Person { name: "jack".into(), age: 23 };
///
/// let text = serializer.serialize_text(&jack).unwrap();
/// assert_eq!(text, r#"("app::Person",0,(name:"jack",age:23))"#);
///
/// let bytes = serializer.serialize(&jack, Format::Binary).unwrap();
/// let object: Box<dyn BaseObject> = serializer.deserialize(&bytes, Format::Binary).unwrap();
/// assert_eq!(object.downcast_ref::<Person>(), Some(&jack));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectSerializer<'a> {
    registry: &'a TypeRegistry,
    config: ArchiveConfig,
}

impl<'a> ObjectSerializer<'a> {
    /// Creates a serializer with the default [`ArchiveConfig`].
    #[inline]
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            config: ArchiveConfig::default(),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: ArchiveConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Writes `object`, tagged with its concrete type.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::UnregisteredType`] if the concrete type of `object`,
    ///   or of any polymorphic member, is not registered.
    /// - [`ArchiveError::DepthExceeded`] if members nest deeper than
    ///   [`ArchiveConfig::max_depth`].
    /// - [`ArchiveError::Codec`] if the format rejects a value.
    pub fn serialize(&self, object: &dyn BaseObject, format: Format) -> Result<Vec<u8>, ArchiveError> {
        log::trace!("Serializing `{}` as {format}", object.object_path());

        let session = ArchiveSession::new(self.registry, format, self.config.max_depth);
        let result = codec::encode(
            &TaggedSerializer::new(&session, object),
            format,
            self.config.pretty_text,
            self.config.max_depth,
        );
        session.finish(result)
    }

    /// Writes `object` as a text archive.
    ///
    /// See [`serialize`](Self::serialize).
    pub fn serialize_text(&self, object: &dyn BaseObject) -> Result<String, ArchiveError> {
        let bytes = self.serialize(object, Format::Text)?;
        String::from_utf8(bytes).map_err(ArchiveError::codec_at_root)
    }

    /// Rebuilds an object and hands it out as `Box<E>`.
    ///
    /// `E` is the concrete type, `dyn BaseObject`, or any type declared with
    /// [`TypeRegistry::register_upcast`] for the concrete type.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::UnregisteredType`] if the archive names a type that
    ///   is not registered.
    /// - [`ArchiveError::TypeMismatch`] if the object cannot be handed out as `E`.
    /// - [`ArchiveError::VersionMismatch`] if an archived version differs
    ///   from the registered one.
    /// - [`ArchiveError::DepthExceeded`] if members nest deeper than
    ///   [`ArchiveConfig::max_depth`].
    /// - [`ArchiveError::Codec`] if the input is truncated, malformed, or
    ///   followed by trailing data.
    pub fn deserialize<E: ?Sized + 'static>(
        &self,
        bytes: &[u8],
        format: Format,
    ) -> Result<Box<E>, ArchiveError> {
        log::trace!(
            "Deserializing {} bytes of {format} as `{}`",
            bytes.len(),
            core::any::type_name::<E>(),
        );

        let session = ArchiveSession::new(self.registry, format, self.config.max_depth);
        let result = codec::decode(TaggedSeed::new(&session), bytes, format, self.config.max_depth);
        let object = session.finish(result)?;

        self.upcast::<E>(object)
    }

    /// Rebuilds an object from a text archive.
    ///
    /// See [`deserialize`](Self::deserialize).
    #[inline]
    pub fn deserialize_text<E: ?Sized + 'static>(&self, text: &str) -> Result<Box<E>, ArchiveError> {
        self.deserialize::<E>(text.as_bytes(), Format::Text)
    }

    fn upcast<E: ?Sized + 'static>(&self, object: Box<dyn BaseObject>) -> Result<Box<E>, ArchiveError> {
        let found = object.object_path();
        let mismatch = || ArchiveError::TypeMismatch {
            expected: core::any::type_name::<E>(),
            found,
        };

        let upcast = self
            .registry
            .get(object.concrete_type_id())
            .and_then(|meta| meta.get_trait::<TypeTraitUpcast<E>>())
            .ok_or_else(mismatch)?;
        upcast.upcast(object).ok_or_else(mismatch)
    }
}

// -----------------------------------------------------------------------------
// Global

/// Writes `object` using the [global registry](global_registry).
///
/// See [`ObjectSerializer::serialize`].
pub fn serialize(object: &dyn BaseObject, format: Format) -> Result<Vec<u8>, ArchiveError> {
    let registry = global_registry().read();
    ObjectSerializer::new(&registry).serialize(object, format)
}

/// Rebuilds an object using the [global registry](global_registry).
///
/// See [`ObjectSerializer::deserialize`].
pub fn deserialize<E: ?Sized + 'static>(bytes: &[u8], format: Format) -> Result<Box<E>, ArchiveError> {
    let registry = global_registry().read();
    ObjectSerializer::new(&registry).deserialize::<E>(bytes, format)
}

// -----------------------------------------------------------------------------
// Tests
