//! The `(tag, version, fields)` triple written for the root object and for
//! every polymorphic member.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use serde_core::de::{DeserializeSeed, Error as _, SeqAccess, Visitor};
use serde_core::ser::{Error as _, SerializeTuple};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use super::pass::{FieldsSeed, FieldsSerializer};
use super::session::ArchiveSession;
use crate::codec::Format;
use crate::error::{ArchiveError, UnregisteredRef};
use crate::object::BaseObject;
use crate::registry::TypeMeta;
use crate::tag::TypeTag;

const HEADER: &str = "<header>";

// -----------------------------------------------------------------------------
// TaggedSerializer

/// Writes an object together with the tag of its concrete type.
pub(crate) struct TaggedSerializer<'a> {
    session: &'a ArchiveSession<'a>,
    object: &'a dyn BaseObject,
}

impl<'a> TaggedSerializer<'a> {
    #[inline]
    pub fn new(session: &'a ArchiveSession<'a>, object: &'a dyn BaseObject) -> Self {
        Self { session, object }
    }
}

impl Serialize for TaggedSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let session = self.session;
        let object = self.object;

        // The tag must belong to this exact type, not to a type that pinned the same value.
        let meta = match session.registry().get_with_tag(object.object_tag()) {
            Some(meta) if meta.type_id() == object.concrete_type_id() => meta,
            _ => {
                return Err(S::Error::custom(session.fail(
                    ArchiveError::UnregisteredType(UnregisteredRef::Tag(object.object_tag())),
                )));
            }
        };

        let _depth = session.enter(meta.type_path()).map_err(S::Error::custom)?;

        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&TagRepr {
            format: session.format(),
            meta,
        })?;
        tuple.serialize_element(&meta.version())?;
        tuple.serialize_element(&FieldsSerializer::new(session, meta, object))?;
        tuple.end()
    }
}

/// The type path in text archives, the numeric tag in binary ones.
struct TagRepr<'a> {
    format: Format,
    meta: &'a TypeMeta,
}

impl Serialize for TagRepr<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.format {
            Format::Binary => serializer.serialize_u64(self.meta.tag().to_bits()),
            Format::Text => serializer.serialize_str(self.meta.type_path()),
        }
    }
}

// -----------------------------------------------------------------------------
// TaggedSeed

/// Reads a tagged object and rebuilds it as its concrete type.
pub(crate) struct TaggedSeed<'a> {
    session: &'a ArchiveSession<'a>,
}

impl<'a> TaggedSeed<'a> {
    #[inline]
    pub fn new(session: &'a ArchiveSession<'a>) -> Self {
        Self { session }
    }
}

impl<'de> DeserializeSeed<'de> for TaggedSeed<'_> {
    type Value = Box<dyn BaseObject>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_tuple(3, self)
    }
}

impl<'de> Visitor<'de> for TaggedSeed<'_> {
    type Value = Box<dyn BaseObject>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a tagged object (tag, version, fields)")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let session = self.session;

        let meta = {
            let _field = session.field(HEADER);

            let meta = match seq
                .next_element_seed(TagSeed { session })
                .map_err(|e| session.codec(e))?
            {
                Some(meta) => meta,
                None => return Err(session.codec(A::Error::invalid_length(0, &self))),
            };

            let version = match seq.next_element::<u32>().map_err(|e| session.codec(e))? {
                Some(version) => version,
                None => return Err(session.codec(A::Error::invalid_length(1, &self))),
            };

            if version != meta.version() {
                return Err(A::Error::custom(session.fail(ArchiveError::VersionMismatch {
                    type_path: meta.type_path(),
                    expected: meta.version(),
                    found: version,
                })));
            }
            meta
        };

        let _depth = session.enter(meta.type_path()).map_err(A::Error::custom)?;

        // Dropped with its partially read fields if anything below fails.
        let mut object = meta.construct();
        match seq
            .next_element_seed(FieldsSeed::new(session, meta, &mut *object))
            .map_err(|e| session.codec(e))?
        {
            Some(()) => Ok(object),
            None => Err(session.codec(A::Error::invalid_length(2, &self))),
        }
    }
}

/// Resolves the archived type identifier to its registration.
struct TagSeed<'a> {
    session: &'a ArchiveSession<'a>,
}

impl<'de, 'a> DeserializeSeed<'de> for TagSeed<'a> {
    type Value = &'a TypeMeta;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let session = self.session;
        let registry = session.registry();

        match session.format() {
            Format::Binary => {
                let tag = TypeTag::new(u64::deserialize(deserializer)?);
                registry.get_with_tag(tag).ok_or_else(|| {
                    D::Error::custom(
                        session.fail(ArchiveError::UnregisteredType(UnregisteredRef::Tag(tag))),
                    )
                })
            }
            Format::Text => {
                let path = String::deserialize(deserializer)?;
                match registry.get_with_type_path(&path) {
                    Some(meta) => Ok(meta),
                    None => Err(D::Error::custom(session.fail(
                        ArchiveError::UnregisteredType(UnregisteredRef::Path(path)),
                    ))),
                }
            }
        }
    }
}
