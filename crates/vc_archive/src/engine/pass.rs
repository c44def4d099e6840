//! One pass over the flattened field list of an object, base chain first.

use alloc::format;
use alloc::string::String;
use core::fmt;

use serde_core::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{self, SerializeStruct};
use serde_core::{Deserializer, Serialize, Serializer};

use super::session::ArchiveSession;
use crate::codec::{FieldSource, MapSource, MemberSeed, MemberSerializer, SeqSource, ValueSeed};
use crate::object::BaseObject;
use crate::registry::TypeMeta;
use crate::schema::{FieldAccess, FieldDescriptor, FieldKind};

// An accessor returning `None` means the field list was applied to a value of
// another type, which only happens if two types share a tag.
fn schema_mismatch(meta: &TypeMeta, found: &str) -> String {
    format!("fields of `{}` applied to `{found}`", meta.type_path())
}

// Base and nested types are registered with their owner.
fn member_meta<'a>(session: &ArchiveSession<'a>, field: &FieldDescriptor) -> Option<&'a TypeMeta> {
    match field.kind() {
        FieldKind::Base(tag) | FieldKind::Nested(tag) => session.registry().get_with_tag(tag),
        FieldKind::Value | FieldKind::Polymorphic => None,
    }
}

// -----------------------------------------------------------------------------
// Writing

/// Writes the fields of an object without a header.
pub(crate) struct FieldsSerializer<'a> {
    session: &'a ArchiveSession<'a>,
    meta: &'a TypeMeta,
    object: &'a dyn BaseObject,
}

impl<'a> FieldsSerializer<'a> {
    #[inline]
    pub fn new(session: &'a ArchiveSession<'a>, meta: &'a TypeMeta, object: &'a dyn BaseObject) -> Self {
        Self {
            session,
            meta,
            object,
        }
    }
}

impl Serialize for FieldsSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = self.meta.schema().flat_names();
        let mut state = serializer.serialize_struct(self.meta.type_name(), names.len())?;
        write_fields(self.session, self.meta, self.object, &mut state)?;
        state.end()
    }
}

fn write_fields<S: SerializeStruct>(
    session: &ArchiveSession<'_>,
    meta: &TypeMeta,
    object: &dyn BaseObject,
    state: &mut S,
) -> Result<(), S::Error> {
    use ser::Error;

    let found = object.object_path();
    for field in meta.schema().fields() {
        let name = field.name();

        match &field.access {
            FieldAccess::Base { get, .. } => {
                let (Some(base_meta), Some(base)) = (member_meta(session, field), get(object))
                else {
                    return Err(session.codec(S::Error::custom(schema_mismatch(meta, found))));
                };
                write_fields(session, base_meta, base, state)?;
            }
            FieldAccess::Value { write, .. } => {
                let Some(value) = write(object) else {
                    return Err(session.codec(S::Error::custom(schema_mismatch(meta, found))));
                };
                let _field = session.field(name);
                state
                    .serialize_field(name, value)
                    .map_err(|e| session.codec(e))?;
            }
            FieldAccess::Nested { get, .. } => {
                let (Some(nested_meta), Some(nested)) = (member_meta(session, field), get(object))
                else {
                    return Err(session.codec(S::Error::custom(schema_mismatch(meta, found))));
                };
                let _field = session.field(name);
                let _depth = session
                    .enter(nested_meta.type_path())
                    .map_err(S::Error::custom)?;
                state
                    .serialize_field(name, &FieldsSerializer::new(session, nested_meta, nested))
                    .map_err(|e| session.codec(e))?;
            }
            FieldAccess::Polymorphic { get, .. } => {
                let Some(member) = get(object) else {
                    return Err(session.codec(S::Error::custom(schema_mismatch(meta, found))));
                };
                let _field = session.field(name);
                state
                    .serialize_field(name, &MemberSerializer::new(session, member))
                    .map_err(|e| session.codec(e))?;
            }
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Reading

/// Reads the fields of an object without a header into `target`.
pub(crate) struct FieldsSeed<'a> {
    session: &'a ArchiveSession<'a>,
    meta: &'a TypeMeta,
    target: &'a mut dyn BaseObject,
}

impl<'a> FieldsSeed<'a> {
    #[inline]
    pub fn new(
        session: &'a ArchiveSession<'a>,
        meta: &'a TypeMeta,
        target: &'a mut dyn BaseObject,
    ) -> Self {
        Self {
            session,
            meta,
            target,
        }
    }
}

impl<'de> DeserializeSeed<'de> for FieldsSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        let meta = self.meta;
        deserializer.deserialize_struct(meta.type_name(), meta.schema().flat_names(), self)
    }
}

impl<'de> Visitor<'de> for FieldsSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "the fields of `{}`", self.meta.type_path())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<(), A::Error> {
        let mut source = SeqSource::new(seq);
        read_fields(self.session, self.meta, self.target, &mut source)?;
        source.end().map_err(|e| self.session.codec(e))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<(), A::Error> {
        let mut source = MapSource::new(map);
        read_fields(self.session, self.meta, self.target, &mut source)?;
        source.end().map_err(|e| self.session.codec(e))
    }
}

fn read_fields<'de, F: FieldSource<'de>>(
    session: &ArchiveSession<'_>,
    meta: &TypeMeta,
    target: &mut dyn BaseObject,
    source: &mut F,
) -> Result<(), F::Error> {
    use de::Error;

    let found = target.object_path();
    for field in meta.schema().fields() {
        let name = field.name();

        match &field.access {
            FieldAccess::Base { get_mut, .. } => {
                let Some(base_meta) = member_meta(session, field) else {
                    return Err(session.codec(F::Error::custom(schema_mismatch(meta, found))));
                };
                let Some(base) = get_mut(&mut *target) else {
                    return Err(session.codec(F::Error::custom(schema_mismatch(meta, found))));
                };
                read_fields(session, base_meta, base, source)?;
            }
            FieldAccess::Value { read, .. } => {
                let _field = session.field(name);
                let seed = ValueSeed {
                    read,
                    target: &mut *target,
                };
                source
                    .next_field(name, seed)
                    .map_err(|e| session.codec(e))?;
            }
            FieldAccess::Nested { get_mut, .. } => {
                let Some(nested_meta) = member_meta(session, field) else {
                    return Err(session.codec(F::Error::custom(schema_mismatch(meta, found))));
                };
                let Some(nested) = get_mut(&mut *target) else {
                    return Err(session.codec(F::Error::custom(schema_mismatch(meta, found))));
                };
                let _field = session.field(name);
                let _depth = session
                    .enter(nested_meta.type_path())
                    .map_err(F::Error::custom)?;
                source
                    .next_field(name, FieldsSeed::new(session, nested_meta, nested))
                    .map_err(|e| session.codec(e))?;
            }
            FieldAccess::Polymorphic { get_mut, .. } => {
                let Some(slot) = get_mut(&mut *target) else {
                    return Err(session.codec(F::Error::custom(schema_mismatch(meta, found))));
                };
                let _field = session.field(name);
                source
                    .next_field(name, MemberSeed::new(session, slot))
                    .map_err(|e| session.codec(e))?;
            }
        }
    }
    Ok(())
}
