use alloc::boxed::Box;
use core::fmt;

use serde_core::de::{DeserializeSeed, Error, Visitor};
use serde_core::{Deserializer, Serialize, Serializer};

use crate::engine::{ArchiveSession, TaggedSeed, TaggedSerializer};
use crate::object::BaseObject;

// -----------------------------------------------------------------------------
// MemberSerializer

/// Writes an `Option<Box<dyn BaseObject>>` member, tagging the present value.
pub(crate) struct MemberSerializer<'a> {
    session: &'a ArchiveSession<'a>,
    member: Option<&'a dyn BaseObject>,
}

impl<'a> MemberSerializer<'a> {
    #[inline]
    pub fn new(session: &'a ArchiveSession<'a>, member: Option<&'a dyn BaseObject>) -> Self {
        Self { session, member }
    }
}

impl Serialize for MemberSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.member {
            None => serializer.serialize_none(),
            Some(object) => serializer.serialize_some(&TaggedSerializer::new(self.session, object)),
        }
    }
}

// -----------------------------------------------------------------------------
// MemberSeed

/// Reads an `Option<Box<dyn BaseObject>>` member in place.
pub(crate) struct MemberSeed<'a> {
    session: &'a ArchiveSession<'a>,
    slot: &'a mut Option<Box<dyn BaseObject>>,
}

impl<'a> MemberSeed<'a> {
    #[inline]
    pub fn new(session: &'a ArchiveSession<'a>, slot: &'a mut Option<Box<dyn BaseObject>>) -> Self {
        Self { session, slot }
    }
}

impl<'de> DeserializeSeed<'de> for MemberSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_option(self)
    }
}

impl<'de> Visitor<'de> for MemberSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an optional tagged object")
    }

    fn visit_none<E: Error>(self) -> Result<(), E> {
        *self.slot = None;
        Ok(())
    }

    fn visit_unit<E: Error>(self) -> Result<(), E> {
        self.visit_none()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        let object = TaggedSeed::new(self.session).deserialize(deserializer)?;
        *self.slot = Some(object);
        Ok(())
    }
}
