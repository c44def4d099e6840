use alloc::format;
use alloc::string::String;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{DeserializeSeed, Error, IgnoredAny, MapAccess, SeqAccess, Visitor};

// -----------------------------------------------------------------------------
// FieldSource

/// Yields the fields of one object in declaration order.
///
/// Binary archives present fields as a sequence, text archives as a map
/// whose keys must match the expected names one by one.
pub(crate) trait FieldSource<'de> {
    type Error: Error;

    /// Reads the next field, which must be called `name`.
    fn next_field<S: DeserializeSeed<'de>>(
        &mut self,
        name: &'static str,
        seed: S,
    ) -> Result<S::Value, Self::Error>;

    /// Fails if the object has more fields than declared.
    fn end(&mut self) -> Result<(), Self::Error>;
}

pub(crate) struct SeqSource<A> {
    seq: A,
}

impl<A> SeqSource<A> {
    #[inline]
    pub fn new(seq: A) -> Self {
        Self { seq }
    }
}

impl<'de, A: SeqAccess<'de>> FieldSource<'de> for SeqSource<A> {
    type Error = A::Error;

    fn next_field<S: DeserializeSeed<'de>>(
        &mut self,
        name: &'static str,
        seed: S,
    ) -> Result<S::Value, A::Error> {
        match self.seq.next_element_seed(seed)? {
            Some(value) => Ok(value),
            None => Err(Error::missing_field(name)),
        }
    }

    fn end(&mut self) -> Result<(), A::Error> {
        match self.seq.next_element::<IgnoredAny>()? {
            Some(_) => Err(Error::custom("unexpected trailing field")),
            None => Ok(()),
        }
    }
}

pub(crate) struct MapSource<A> {
    map: A,
}

impl<A> MapSource<A> {
    #[inline]
    pub fn new(map: A) -> Self {
        Self { map }
    }
}

impl<'de, A: MapAccess<'de>> FieldSource<'de> for MapSource<A> {
    type Error = A::Error;

    fn next_field<S: DeserializeSeed<'de>>(
        &mut self,
        name: &'static str,
        seed: S,
    ) -> Result<S::Value, A::Error> {
        match self.map.next_key_seed(FieldNameSeed)? {
            Some(found) if found == name => self.map.next_value_seed(seed),
            Some(found) => Err(Error::custom(format!(
                "expected field `{name}`, found `{found}`"
            ))),
            None => Err(Error::missing_field(name)),
        }
    }

    fn end(&mut self) -> Result<(), A::Error> {
        match self.map.next_key_seed(FieldNameSeed)? {
            Some(found) => Err(Error::custom(format!("unexpected field `{found}`"))),
            None => Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldNameSeed

/// Reads a field key as an owned identifier.
struct FieldNameSeed;

impl<'de> DeserializeSeed<'de> for FieldNameSeed {
    type Value = String;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_identifier(self)
    }
}

impl<'de> Visitor<'de> for FieldNameSeed {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a field name")
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<String, E> {
        Ok(String::from(v))
    }

    fn visit_string<E: Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }
}
