use alloc::string::String;

use serde_core::de::{DeserializeOwned, DeserializeSeed, Error as _};
use serde_core::{Deserializer, Serialize};

use crate::object::BaseObject;
use crate::schema::ReadValue;

// -----------------------------------------------------------------------------
// Primitive

/// A leaf value that can be declared with [`Schema::field`].
///
/// Implemented for `bool`, `char`, `String`, `f32`, `f64` and the integer
/// types up to 64 bits. Both formats encode these directly through serde.
///
/// [`Schema::field`]: crate::schema::Schema::field
pub trait Primitive: Serialize + DeserializeOwned + Send + Sync + 'static {}

macro_rules! impl_primitive {
    ($($ty:ty),* $(,)?) => {
        $( impl Primitive for $ty {} )*
    };
}

impl_primitive!(bool, char, String, f32, f64, u8, u16, u32, u64, i8, i16, i32, i64);

// -----------------------------------------------------------------------------
// ValueSeed

/// Reads one primitive field straight into its owner.
pub(crate) struct ValueSeed<'a> {
    pub read: &'a ReadValue,
    pub target: &'a mut dyn BaseObject,
}

impl<'de> DeserializeSeed<'de> for ValueSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.read)(self.target, &mut erased).map_err(D::Error::custom)
    }
}
