//! Field level encoding on top of serde.
//!
//! - [`Primitive`]: leaf values, written through serde directly.
//! - [`Format`]: `bincode` for binary archives, `ron` for text archives.
//! - [`MAX_BINARY_LEN`]: the most bytes a binary archive may claim while decoding.
//!
//! Nested objects are written as structs without a tag, polymorphic members
//! as options of tagged objects.

// -----------------------------------------------------------------------------
// Modules

mod format;
mod polymorphic;
mod primitive;
mod source;

// -----------------------------------------------------------------------------
// Exports

pub use format::{Format, MAX_BINARY_LEN};
pub use primitive::Primitive;

pub(crate) use format::{decode, encode};
pub(crate) use polymorphic::{MemberSeed, MemberSerializer};
pub(crate) use primitive::ValueSeed;
pub(crate) use source::{FieldSource, MapSource, SeqSource};
