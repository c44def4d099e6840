use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use bincode::config::Config;
use serde_core::Serialize;
use serde_core::de::DeserializeSeed;

// -----------------------------------------------------------------------------
// Format

/// The encoding of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Compact `bincode`: fixed width little endian integers, no field names.
    ///
    /// Types are identified by their numeric [`TypeTag`](crate::tag::TypeTag).
    #[default]
    Binary,
    /// UTF-8 `ron`: `name: value` pairs.
    ///
    /// Types are identified by their [`TypePath`](crate::tag::TypePath).
    Text,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Text => f.write_str("text"),
        }
    }
}

// -----------------------------------------------------------------------------
// Encoding

/// The most bytes a binary archive may claim while it is read.
///
/// Length prefixes are checked against this before anything is allocated.
pub const MAX_BINARY_LEN: usize = 64 * 1024 * 1024;

/// `ron` nesting levels one object level may use: the `Some` of a member,
/// the header tuple, the field struct, plus room for the values themselves.
const TEXT_LEVELS_PER_OBJECT: usize = 8;

#[inline]
fn binary_config() -> impl Config {
    bincode::config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
        .with_limit::<MAX_BINARY_LEN>()
}

// The object depth is bounded by the session, `ron` must never cut in first.
#[inline]
fn text_options(max_depth: usize) -> ron::Options {
    let limit = max_depth
        .saturating_add(1)
        .saturating_mul(TEXT_LEVELS_PER_OBJECT);
    ron::Options::default().with_recursion_limit(limit)
}

/// Encodes a whole archive. Errors are reported as plain messages, the
/// caller decides which field they belong to.
pub(crate) fn encode<T: Serialize>(
    value: &T,
    format: Format,
    pretty: bool,
    max_depth: usize,
) -> Result<Vec<u8>, String> {
    match format {
        Format::Binary => {
            bincode::serde::encode_to_vec(value, binary_config()).map_err(|e| e.to_string())
        }
        Format::Text if pretty => text_options(max_depth)
            .to_string_pretty(value, ron::ser::PrettyConfig::default())
            .map(String::into_bytes)
            .map_err(|e| e.to_string()),
        Format::Text => text_options(max_depth)
            .to_string(value)
            .map(String::into_bytes)
            .map_err(|e| e.to_string()),
    }
}

/// Decodes a whole archive, rejecting any input left after the root value.
pub(crate) fn decode<'de, S: DeserializeSeed<'de>>(
    seed: S,
    bytes: &'de [u8],
    format: Format,
    max_depth: usize,
) -> Result<S::Value, String> {
    match format {
        Format::Binary => {
            let (value, read) = bincode::serde::seed_decode_from_slice(seed, bytes, binary_config())
                .map_err(|e| e.to_string())?;
            if read != bytes.len() {
                return Err(format!("{} trailing bytes", bytes.len() - read));
            }
            Ok(value)
        }
        Format::Text => {
            let text = core::str::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {e}"))?;
            text_options(max_depth)
                .from_str_seed(text, seed)
                .map_err(|e| e.to_string())
        }
    }
}
