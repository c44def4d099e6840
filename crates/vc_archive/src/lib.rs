//! Polymorphic object archives.
//!
//! A value held through a base handle (`&dyn BaseObject`, or a family trait
//! object such as `Box<dyn Animal>`) is written together with a stable tag of
//! its concrete type, and later rebuilt as exactly that type.
//!
//! ## Menu
//!
//! - [`tag`]: [`TypeTag`](tag::TypeTag) and [`TypePath`](tag::TypePath), the stable identity of a type.
//! - [`object`]: [`Object`](object::Object) and [`BaseObject`](object::BaseObject).
//! - [`schema`]: the ordered field list of an object.
//! - [`registry`]: [`TypeRegistry`](registry::TypeRegistry), tag lookup and construction.
//! - [`codec`]: field encoding, [`Format`](codec::Format).
//! - [`serializer`]: [`ObjectSerializer`](serializer::ObjectSerializer), the entry point.
//! - [`error`]: [`RegisterError`](error::RegisterError) and [`ArchiveError`](error::ArchiveError).
//!
//! ## Example
//!
//! ```
//! use vc_archive::impl_type_path;
//! use vc_archive::object::{BaseObject, Object};
//! use vc_archive::registry::TypeRegistry;
//! use vc_archive::schema::Schema;
//! use vc_archive::serializer::{Format, ObjectSerializer};
//!
//! trait Animal: BaseObject {
//!     fn speak(&self) -> String;
//! }
//!
//! #[derive(Default)]
//! struct Dog {
//!     name: String,
//! }
//!
//! impl_type_path!(Dog => "zoo::Dog");
//!
//! impl Object for Dog {
//!     fn schema() -> Schema<Self> {
//!         Schema::new().field("name", |d: &Dog| &d.name, |d| &mut d.name)
//!     }
//! }
//!
//! impl Animal for Dog {
//!     fn speak(&self) -> String {
//!         format!("{}: woof", self.name)
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Dog>().unwrap();
//! registry.register_upcast::<Dog, dyn Animal>(|dog| dog as Box<dyn Animal>).unwrap();
//!
//! let animal: Box<dyn Animal> = Box::new(Dog { name: "rex".into() });
//!
//! let serializer = ObjectSerializer::new(&registry);
//! let bytes = serializer.serialize(&*animal, Format::Binary).unwrap();
//! let back: Box<dyn Animal> = serializer.deserialize(&bytes, Format::Binary).unwrap();
//!
//! assert_eq!(back.speak(), "rex: woof");
//! ```
//!
//! ## Features
//!
//! - `auto_register`: collect types submitted with [`auto_register!`] at link time.
//! - `debug`: in debug builds, codec errors name the stack of types being traversed.
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Lets macros expanded inside this crate refer to it by name.
extern crate self as vc_archive;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod engine;

pub mod codec;
pub mod error;
pub mod object;
pub mod registry;
pub mod schema;
pub mod serializer;
pub mod tag;

#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use serializer::{deserialize, serialize};
