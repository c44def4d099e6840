//! Provide the type registry used to rebuild objects from archives.
//!
//! ## Menu
//!
//! - [`TypeTrait`]: A capability attached to a registered type.
//! - [`FromType`]: Creates a `TypeTrait` from a concrete type.
//! - [`TypeMeta`]: Identity, schema and `TypeTrait` table of one type.
//! - [`TypeRegistry`]: A container for storing and querying `TypeMeta`s.
//! - [`TypeRegistryArc`]: A shared, lock protected `TypeRegistry`.
//! - TypeTraits:
//!     - [`TypeTraitFactory`]: Builds a default instance of the type.
//!     - [`TypeTraitUpcast`]: Converts a built object to `Box<D>`.
//! - [`global_registry`], [`register_type`], [`object_type`]: the process wide registry.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`] .
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//!
//! If it is not supported, auto registration returns `Ok(false)` and types
//! must be registered explicitly.

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod global;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use global::{global_registry, object_type, register_type};
pub use traits::{TypeTraitFactory, TypeTraitUpcast};
pub use type_meta::TypeMeta;
pub use type_registry::{TypeRegistry, TypeRegistryArc};
pub use type_trait::TypeTrait;
