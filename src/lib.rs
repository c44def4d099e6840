//! Polymorphic object archives for the `vc_*` crates.
//!
//! - [`archive`]: tagged objects, the type registry and the serializer.
//! - [`utils`]: hash containers shared by the crates.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_archive as archive;
pub use vc_utils as utils;

/// The most used items of [`archive`].
pub mod prelude {
    pub use vc_archive::auto_register;
    pub use vc_archive::error::{ArchiveError, RegisterError};
    pub use vc_archive::impl_type_path;
    pub use vc_archive::object::{BaseObject, Object};
    pub use vc_archive::registry::{TypeRegistry, global_registry, register_type};
    pub use vc_archive::schema::Schema;
    pub use vc_archive::serializer::{ArchiveConfig, Format, ObjectSerializer};
    pub use vc_archive::tag::{TypePath, TypeTag};
}
