// -----------------------------------------------------------------------------
// Modules

mod factory;
mod upcast;

// -----------------------------------------------------------------------------
// Exports

pub use factory::TypeTraitFactory;
pub use upcast::TypeTraitUpcast;
