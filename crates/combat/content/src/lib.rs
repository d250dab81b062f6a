//! Data-driven unit content and loaders.
//!
//! This crate is the unit-template provider for challenges:
//! - Named abilities implementing [`combat_core::UnitBehavior`]
//! - Unit catalogs that turn named blueprints into templates
//! - RON catalog and TOML challenge-config loaders (`loaders` feature)
//!
//! Behaviours are constructed once per catalog entry and shared by
//! reference with every unit built from it.

pub mod abilities;
pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use abilities::{
    AbilitySpec, Berserker, Bulwark, Executioner, Marksman, Skirmisher, Veteran, behavior_for,
};
pub use catalog::{UnitCatalog, UnitSpec};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, UnitLoader};
