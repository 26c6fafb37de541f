//src/model/mod.rs
pub mod elements;
pub mod property_key;
pub mod specie;

// Re-exports for cleaner imports
pub use elements::{Element, DUMMY_SYMBOL};
pub use property_key::PropertyKey;
pub use specie::Specie;
