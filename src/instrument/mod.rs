//! Instrument records and catalog loading

mod data;
pub mod loader;

pub use data::{Catalog, CatalogEntry, Instrument};
pub use loader::{load_catalog, load_catalog_from_reader, load_default_catalog, price_instruments};
