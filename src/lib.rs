pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod terminal;

pub use catalog::CatalogSearch;
pub use config::Config;
pub use error::{CatalogError, CatalogResult};
