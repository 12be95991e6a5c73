pub mod catalog;
pub mod core;
pub mod filter;

pub use catalog::WordCatalog;
pub use core::{load_catalog, DirectoryWords, EmbeddedWords, WordSource};
