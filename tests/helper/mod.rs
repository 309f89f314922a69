pub mod catalog;

pub use catalog::MemoryCatalog;
