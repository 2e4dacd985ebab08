pub mod data;
pub mod file;
pub mod stdin;

pub use data::DataPaths;
