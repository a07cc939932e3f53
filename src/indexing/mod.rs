pub mod generator;
pub mod walker;

pub use generator::{ClassMapGenerator, merge_maps};
pub use walker::FileWalker;
