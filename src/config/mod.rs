pub mod types;
pub mod loader;

pub use types::*;
