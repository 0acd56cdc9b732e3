//! HTTP handlers for entity CRUD and the HTML views.

pub mod entity;
pub use entity::*;
