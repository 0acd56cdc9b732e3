//! CrudService: generic CRUD over entity definitions, plus field validation.

mod crud;
mod validation;
pub use crud::{parse_id, CrudService};
pub use validation::{FieldRule, FieldSpec, RequestValidator};
