//! Entity definitions: table layout, natural key and field rules per resource.

mod agence;
mod vehicule;

pub use agence::Agence;
pub use vehicule::Vehicule;

use crate::service::FieldSpec;
use serde::{de::DeserializeOwned, Serialize};

/// Related column pulled into list reads for display.
#[derive(Clone, Copy, Debug)]
pub struct JoinSpec {
    pub table: &'static str,
    /// Our foreign key column, matched against the related table's id.
    pub local_key: &'static str,
    pub column: &'static str,
    pub alias: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct EntityDef {
    pub table: &'static str,
    /// URL segment, e.g. `agences`.
    pub path_segment: &'static str,
    /// Lowercase noun used in id errors.
    pub noun: &'static str,
    /// Capitalized name used in not-found and duplicate errors.
    pub label: &'static str,
    /// Column checked for duplicates before insert.
    pub natural_key: &'static str,
    /// Mutable columns, in validation order.
    pub fields: &'static [FieldSpec],
    pub created_at: Option<&'static str>,
    pub updated_at: Option<&'static str>,
    pub join: Option<JoinSpec>,
}

/// A record type served by the generic CRUD controller.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    fn def() -> &'static EntityDef;

    /// Page title and column headers for the HTML list view.
    fn view_title() -> &'static str;

    fn view_headers() -> &'static [&'static str];

    fn id(&self) -> i64;

    fn view_cells(&self) -> Vec<String>;
}

pub(crate) fn display_opt<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(ToString::to_string).unwrap_or_default()
}
