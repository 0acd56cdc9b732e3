use super::{display_opt, EntityDef, Resource};
use crate::service::{FieldRule, FieldSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static AGENCE: EntityDef = EntityDef {
    table: "agence",
    path_segment: "agences",
    noun: "agence",
    label: "Agence",
    natural_key: "name",
    fields: &[
        FieldSpec::new("name", FieldRule::RequiredString),
        FieldSpec::new("address", FieldRule::OptionalString),
        FieldSpec::new("phone", FieldRule::OptionalString),
        FieldSpec::new("email", FieldRule::OptionalEmail),
    ],
    created_at: Some("date_of_creation"),
    updated_at: Some("date_of_modification"),
    join: None,
};

/// A rental agency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agence {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date_of_creation: Option<DateTime<Utc>>,
    pub date_of_modification: Option<DateTime<Utc>>,
}

impl Resource for Agence {
    fn def() -> &'static EntityDef {
        &AGENCE
    }

    fn view_title() -> &'static str {
        "Agences"
    }

    fn view_headers() -> &'static [&'static str] {
        &["ID", "Nom", "Adresse", "Téléphone", "Email", "Créée le", "Modifiée le"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn view_cells(&self) -> Vec<String> {
        let day = |d: &Option<DateTime<Utc>>| d.map(|d| d.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default();
        vec![
            self.id.to_string(),
            self.name.clone(),
            display_opt(&self.address),
            display_opt(&self.phone),
            display_opt(&self.email),
            day(&self.date_of_creation),
            day(&self.date_of_modification),
        ]
    }
}
