use super::{EntityDef, JoinSpec, Resource};
use crate::service::{FieldRule, FieldSpec};
use serde::{Deserialize, Serialize};

/// Earliest accepted model year.
pub const FIRST_CAR_YEAR: i64 = 1886;
/// Largest year the `annee` column (and `Vehicule::annee`) can hold.
pub const LAST_STORABLE_YEAR: i64 = i32::MAX as i64;

static VEHICULE: EntityDef = EntityDef {
    table: "vehicule",
    path_segment: "vehicules",
    noun: "vehicule",
    label: "Vehicule",
    natural_key: "immatriculation",
    fields: &[
        FieldSpec::new("agence_id", FieldRule::OptionalForeignKey),
        FieldSpec::new("marque", FieldRule::RequiredString),
        FieldSpec::new("model", FieldRule::RequiredString),
        FieldSpec::new("annee", FieldRule::RequiredInteger { min: FIRST_CAR_YEAR, max: LAST_STORABLE_YEAR }),
        FieldSpec::new("statut", FieldRule::RequiredString),
        FieldSpec::new("immatriculation", FieldRule::RequiredString),
        FieldSpec::new("prix_par_jour", FieldRule::RequiredNumber { min: 0.0 }),
    ],
    created_at: None,
    updated_at: None,
    join: Some(JoinSpec {
        table: "agence",
        local_key: "agence_id",
        column: "name",
        alias: "agence_name",
    }),
};

/// A vehicle, optionally attached to an agency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicule {
    pub id: i64,
    pub agence_id: Option<i64>,
    pub marque: String,
    pub model: String,
    pub annee: i32,
    pub statut: String,
    pub immatriculation: String,
    pub prix_par_jour: f64,
    /// Only present on list reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agence_name: Option<String>,
}

impl Resource for Vehicule {
    fn def() -> &'static EntityDef {
        &VEHICULE
    }

    fn view_title() -> &'static str {
        "Véhicules"
    }

    fn view_headers() -> &'static [&'static str] {
        &["ID", "Agence", "Marque", "Modèle", "Année", "Statut", "Immatriculation", "Prix / jour"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn view_cells(&self) -> Vec<String> {
        let agence = self
            .agence_name
            .clone()
            .or_else(|| self.agence_id.map(|id| format!("#{}", id)))
            .unwrap_or_default();
        vec![
            self.id.to_string(),
            agence,
            self.marque.clone(),
            self.model.clone(),
            self.annee.to_string(),
            self.statut.clone(),
            self.immatriculation.clone(),
            format!("{:.2}", self.prix_par_jour),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joined_row_maps_to_record() {
        let row = json!({
            "id": 4, "agence_id": 2, "marque": "Toyota", "model": "Corolla", "annee": 2020,
            "statut": "available", "immatriculation": "AB-123-CD", "prix_par_jour": 25.0,
            "agence_name": "Central"
        });
        let v: Vehicule = serde_json::from_value(row).unwrap();
        assert_eq!(v.agence_name.as_deref(), Some("Central"));
        assert_eq!(v.view_cells()[1], "Central");
        assert_eq!(v.view_cells()[7], "25.00");
    }

    #[test]
    fn agence_name_is_omitted_when_not_joined() {
        let row = json!({
            "id": 4, "agence_id": null, "marque": "Toyota", "model": "Corolla", "annee": 2020,
            "statut": "available", "immatriculation": "AB-123-CD", "prix_par_jour": 25
        });
        let v: Vehicule = serde_json::from_value(row).unwrap();
        let out = serde_json::to_value(&v).unwrap();
        assert!(out.get("agence_name").is_none());
        assert!(out["agence_id"].is_null());
    }
}
