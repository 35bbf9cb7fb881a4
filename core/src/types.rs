//! Domain DTOs for the portal API.
//!
//! # Design
//! Field names follow the backend's Spanish wire schema through serde
//! renames, so the rest of the crate works with English names. These types
//! mirror the mock-server's schema but are defined independently; integration
//! tests catch any schema drift between the two crates.

use serde::{Deserialize, Deserializer, Serialize};

/// An academic program (carrera) offered in the requirement dropdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Program {
    #[serde(rename = "id_carrera")]
    pub id: i64,
    #[serde(rename = "nombre_carrera")]
    pub name: String,
}

/// A requirement owned by the backend, as received through navigation state
/// or from the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    #[serde(rename = "id_requerimiento", alias = "id")]
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "id_carrera")]
    pub program_id: i64,
    #[serde(rename = "presupuesto", default, deserialize_with = "lenient_amount")]
    pub budget: Option<f64>,
}

/// Request body for both create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequirementPayload {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "id_carrera")]
    pub program_id: i64,
    /// Serialized as `null` when absent, never omitted.
    #[serde(rename = "presupuesto")]
    pub budget: Option<f64>,
}

/// Accepts a JSON number, a numeric string (decimal columns are often sent
/// as strings), or null.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Amount::Number(n)) => Ok(Some(n)),
        Some(Amount::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Amount::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {s:?}"))),
    }
}
