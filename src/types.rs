//! Spot records and their inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Exploration progress of a spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    #[default]
    Planned,
    Completed,
}

impl SpotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotStatus::Planned => "planned",
            SpotStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "planned" => Some(SpotStatus::Planned),
            "completed" => Some(SpotStatus::Completed),
            _ => None,
        }
    }
}

/// A stored exploration spot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub status: SpotStatus,
    pub lat: f64,
    pub lng: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_a: Option<String>,
    #[serde(default)]
    pub alternative_spots: Vec<Uuid>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or updating a spot.
///
/// Every field is optional so the same type serves partial updates; creation
/// enforces the required ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub description: Option<String>,
    pub plan_a: Option<String>,
    pub alternative_spots: Option<Vec<serde_json::Value>>,
    pub photos: Option<Vec<String>>,
}

impl Spot {
    /// Builds a new spot from client input, assigning a fresh id
    pub fn create(input: SpotInput, now: DateTime<Utc>) -> Result<Self> {
        let mut missing = Vec::new();
        for (field, present) in [
            ("name", input.name.as_deref().is_some_and(|s| !s.trim().is_empty())),
            ("location", input.location.as_deref().is_some_and(|s| !s.is_empty())),
            ("lat", input.lat.is_some()),
            ("lng", input.lng.is_some()),
            ("description", input.description.as_deref().is_some_and(|s| !s.is_empty())),
        ] {
            if !present {
                missing.push(format!("{field} is required"));
            }
        }
        if !missing.is_empty() {
            return Err(Error::validation(missing.join(", ")));
        }

        let mut spot = Spot {
            id: Uuid::new_v4(),
            name: String::new(),
            location: String::new(),
            status: SpotStatus::default(),
            lat: 0.0,
            lng: 0.0,
            description: String::new(),
            plan_a: None,
            alternative_spots: Vec::new(),
            photos: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        spot.apply(input, now)?;
        Ok(spot)
    }

    /// Merges the fields present in `input` and refreshes `updated_at`.
    ///
    /// Absent fields, including `photos`, keep their current values. On error
    /// the spot is left untouched.
    pub fn apply(&mut self, input: SpotInput, now: DateTime<Utc>) -> Result<()> {
        let mut next = self.clone();

        if let Some(name) = input.name {
            next.name = name.trim().to_string();
        }
        if let Some(location) = input.location {
            next.location = location;
        }
        if let Some(status) = input.status {
            next.status = SpotStatus::parse(&status).ok_or_else(|| {
                Error::validation(format!("`{status}` is not a valid enum value for path `status`"))
            })?;
        }
        if let Some(lat) = input.lat {
            next.lat = lat;
        }
        if let Some(lng) = input.lng {
            next.lng = lng;
        }
        if let Some(description) = input.description {
            next.description = description;
        }
        if let Some(plan_a) = input.plan_a {
            next.plan_a = Some(plan_a);
        }
        if let Some(ids) = input.alternative_spots {
            next.alternative_spots = valid_ids(&ids);
        }
        if let Some(photos) = input.photos {
            next.photos = photos;
        }

        next.validate()?;
        next.updated_at = now;
        *self = next;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::validation("name is required"));
        }
        if self.location.is_empty() {
            return Err(Error::validation("location is required"));
        }
        if self.description.is_empty() {
            return Err(Error::validation("description is required"));
        }
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(Error::validation("lat and lng must be finite numbers"));
        }
        Ok(())
    }

    pub fn summary(&self) -> SpotSummary {
        SpotSummary {
            id: self.id,
            name: self.name.clone(),
            location: self.location.clone(),
            status: self.status,
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// The subset of a spot used by pickers and map overviews
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub status: SpotStatus,
    pub lat: f64,
    pub lng: f64,
}

/// Keeps the entries that are well-formed spot ids, dropping everything else
pub fn valid_ids(values: &[serde_json::Value]) -> Vec<Uuid> {
    values
        .iter()
        .filter_map(|value| value.as_str())
        .filter_map(|s| Uuid::parse_str(s).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: serde_json::Value) -> SpotInput {
        serde_json::from_value(value).unwrap()
    }

    fn factory() -> SpotInput {
        input(json!({
            "name": "  EX MANIFATTURA TABACCHI ",
            "location": "Milano, Italy",
            "lat": 45.4843,
            "lng": 9.1842,
            "description": "Ex tobacco factory from the 80s with original machinery.",
            "planA": "Side gate access on Via delle Industrie"
        }))
    }

    #[test]
    fn test_status_roundtrip() {
        assert_eq!(SpotStatus::parse("completed"), Some(SpotStatus::Completed));
        assert_eq!(SpotStatus::parse("abandoned"), None);
        assert_eq!(SpotStatus::Planned.as_str(), "planned");
    }

    #[test]
    fn test_create_defaults() {
        let now = Utc::now();
        let spot = Spot::create(factory(), now).unwrap();
        assert_eq!(spot.name, "EX MANIFATTURA TABACCHI");
        assert_eq!(spot.status, SpotStatus::Planned);
        assert!(spot.photos.is_empty());
        assert!(spot.alternative_spots.is_empty());
        assert_eq!(spot.created_at, now);
        assert_eq!(spot.updated_at, now);
    }

    #[test]
    fn test_create_reports_missing_fields() {
        let err = Spot::create(input(json!({ "name": "   ", "lat": 1.0 })), Utc::now()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name is required"));
        assert!(msg.contains("location is required"));
        assert!(msg.contains("lng is required"));
        assert!(!msg.contains("lat is required"));
    }

    #[test]
    fn test_create_rejects_unknown_status() {
        let mut fields = factory();
        fields.status = Some("abandoned".to_string());
        assert!(matches!(Spot::create(fields, Utc::now()), Err(Error::Validation(_))));
    }

    #[test]
    fn test_alternative_spots_drop_invalid_ids() {
        let id = Uuid::new_v4();
        let mut fields = factory();
        fields.alternative_spots = Some(vec![json!(id.to_string()), json!("nope"), json!(42)]);
        let spot = Spot::create(fields, Utc::now()).unwrap();
        assert_eq!(spot.alternative_spots, vec![id]);
    }

    #[test]
    fn test_apply_keeps_photos_when_absent() {
        let mut spot = Spot::create(factory(), Utc::now()).unwrap();
        spot.photos = vec!["/uploads/optimized-1.jpg".to_string()];

        let later = spot.updated_at + chrono::Duration::seconds(5);
        spot.apply(input(json!({ "status": "completed" })), later).unwrap();

        assert_eq!(spot.status, SpotStatus::Completed);
        assert_eq!(spot.photos, vec!["/uploads/optimized-1.jpg"]);
        assert_eq!(spot.updated_at, later);
        assert!(spot.created_at < later);
    }

    #[test]
    fn test_apply_is_atomic_on_error() {
        let mut spot = Spot::create(factory(), Utc::now()).unwrap();
        let before = spot.clone();
        let result = spot.apply(input(json!({ "name": "Renamed", "description": "" })), Utc::now());
        assert!(result.is_err());
        assert_eq!(spot, before);
    }

    #[test]
    fn test_wire_format() {
        let spot = Spot::create(factory(), Utc::now()).unwrap();
        let value = serde_json::to_value(&spot).unwrap();
        assert!(value.get("_id").is_some());
        assert_eq!(value["planA"], "Side gate access on Via delle Industrie");
        assert_eq!(value["status"], "planned");
        assert!(value["alternativeSpots"].is_array());
        assert!(value.get("createdAt").is_some());

        let back: Spot = serde_json::from_value(value).unwrap();
        assert_eq!(back, spot);
    }

    #[test]
    fn test_summary() {
        let spot = Spot::create(factory(), Utc::now()).unwrap();
        let value = serde_json::to_value(spot.summary()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 6);
        assert!(value.get("description").is_none());
    }
}
