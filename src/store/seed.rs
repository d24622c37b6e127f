use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::SpotStore;
use crate::error::Result;
use crate::types::{Spot, SpotStatus};

/// Three example spots; the first two reference each other as alternatives
pub fn sample_spots(now: DateTime<Utc>) -> Vec<Spot> {
    let samples = [
        (
            "EX MANIFATTURA TABACCHI",
            "Milano, Italy",
            SpotStatus::Planned,
            45.4843,
            9.1842,
            "Ex tobacco factory from the 80s with original machinery.",
            "Side gate access on Via delle Industrie",
        ),
        (
            "ABANDONED HOSPITAL",
            "Roma, Italy",
            SpotStatus::Completed,
            41.9028,
            12.4964,
            "Old psychiatric hospital abandoned since 1999.",
            "Main entrance from the east side",
        ),
        (
            "GHOST VILLAGE",
            "Abruzzo, Italy",
            SpotStatus::Planned,
            42.08,
            13.65,
            "Completely abandoned medieval village.",
            "Hiking trail from nearby town",
        ),
    ];

    let mut spots: Vec<Spot> = samples
        .into_iter()
        .enumerate()
        .map(|(i, (name, location, status, lat, lng, description, plan_a))| {
            // distinct creation times keep "newest first" listings stable
            let created_at = now + Duration::milliseconds(i as i64);
            Spot {
                id: Uuid::new_v4(),
                name: name.to_string(),
                location: location.to_string(),
                status,
                lat,
                lng,
                description: description.to_string(),
                plan_a: Some(plan_a.to_string()),
                alternative_spots: Vec::new(),
                photos: Vec::new(),
                created_at,
                updated_at: created_at,
            }
        })
        .collect();

    let ids: Vec<Uuid> = spots.iter().map(|s| s.id).collect();
    spots[0].alternative_spots = vec![ids[1], ids[2]];
    spots[1].alternative_spots = vec![ids[0]];
    spots
}

/// Inserts the sample spots when the store holds no spots.
///
/// Returns the number of spots inserted.
pub fn seed_if_empty(store: &dyn SpotStore) -> Result<usize> {
    let count = store.count()?;
    tracing::info!(count, "spots in store");
    if count > 0 {
        return Ok(0);
    }

    tracing::info!("inserting sample spots");
    let spots = sample_spots(Utc::now());
    let inserted = spots.len();
    for spot in spots {
        store.insert(spot)?;
    }
    Ok(inserted)
}
