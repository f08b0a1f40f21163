//! Visualization projection for the Zalando radar renderer.

use crate::config::RadarConfig;
use crate::error::MappingError;
use crate::ordinal::{quadrant_index, ring_index, status_moved_flag};
use crate::types::{BlipRecord, ZalandoEntry, ZalandoRadarData};

/// Project one blip onto radar coordinates.
pub fn to_zalando_entry(blip: &BlipRecord, config: &RadarConfig) -> Result<ZalandoEntry, MappingError> {
    Ok(ZalandoEntry {
        label: blip.name.clone(),
        quadrant: quadrant_index(&blip.quadrant, &config.quadrants)?,
        ring: ring_index(blip.ring),
        moved: status_moved_flag(blip.status),
    })
}

/// Project every blip, in input order. Fails on the first unknown quadrant.
pub fn to_zalando_entries<'a, I>(blips: I, config: &RadarConfig) -> Result<Vec<ZalandoEntry>, MappingError>
where
    I: IntoIterator<Item = &'a BlipRecord>,
{
    blips
        .into_iter()
        .map(|blip| to_zalando_entry(blip, config))
        .collect()
}

/// The `{ entries, config }` payload written to `data/entries.json`.
pub fn radar_data<'a, I>(blips: I, config: &RadarConfig) -> Result<ZalandoRadarData, MappingError>
where
    I: IntoIterator<Item = &'a BlipRecord>,
{
    let entries = to_zalando_entries(blips, config)?;
    tracing::debug!(entries = entries.len(), "Built radar projection");
    Ok(ZalandoRadarData {
        entries,
        config: config.clone(),
    })
}
