//! Event configuration.

use crate::errors::RsvpError;
use crate::messages::config_display_name;
use crate::models::{ConfigEntry, ConfigKey, ConfigUpdate};
use crate::repositories::event_configs;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Every known key with its label and current value, sorted by key.
///
/// Keys missing from the table are listed with an empty value.
pub async fn list_configs(pool: &PgPool) -> Result<Vec<ConfigEntry>, RsvpError> {
    let stored: BTreeMap<String, String> = event_configs::list(pool)
        .await?
        .into_iter()
        .map(|row| (row.config_key, row.value))
        .collect();

    let mut entries: Vec<ConfigEntry> = ConfigKey::ALL
        .iter()
        .map(|key| ConfigEntry {
            key: key.as_str().to_string(),
            display_name: config_display_name(*key).to_string(),
            display_type: key.display_type().to_string(),
            value: stored.get(key.as_str()).cloned().unwrap_or_default(),
        })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(entries)
}

/// Apply all updates in one transaction; an unknown key rejects the batch.
#[instrument(skip_all, name = "rsvp.services.config.update", fields(count = updates.len()))]
pub async fn update_configs(pool: &PgPool, updates: Vec<ConfigUpdate>) -> Result<(), RsvpError> {
    let parsed = updates
        .into_iter()
        .map(|update| {
            update
                .key
                .parse::<ConfigKey>()
                .map(|key| (key, update.value))
                .map_err(RsvpError::BadRequest)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut tx = pool.begin().await?;
    for (key, value) in &parsed {
        event_configs::upsert(&mut *tx, key.as_str(), value.trim(), key.display_type()).await?;
    }
    tx.commit().await?;

    info!(target: "rsvp.services.config", count = parsed.len(), "Event configuration updated");
    Ok(())
}

/// Event details visible to every signed-in account, as a key/value map.
pub async fn event_details(pool: &PgPool) -> Result<BTreeMap<String, String>, RsvpError> {
    Ok(event_configs::list(pool)
        .await?
        .into_iter()
        .map(|row| (row.config_key, row.value))
        .collect())
}
