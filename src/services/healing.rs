//! Healing event listing

use crate::models::HealingEvent;
use crate::services::tsuru::{SessionToken, TsuruClient, TsuruError};

/// Length container IDs are shortened to for display
pub const SHORT_ID_LEN: usize = 12;

/// First [`SHORT_ID_LEN`] characters of a container ID
pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

/// Shorten container IDs and attach the failing app name
pub fn format_event(mut event: HealingEvent) -> HealingEvent {
    event.failing_container.id = short_id(&event.failing_container.id);
    if let Some(created) = event.created_container.as_mut() {
        created.id = short_id(&created.id);
    }
    event.app = event.failing_container.app_name.clone();
    event
}

/// Fetch and format every healing event
pub async fn list_healing(
    client: &TsuruClient,
    token: &SessionToken,
) -> Result<Vec<HealingEvent>, TsuruError> {
    let events = client.list_healing_events(token).await?;
    Ok(events.into_iter().map(format_event).collect())
}
