use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::{info, instrument};

use crate::domains::jobs::models::Job;
use crate::domains::matching::models::JobMatchingResult;
use crate::domains::service_categories::find_service_category;
use crate::kernel::{PushPayload, ServerDeps};

/// Longest description preview carried in a push
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// Cut the description to at most 100 characters, ending in "..." when cut
pub fn truncate_description(description: &str) -> String {
    let description = description.trim();
    if description.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        return description.to_string();
    }

    let mut preview: String = description
        .chars()
        .take(DESCRIPTION_PREVIEW_CHARS - 3)
        .collect();
    preview.push_str("...");
    preview
}

/// Push content announcing a job to the selected artisans.
///
/// `None` when nobody was selected.
pub fn build_job_payload(
    job: &Job,
    service_name: &str,
    selected: &[JobMatchingResult],
) -> Option<PushPayload> {
    let nearest_km = selected
        .iter()
        .map(|r| r.distance_km)
        .min_by(|a, b| a.total_cmp(b))?;
    let preview = truncate_description(&job.description);

    Some(PushPayload {
        title: format!("New {} job nearby", service_name),
        body: format!("{} ({:.2} km away)", preview, nearest_km),
        data: json!({
            "type": "NEW_JOB",
            "jobId": job.id,
            "serviceName": service_name,
            "description": preview,
            "distanceKm": nearest_km,
        }),
    })
}

/// Send one multicast push to the devices of the selected artisans.
///
/// Returns the number of tokens the push went to; 0 when there was nobody
/// to notify or no registered device.
#[instrument(skip(job, selected, deps), fields(job_id = %job.id, selected = selected.len()))]
pub async fn notify_matched_artisans(
    job: &Job,
    selected: &[JobMatchingResult],
    deps: &ServerDeps,
) -> Result<usize> {
    if selected.is_empty() {
        return Ok(0);
    }

    let service_name = find_service_category(job.service_category_id, deps)
        .await?
        .map(|c| c.name)
        .unwrap_or_else(|| "Service".to_string());

    let Some(payload) = build_job_payload(job, &service_name, selected) else {
        return Ok(0);
    };

    let artisan_ids: Vec<_> = selected.iter().map(|r| r.artisan_id).collect();
    let tokens = deps.store.find_push_tokens(&artisan_ids).await?;

    if tokens.is_empty() {
        info!("No push tokens registered for selected artisans, skipping dispatch");
        return Ok(0);
    }

    let timeout = deps.matching.notification_timeout;
    tokio::time::timeout(timeout, deps.push_service.send_multicast(&tokens, payload))
        .await
        .map_err(|_| anyhow!("push dispatch timed out after {:?}", timeout))??;

    info!(recipients = tokens.len(), "Job push notification sent");
    Ok(tokens.len())
}
