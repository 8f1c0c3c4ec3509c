use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::utils::round2;
use crate::common::ServiceCategoryId;
use crate::domains::jobs::{JobError, JobResult};
use crate::domains::service_categories::find_service_category;
use crate::kernel::ServerDeps;

pub const CURRENCY: &str = "NGN";

/// Bounds of the random jitter applied to the base price range
pub const JITTER_RANGE: (f64, f64) = (0.8, 1.2);

/// Bounds of the reported confidence
pub const CONFIDENCE_RANGE: (f64, f64) = (0.7, 0.9);

/// Heuristic price range for one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub service_id: ServiceCategoryId,
    pub service_name: String,
    pub min_cost: f64,
    pub max_cost: f64,
    pub currency: String,
    pub confidence: f64,
    pub factors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration_hours: Option<f64>,
}

struct PriceBand {
    keywords: &'static [&'static str],
    min: f64,
    max: f64,
    hours: f64,
}

// Naira, typical Lagos/Abuja call-out prices
const PRICE_TABLE: &[PriceBand] = &[
    PriceBand { keywords: &["plumb"], min: 5_000.0, max: 25_000.0, hours: 2.0 },
    PriceBand { keywords: &["electric"], min: 7_000.0, max: 35_000.0, hours: 3.0 },
    PriceBand { keywords: &["carpent", "furniture"], min: 8_000.0, max: 40_000.0, hours: 4.0 },
    PriceBand { keywords: &["paint"], min: 15_000.0, max: 80_000.0, hours: 8.0 },
    PriceBand { keywords: &["clean"], min: 5_000.0, max: 20_000.0, hours: 3.0 },
    PriceBand { keywords: &["air condition", "hvac", "ac "], min: 10_000.0, max: 50_000.0, hours: 3.0 },
    PriceBand { keywords: &["appliance"], min: 6_000.0, max: 30_000.0, hours: 2.0 },
    PriceBand { keywords: &["generator"], min: 8_000.0, max: 45_000.0, hours: 3.0 },
    PriceBand { keywords: &["tiling", "mason"], min: 20_000.0, max: 100_000.0, hours: 10.0 },
    PriceBand { keywords: &["roof"], min: 25_000.0, max: 150_000.0, hours: 12.0 },
];

const FALLBACK_RANGE: (f64, f64) = (5_000.0, 30_000.0);

fn price_band(service_name: &str) -> Option<&'static PriceBand> {
    let name = format!("{} ", service_name.to_lowercase());
    PRICE_TABLE
        .iter()
        .find(|band| band.keywords.iter().any(|k| name.contains(k)))
}

/// Deterministic part of the estimate: base range scaled by `jitter`.
pub fn estimate_for(
    service_id: ServiceCategoryId,
    service_name: &str,
    jitter: f64,
    confidence: f64,
) -> CostEstimate {
    let band = price_band(service_name);
    let (min, max) = band.map_or(FALLBACK_RANGE, |b| (b.min, b.max));

    let mut factors = vec![
        format!("Service type: {}", service_name),
        "Typical market rates in your area".to_string(),
        "Final price depends on job complexity and materials".to_string(),
    ];
    if band.is_none() {
        factors.push("No price history for this service; using a general range".to_string());
    }

    CostEstimate {
        service_id,
        service_name: service_name.to_string(),
        min_cost: (min * jitter).round(),
        max_cost: (max * jitter).round(),
        currency: CURRENCY.to_string(),
        confidence: round2(confidence),
        factors,
        estimated_duration_hours: band.map(|b| b.hours),
    }
}

/// Placeholder cost estimate for a service category
pub async fn get_cost_estimate(
    service_id: ServiceCategoryId,
    deps: &ServerDeps,
) -> JobResult<CostEstimate> {
    let category = find_service_category(service_id, deps)
        .await?
        .ok_or_else(|| JobError::not_found(format!("service category {}", service_id)))?;

    let (jitter, confidence) = {
        let mut rng = rand::rng();
        (
            rng.random_range(JITTER_RANGE.0..=JITTER_RANGE.1),
            rng.random_range(CONFIDENCE_RANGE.0..=CONFIDENCE_RANGE.1),
        )
    };

    Ok(estimate_for(service_id, &category.name, jitter, confidence))
}
