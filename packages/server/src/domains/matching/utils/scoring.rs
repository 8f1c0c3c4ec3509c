use std::cmp::Ordering;

use crate::common::utils::{calculate_distance, round2};
use crate::domains::matching::models::{ArtisanCandidate, JobMatchingResult};

/// Bonus added for artisans currently online
pub const ONLINE_BONUS: f64 = 2.0;

/// Distance at which the proximity component reaches zero
pub const DISTANCE_SCORE_CUTOFF_KM: f64 = 5.0;

/// Weighted match score of one candidate
///
/// `max(0, 5 - distance) + 2 * rating + specialization + (2 if online)`,
/// rounded to 2 decimal places.
pub fn calculate_match_score(
    distance_km: f64,
    rating: f64,
    specialization_level: i32,
    is_online: bool,
) -> f64 {
    let distance_score = (DISTANCE_SCORE_CUTOFF_KM - distance_km).max(0.0);
    let rating_score = rating * 2.0;
    let specialization_score = f64::from(specialization_level);
    let online_bonus = if is_online { ONLINE_BONUS } else { 0.0 };

    round2(distance_score + rating_score + specialization_score + online_bonus)
}

/// Ranking order: score desc, distance asc, rating desc, artisan id asc.
///
/// Total over finite inputs, so repeated runs return the same order.
pub fn compare_results(a: &JobMatchingResult, b: &JobMatchingResult) -> Ordering {
    b.match_score
        .total_cmp(&a.match_score)
        .then_with(|| a.distance_km.total_cmp(&b.distance_km))
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| a.artisan_id.cmp(&b.artisan_id))
}

/// Score a single candidate against the job location.
///
/// Returns `None` for candidates without coordinates.
pub fn score_candidate(
    job_lat: f64,
    job_lon: f64,
    candidate: &ArtisanCandidate,
) -> Option<JobMatchingResult> {
    let (lat, lon) = (candidate.latitude?, candidate.longitude?);
    let distance_km = calculate_distance(job_lat, job_lon, lat, lon);
    let specialization_level = candidate.specialization_level.max(1);

    Some(JobMatchingResult {
        artisan_id: candidate.id,
        artisan_name: candidate.name.clone(),
        photo_url: candidate.photo_url.clone(),
        match_score: calculate_match_score(
            distance_km,
            candidate.average_rating,
            specialization_level,
            candidate.is_online,
        ),
        distance_km,
        rating: candidate.average_rating,
        specialization_level,
        is_online: candidate.is_online,
        service_radius_km: candidate.service_radius_km,
    })
}

/// Every scored candidate plus the top-K that made the cut
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    /// All scored candidates, ranked, including those outside their radius
    pub evaluated: Vec<JobMatchingResult>,
    /// Candidates within their own service radius, ranked and truncated
    pub selected: Vec<JobMatchingResult>,
}

/// Score, filter by each artisan's own service radius, rank and truncate.
pub fn rank_candidates(
    job_lat: f64,
    job_lon: f64,
    candidates: &[ArtisanCandidate],
    limit: usize,
) -> Ranking {
    let mut evaluated: Vec<JobMatchingResult> = candidates
        .iter()
        .filter_map(|c| score_candidate(job_lat, job_lon, c))
        .collect();
    evaluated.sort_by(compare_results);

    let selected = evaluated
        .iter()
        .filter(|r| r.is_within_service_radius())
        .take(limit)
        .cloned()
        .collect();

    Ranking {
        evaluated,
        selected,
    }
}
