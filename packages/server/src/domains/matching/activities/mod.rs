pub mod analytics;
pub mod log_matches;
pub mod notify_artisans;
pub mod select_candidates;

pub use analytics::{get_matching_analytics, get_matching_logs};
pub use log_matches::{build_log_rows, log_matching_results};
pub use notify_artisans::{build_job_payload, notify_matched_artisans, truncate_description};
pub use select_candidates::{
    find_ranked_candidates, match_artisans_for_job, resolve_limit, run_matching,
};
