pub mod analytics;
pub mod artisan;
pub mod matching_log;
pub mod matching_result;

pub use analytics::MatchingAnalytics;
pub use artisan::{ArtisanCandidate, ArtisanSummary, EligibleArtisanQuery};
pub use matching_log::{JobMatchingLog, NewMatchingLog};
pub use matching_result::{JobMatchingResult, MatchOutcome};
