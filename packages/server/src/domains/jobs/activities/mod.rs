pub mod assign_artisan;
pub mod create_job;
pub mod get_job;
pub mod update_status;

pub use assign_artisan::{assign_artisan_to_job, AssignArtisanInput};
pub use create_job::{create_job, CreateJobInput, JobCreation};
pub use get_job::{get_job, get_job_matches};
pub use update_status::update_job_status;
