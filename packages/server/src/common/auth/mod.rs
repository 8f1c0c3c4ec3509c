/// Authorization module
///
/// Provides the authenticated `Actor` (built from verified JWT claims) and the
/// ownership / role checks the job routes rely on:
///
/// ```rust,ignore
/// actor.require_admin()?;
/// actor.can_view(job.user_id, job.assigned_artisan_id)?;
/// ```
mod actor;
mod errors;

pub use actor::{Actor, Role};
pub use errors::AuthError;
