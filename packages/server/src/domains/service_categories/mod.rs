pub mod lookup;
pub mod models;

pub use lookup::find_service_category;
pub use models::ServiceCategory;
