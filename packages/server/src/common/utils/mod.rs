pub mod expo;
pub mod geolocation;

pub use expo::ExpoClient;
pub use geolocation::*;
