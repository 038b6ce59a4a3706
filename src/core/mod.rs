pub mod engine;
pub mod source;
pub mod store;

pub use crate::domain::model::{Alert, Listing, SearchResults, SeenRecord};
pub use crate::domain::ports::{ListingSource, Notifier, SeenRepository, SeenStore};
pub use crate::utils::error::Result;
