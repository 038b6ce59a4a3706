pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{
    cli::{FileSeenRepository, LogNotifier},
    CliConfig,
};

#[cfg(feature = "lambda")]
pub use crate::config::lambda::{DynamoSeenRepository, LambdaConfig, SnsNotifier};

pub use crate::core::{
    engine::{MarkPolicy, RunReport, WatchEngine},
    source::RealtorSource,
    store::SeenSetStore,
};
pub use crate::domain::model::{Alert, Listing, SearchResults, SeenRecord};
pub use crate::domain::ports::{ListingSource, Notifier, SeenRepository, SeenStore};
pub use crate::utils::error::{Result, WatchError};
