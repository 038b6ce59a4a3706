pub mod criteria;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "lambda")]
pub mod lambda;

#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

/// Property-search endpoint of the upstream listing service.
pub const SEARCH_ENDPOINT: &str = "https://api2.realtor.ca/Listing.svc/PropertySearch_Post";

/// Base origin for browsable listing URLs.
pub const LISTING_BASE_URL: &str = "https://realtor.ca";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "listing-watch")]
#[command(about = "Watches a realtor.ca search and alerts on new listings")]
pub struct CliConfig {
    #[arg(long, default_value = SEARCH_ENDPOINT)]
    pub search_endpoint: String,

    #[arg(long, default_value = LISTING_BASE_URL)]
    pub listing_base_url: String,

    #[arg(long, default_value = "./seen_listings.json")]
    pub seen_file: String,

    #[arg(long, help = "JSON file overriding the default search criteria")]
    pub criteria_file: Option<String>,

    #[arg(
        long,
        help = "Leave a listing unseen when its alert fails, so the next run retries it"
    )]
    pub retry_failed_alerts: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_url("search_endpoint", &self.search_endpoint)?;
        validate_url("listing_base_url", &self.listing_base_url)?;
        validate_path("seen_file", &self.seen_file)?;
        if let Some(criteria_file) = &self.criteria_file {
            validate_path("criteria_file", criteria_file)?;
        }
        Ok(())
    }
}
