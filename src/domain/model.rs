use serde::{Deserialize, Serialize};

/// Subject line for every listing alert.
pub const ALERT_SUBJECT: &str = "New listing on Realtor.ca";

/// One listing as returned by the upstream search endpoint.
/// Immutable once fetched; lives for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "RelativeDetailsURL")]
    pub relative_details_url: String,
}

impl Listing {
    /// Absolute browsable URL for this listing.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.relative_details_url)
    }
}

/// Envelope of the upstream search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    #[serde(rename = "Results", default)]
    pub results: Vec<Listing>,
}

/// Durable shape of the seen-set record. A single record per deployment,
/// addressed by the fixed partition key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeenRecord {
    pub partition_key: String,
    #[serde(default)]
    pub seen_ids: Vec<String>,
}

/// A formatted alert ready for dispatch. Transient, exists only as the
/// notifier's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub subject: String,
    pub message: String,
}

impl Alert {
    pub fn for_listing(listing: &Listing, base_url: &str) -> Self {
        Self {
            subject: ALERT_SUBJECT.to_string(),
            message: listing.url(base_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_concatenates_base_and_relative_path() {
        let listing = Listing {
            id: "12345".to_string(),
            relative_details_url: "/real-estate/12345/some-house".to_string(),
        };
        assert_eq!(
            listing.url("https://realtor.ca"),
            "https://realtor.ca/real-estate/12345/some-house"
        );
    }

    #[test]
    fn test_alert_for_listing() {
        let listing = Listing {
            id: "12345".to_string(),
            relative_details_url: "/real-estate/12345/some-house".to_string(),
        };
        let alert = Alert::for_listing(&listing, "https://realtor.ca");
        assert_eq!(alert.subject, ALERT_SUBJECT);
        assert_eq!(alert.message, "https://realtor.ca/real-estate/12345/some-house");
    }

    #[test]
    fn test_search_results_decode_upstream_field_names() {
        let json = serde_json::json!({
            "Results": [
                {"Id": "1", "RelativeDetailsURL": "/real-estate/1/a"},
                {"Id": "2", "RelativeDetailsURL": "/real-estate/2/b"}
            ]
        });
        let results: SearchResults = serde_json::from_value(json).unwrap();
        assert_eq!(results.results.len(), 2);
        assert_eq!(results.results[0].id, "1");
        assert_eq!(results.results[1].relative_details_url, "/real-estate/2/b");
    }

    #[test]
    fn test_search_results_missing_results_field_is_empty() {
        let results: SearchResults = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(results.results.is_empty());
    }
}
