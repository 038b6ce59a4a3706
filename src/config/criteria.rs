use crate::utils::error::{Result, WatchError};
use serde::{Deserialize, Serialize};

/// Form-encoded payload for the property-search endpoint. Field names are
/// the upstream's PascalCase parameters; values stay strings because the
/// endpoint takes everything form-encoded.
///
/// The defaults describe the deployed search: a Kitchener/Waterloo
/// bounding box, 3+ bed / 2+ bath houses between 539k and 701k CAD.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SearchCriteria {
    pub zoom_level: String,
    pub latitude_max: String,
    pub longitude_max: String,
    pub latitude_min: String,
    pub longitude_min: String,
    pub sort: String,
    #[serde(rename = "PropertyTypeGroupID")]
    pub property_type_group_id: String,
    pub property_search_type_id: String,
    pub transaction_type_id: String,
    pub price_min: String,
    pub price_max: String,
    pub bed_range: String,
    pub bath_range: String,
    pub building_type_id: String,
    pub construction_style_id: String,
    pub currency: String,
    pub records_per_page: String,
    pub application_id: String,
    pub culture_id: String,
    pub version: String,
    pub current_page: String,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            zoom_level: "13".to_string(),
            latitude_max: "43.51949".to_string(),
            longitude_max: "-80.43042".to_string(),
            latitude_min: "43.42644".to_string(),
            longitude_min: "-80.66406".to_string(),
            sort: "6-D".to_string(),
            property_type_group_id: "1".to_string(),
            property_search_type_id: "1".to_string(),
            transaction_type_id: "2".to_string(),
            price_min: "539000".to_string(),
            price_max: "701000".to_string(),
            bed_range: "3-0".to_string(),
            bath_range: "2-0".to_string(),
            building_type_id: "1".to_string(),
            construction_style_id: "3".to_string(),
            currency: "CAD".to_string(),
            records_per_page: "20".to_string(),
            application_id: "1".to_string(),
            culture_id: "1".to_string(),
            version: "7.0".to_string(),
            current_page: String::new(),
        }
    }
}

impl SearchCriteria {
    /// Loads criteria from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &str) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| WatchError::ConfigError {
            message: format!("Failed to read criteria file {}: {}", path, e),
        })?;
        serde_json::from_slice(&data).map_err(|e| WatchError::ConfigError {
            message: format!("Failed to parse criteria file {}: {}", path, e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria_serialize_with_upstream_names() {
        let value = serde_json::to_value(SearchCriteria::default()).unwrap();
        assert_eq!(value["ZoomLevel"], "13");
        assert_eq!(value["LatitudeMax"], "43.51949");
        assert_eq!(value["PropertyTypeGroupID"], "1");
        assert_eq!(value["TransactionTypeId"], "2");
        assert_eq!(value["PriceMin"], "539000");
        assert_eq!(value["BedRange"], "3-0");
        assert_eq!(value["Currency"], "CAD");
        assert_eq!(value["CurrentPage"], "");
    }

    #[test]
    fn test_partial_json_keeps_defaults_for_missing_fields() {
        let criteria: SearchCriteria =
            serde_json::from_str(r#"{"PriceMin": "600000", "PriceMax": "800000"}"#).unwrap();
        assert_eq!(criteria.price_min, "600000");
        assert_eq!(criteria.price_max, "800000");
        assert_eq!(criteria.bed_range, "3-0");
        assert_eq!(criteria.records_per_page, "20");
    }
}
