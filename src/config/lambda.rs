use crate::config::{LISTING_BASE_URL, SEARCH_ENDPOINT};
use crate::core::store::PARTITION_KEY;
use crate::core::{Alert, Listing, Notifier, SeenRepository};
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_sns::Client as SnsClient;
use std::env;

/// Attribute holding the partition key on the seen-set item.
pub const PARTITION_KEY_ATTR: &str = "partition_key";

/// Attribute holding the seen identifier list on the seen-set item.
pub const SEEN_IDS_ATTR: &str = "seen_ids";

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub aws_region: String,
    pub aws_account_id: String,
    pub dynamo_table_name: String,
    pub sns_topic_name: String,
    pub search_endpoint: String,
    pub listing_base_url: String,
    pub mark_failed_notifications: bool,
}

impl LambdaConfig {
    /// Reads configuration from the environment. The four deployment
    /// values are required; their absence is a startup abort, not a
    /// runtime error.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            aws_region: required_env_var("AWS_REGION")?,
            aws_account_id: required_env_var("AWS_ACCOUNT_ID")?,
            dynamo_table_name: required_env_var("DYNAMO_TABLE_NAME")?,
            sns_topic_name: required_env_var("SNS_TOPIC_NAME")?,
            search_endpoint: env::var("SEARCH_ENDPOINT")
                .unwrap_or_else(|_| SEARCH_ENDPOINT.to_string()),
            listing_base_url: env::var("LISTING_BASE_URL")
                .unwrap_or_else(|_| LISTING_BASE_URL.to_string()),
            mark_failed_notifications: env::var("MARK_FAILED_NOTIFICATIONS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        })
    }

    pub fn topic_arn(&self) -> String {
        format!(
            "arn:aws:sns:{}:{}:{}",
            self.aws_region, self.aws_account_id, self.sns_topic_name
        )
    }
}

fn required_env_var(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| WatchError::MissingConfigError {
            field: key.to_string(),
        })
}

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_aws_region("aws_region", &self.aws_region)?;
        validate_non_empty_string("aws_account_id", &self.aws_account_id)?;
        validate_non_empty_string("dynamo_table_name", &self.dynamo_table_name)?;
        validate_non_empty_string("sns_topic_name", &self.sns_topic_name)?;
        validate_url("search_endpoint", &self.search_endpoint)?;
        validate_url("listing_base_url", &self.listing_base_url)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    crate::utils::validation::validate_non_empty_string(field_name, region)?;

    // AWS region format validation
    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Seen repository backed by one DynamoDB item under the fixed partition
/// key. The id list is stored as a list of strings.
#[derive(Debug, Clone)]
pub struct DynamoSeenRepository {
    client: DynamoClient,
    table_name: String,
}

impl DynamoSeenRepository {
    pub fn new(client: DynamoClient, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl SeenRepository for DynamoSeenRepository {
    async fn read(&self) -> Result<Option<Vec<String>>> {
        let resp = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY_ATTR, AttributeValue::S(PARTITION_KEY.to_string()))
            .send()
            .await
            .map_err(|e| WatchError::StoreError {
                message: format!("DynamoDB GetItem failed: {}", e),
            })?;

        let Some(item) = resp.item else {
            return Ok(None);
        };

        // An item without the attribute is a present-but-empty record.
        let Some(attr) = item.get(SEEN_IDS_ATTR) else {
            return Ok(Some(Vec::new()));
        };

        let values = attr.as_l().map_err(|_| WatchError::StoreError {
            message: format!("Malformed '{}' attribute: expected a list", SEEN_IDS_ATTR),
        })?;

        let mut seen_ids = Vec::with_capacity(values.len());
        for value in values {
            let id = value.as_s().map_err(|_| WatchError::StoreError {
                message: format!(
                    "Malformed '{}' attribute: expected string elements",
                    SEEN_IDS_ATTR
                ),
            })?;
            seen_ids.push(id.clone());
        }
        Ok(Some(seen_ids))
    }

    async fn write(&self, seen_ids: &[String]) -> Result<()> {
        let ids = seen_ids
            .iter()
            .map(|id| AttributeValue::S(id.clone()))
            .collect();

        self.client
            .put_item()
            .table_name(&self.table_name)
            .item(PARTITION_KEY_ATTR, AttributeValue::S(PARTITION_KEY.to_string()))
            .item(SEEN_IDS_ATTR, AttributeValue::L(ids))
            .send()
            .await
            .map_err(|e| WatchError::StoreError {
                message: format!("DynamoDB PutItem failed: {}", e),
            })?;

        Ok(())
    }
}

/// Notifier publishing one message per listing to an SNS topic.
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: SnsClient,
    topic_arn: String,
    base_url: String,
}

impl SnsNotifier {
    pub fn new(client: SnsClient, topic_arn: String, base_url: String) -> Self {
        Self {
            client,
            topic_arn,
            base_url,
        }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn send(&self, listing: &Listing) -> Result<()> {
        let alert = Alert::for_listing(listing, &self.base_url);

        self.client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(&alert.subject)
            .message(&alert.message)
            .send()
            .await
            .map_err(|e| WatchError::NotifyError {
                message: format!("SNS publish failed: {}", e),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_arn_format() {
        let config = LambdaConfig {
            aws_region: "ca-central-1".to_string(),
            aws_account_id: "123456789012".to_string(),
            dynamo_table_name: "listings".to_string(),
            sns_topic_name: "new-listings".to_string(),
            search_endpoint: SEARCH_ENDPOINT.to_string(),
            listing_base_url: LISTING_BASE_URL.to_string(),
            mark_failed_notifications: true,
        };
        assert_eq!(
            config.topic_arn(),
            "arn:aws:sns:ca-central-1:123456789012:new-listings"
        );
    }

    #[test]
    fn test_validate_aws_region() {
        assert!(validate_aws_region("aws_region", "ca-central-1").is_ok());
        assert!(validate_aws_region("aws_region", "").is_err());
        assert!(validate_aws_region("aws_region", "CA-CENTRAL-1").is_err());
    }
}
