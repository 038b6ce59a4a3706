#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_dynamodb::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_dynamodb::Client as DynamoClient;
#[cfg(feature = "lambda")]
use aws_sdk_sns::Client as SnsClient;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use listing_watch::config::criteria::SearchCriteria;
#[cfg(feature = "lambda")]
use listing_watch::config::lambda::{DynamoSeenRepository, LambdaConfig, SnsNotifier};
#[cfg(feature = "lambda")]
use listing_watch::core::{engine::WatchEngine, source::RealtorSource, store::SeenSetStore};
#[cfg(feature = "lambda")]
use listing_watch::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use listing_watch::MarkPolicy;
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub search_endpoint: Option<String>,
    pub dynamo_table_name: Option<String>,
    pub sns_topic_name: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub listings_fetched: usize,
    pub alerts_sent: usize,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting listing-watch Lambda function");

    // Event fields override their environment counterparts.
    if let Some(endpoint) = &event.payload.search_endpoint {
        std::env::set_var("SEARCH_ENDPOINT", endpoint);
    }
    if let Some(table) = &event.payload.dynamo_table_name {
        std::env::set_var("DYNAMO_TABLE_NAME", table);
    }
    if let Some(topic) = &event.payload.sns_topic_name {
        std::env::set_var("SNS_TOPIC_NAME", topic);
    }

    let config =
        LambdaConfig::from_env().map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let region = Region::new(config.aws_region.clone());
    let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&aws_config)
        .region(region)
        .build();
    let sns_config = aws_sdk_sns::config::Builder::from(&aws_config)
        .region(aws_sdk_sns::config::Region::new(config.aws_region.clone()))
        .build();

    let source = RealtorSource::new(config.search_endpoint.clone(), SearchCriteria::default());
    let store = SeenSetStore::new(DynamoSeenRepository::new(
        DynamoClient::from_conf(dynamo_config),
        config.dynamo_table_name.clone(),
    ));
    let notifier = SnsNotifier::new(
        SnsClient::from_conf(sns_config),
        config.topic_arn(),
        config.listing_base_url.clone(),
    );

    let mark_policy = if config.mark_failed_notifications {
        MarkPolicy::AlwaysMark
    } else {
        MarkPolicy::MarkOnSuccess
    };

    let mut engine = WatchEngine::new(source, store, notifier).with_mark_policy(mark_policy);
    let report = engine
        .run()
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    tracing::info!(
        "Listing-watch Lambda completed: {} fetched, {} alerts",
        report.listings_fetched,
        report.alerts_sent
    );
    Ok(Response {
        message: "Listing watch run completed".to_string(),
        listings_fetched: report.listings_fetched,
        alerts_sent: report.alerts_sent,
    })
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
