use clap::Parser;
use listing_watch::config::criteria::SearchCriteria;
use listing_watch::utils::{logger, validation::Validate};
use listing_watch::{
    CliConfig, FileSeenRepository, LogNotifier, MarkPolicy, RealtorSource, SeenSetStore,
    WatchEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting listing-watch CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let criteria = match &config.criteria_file {
        Some(path) => match SearchCriteria::from_json_file(path) {
            Ok(criteria) => criteria,
            Err(e) => {
                tracing::error!("❌ {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
        None => SearchCriteria::default(),
    };

    let mark_policy = if config.retry_failed_alerts {
        MarkPolicy::MarkOnSuccess
    } else {
        MarkPolicy::AlwaysMark
    };

    let source = RealtorSource::new(config.search_endpoint.clone(), criteria);
    let store = SeenSetStore::new(FileSeenRepository::new(config.seen_file.clone()));
    let notifier = LogNotifier::new(config.listing_base_url.clone());

    let mut engine = WatchEngine::new(source, store, notifier).with_mark_policy(mark_policy);

    match engine.run().await {
        Ok(report) => {
            tracing::info!(
                "✅ Run completed: {} listings fetched, {} alerts sent",
                report.listings_fetched,
                report.alerts_sent
            );
            println!(
                "✅ Run completed: {} listings fetched, {} alerts sent",
                report.listings_fetched, report.alerts_sent
            );
        }
        Err(e) => {
            tracing::error!("❌ Run failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
