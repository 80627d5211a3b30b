use beacon_loss::estimator::{self, EstimateError, LinkConfig};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), EstimateError> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=error", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LinkConfig::default();
    let loss = estimator::estimate(&config)?;

    println!("{config}");
    println!();
    println!("{loss}");

    Ok(())
}
