/// CCIP-Read Gateway - off-chain name resolution
///
/// Answers EIP-3668 offchain lookups for ENSIP-10 wildcard names under a
/// configured root domain, signing every response with the gateway key.

mod api;
mod ccip;
mod config;
mod context;
mod crypto;
mod db;
mod error;
mod metrics;
mod resolver;
mod server;

use config::{GatewayConfig, LoggingConfig};
use context::AppContext;
use error::GatewayResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> GatewayResult<()> {
    // Load configuration (also reads .env, which may carry RUST_LOG)
    let config = GatewayConfig::from_env()?;

    // Initialize logging
    init_tracing(&config.logging);

    // Print banner
    print_banner();

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level)
        .unwrap_or_else(|_| "ccip_gateway=debug,tower_http=debug".into());

    let json = logging.json.then(|| tracing_subscriber::fmt::layer().json());
    let plain = (!logging.json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}

fn print_banner() {
    println!(
        r#"
   ______________  ____     ______      __
  / ____/ ____/  |/  / /   / ____/___ _/ /____ _      ______ ___  __
 / /   / /   / /|_/ / /   / / __/ __ `/ __/ _ \ | /| / / __ `/ / / /
/ /___/ /___/ /  / / /   / /_/ / /_/ / /_/  __/ |/ |/ / /_/ / /_/ /
\____/\____/_/  /_/_/    \____/\__,_/\__/\___/|__/|__/\__,_/\__, /
                                                           /____/
        CCIP-Read Gateway v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
