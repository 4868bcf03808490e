//! LinkTopics license verification server
//!
//! Exchanges a completed Stripe checkout session for a signed license
//! token that the site stores and hands to the browser extension.
//!
//! Usage:
//!   STRIPE_SECRET_KEY=sk_... LICENSE_JWT_SECRET=... linktopics-api --port 3000
//!
//! The server is stateless and doesn't store any customer data.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use linktopics_api::{build_router, AppState, VERIFY_PATH};
use linktopics_checkout::StripeConfig;
use linktopics_license::IssuerConfig;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "linktopics-api")]
#[command(about = "LinkTopics license verification endpoint")]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// HTTP port
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Stripe secret API key
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    stripe_secret_key: String,

    /// Base URL of the Stripe API
    #[arg(long, env = "STRIPE_API_BASE", default_value = "https://api.stripe.com")]
    stripe_api_base: String,

    /// Timeout for Stripe requests in seconds (none by default)
    #[arg(long, env = "STRIPE_TIMEOUT_SECS")]
    stripe_timeout_secs: Option<u64>,

    /// Secret used to sign license tokens
    #[arg(long, env = "LICENSE_JWT_SECRET", hide_env_values = true)]
    license_secret: String,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("LinkTopics license API starting...");

    let stripe = StripeConfig {
        secret_key: args.stripe_secret_key,
        api_base_url: args.stripe_api_base,
        request_timeout_secs: args.stripe_timeout_secs,
    };
    let issuer = IssuerConfig::with_secret(args.license_secret);
    info!("Issuing {}-day licenses as '{}'", issuer.validity_days, issuer.issuer);

    let state = Arc::new(AppState::from_config(stripe, issuer)?);
    let app = build_router(state);

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{}{}", addr, VERIFY_PATH);

    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
