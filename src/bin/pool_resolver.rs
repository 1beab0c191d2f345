//! Resolve a request pool and print where it lands and its limits.
//!
//! Configuration comes from the environment (and `.env`), see
//! `request_pool_resolver::config::resolver`.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use request_pool_resolver::builders::ResolverBuilder;
use request_pool_resolver::config::ResolverConfig;
use request_pool_resolver::core::AppResult;
use request_pool_resolver::runtime::{lookup, AsyncPoolResolver};
use request_pool_resolver::util::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "pool-resolver", version, about)]
struct Args {
    /// Pool named by the request.
    #[arg(long, default_value = "")]
    pool: String,
    /// Submitting user.
    #[arg(long, env = "USER")]
    user: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let resolver = match build_resolver() {
        Ok(resolver) => resolver,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "pool resolver startup failed");
            return ExitCode::from(1);
        }
    };

    match lookup(&resolver, &args.pool, &args.user).await {
        Ok(found) => match serde_json::to_string_pretty(&found) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to render lookup");
                ExitCode::from(2)
            }
        },
        Err(e) => {
            tracing::error!(pool = %args.pool, user = %args.user, error = %e, "pool lookup failed");
            ExitCode::from(2)
        }
    }
}

fn build_resolver() -> AppResult<AsyncPoolResolver> {
    let config = ResolverConfig::from_env().context("loading resolver configuration")?;
    let resolver = ResolverBuilder::new(config)
        .build()
        .context("building pool resolver")?;
    Ok(resolver.into())
}
