//! Entry point. Wires config -> session -> command script -> JSON snapshot.

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use portfolio_sim::config::{self, AppConfig};
use portfolio_sim::session::Session;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    // Load config
    let cfg_path = config::resolve_path();
    let cfg = AppConfig::load(&cfg_path)
        .with_context(|| format!("load config {}", cfg_path.display()))?;

    // Script: argv[1], else session.script from config
    let script_path = std::env::args()
        .nth(1)
        .or_else(|| cfg.session.script.clone())
        .context("no command script given (pass a path or set session.script)")?;
    let script = std::fs::read_to_string(&script_path)
        .with_context(|| format!("read script {script_path}"))?;

    let mut session = Session::from_config(&cfg);
    info!(
        "Session started. Cash={}, Stocks={}, Properties={}, Seed={:?}",
        cfg.session.starting_cash,
        cfg.market.stocks.len(),
        cfg.market.properties.len(),
        cfg.session.seed
    );

    let summary = session.run_script(&script);
    if summary.rejected > 0 || summary.unparsed > 0 {
        info!(
            "{} command(s) rejected, {} unparsed",
            summary.rejected, summary.unparsed
        );
    }

    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}
