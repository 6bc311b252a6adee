use anyhow::{bail, Result};
use clap::Parser;
use enasurvey::{
    config::{Args, Config},
    pipeline,
};
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let config = Config::from(Args::parse());
    info!(directory = %config.workdir.display(), offline = config.offline, "startup");

    // ─── 3) fetch + reshape every search ─────────────────────────────
    let start = Instant::now();
    let summary = pipeline::run(&config).await?;

    for outcome in &summary.outcomes {
        info!(
            query = %outcome.name,
            source = ?outcome.source,
            records = outcome.records,
            country_dates = outcome.country_dates,
            countries = outcome.countries,
            "done"
        );
    }

    if !summary.is_success() {
        bail!(
            "{} of {} searches failed",
            summary.failures.len(),
            summary.failures.len() + summary.outcomes.len()
        );
    }
    info!(elapsed = ?start.elapsed(), "all done");
    Ok(())
}
