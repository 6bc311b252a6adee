// src/pipeline.rs

use anyhow::{Context, Result};
use futures::future::join_all;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::{
    aggregate::cumulative_by_country,
    catalog::{searches, QuerySpec},
    config::Config,
    fetch::{fetch_all, EnaClient, PageFetcher},
    report::{country_totals, daily_series, totals_table, CountryLookup},
    store::ResultStore,
    table::RecordTable,
};

/// Where a query's raw table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Fetched { pages: usize },
    /// Page count recorded when the table was saved, if known.
    Stored { pages: Option<usize> },
}

/// What one search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub name: String,
    pub source: Source,
    pub records: usize,
    pub country_dates: usize,
    pub countries: usize,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<QueryOutcome>,
    pub failures: Vec<(String, anyhow::Error)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn push(&mut self, name: &str, result: Result<QueryOutcome>) {
        match result {
            Ok(outcome) => self.outcomes.push(outcome),
            Err(e) => {
                error!(query = name, error = %format_args!("{e:#}"), "search failed");
                self.failures.push((name.to_string(), e));
            }
        }
    }
}

/// Run every catalog search, either against the portal or from the
/// tables an earlier run saved.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let store = ResultStore::new(&config.workdir)
        .with_context(|| format!("opening store in {}", config.workdir.display()))?;
    let lookup = match &config.country_mapping {
        Some(path) => CountryLookup::load(path)?,
        None => {
            warn!("no country mapping given; map rows will carry unknown ISO codes");
            CountryLookup::default()
        }
    };
    info!(countries = lookup.len(), "country lookup ready");

    if config.offline {
        Ok(run_offline(&store, &lookup, config))
    } else {
        let client = EnaClient::new(&config.base_url, config.timeout)?;
        Ok(run_online(&client, &store, &lookup, config).await)
    }
}

/// Fetch all searches concurrently; each one pages on its own.
pub async fn run_online<F: PageFetcher>(
    fetcher: &F,
    store: &ResultStore,
    lookup: &CountryLookup,
    config: &Config,
) -> RunSummary {
    let specs = searches();
    let results = join_all(specs.iter().map(|spec| async move {
        let (raw, pages) = retrieve(fetcher, spec, store, config.page_size).await?;
        reshape(spec, raw, Source::Fetched { pages }, store, lookup, config)
    }))
    .await;

    let mut summary = RunSummary::default();
    for (spec, result) in specs.iter().zip(results) {
        summary.push(spec.name, result);
    }
    summary
}

/// Rebuild the derived tables from previously saved raw tables.
pub fn run_offline(store: &ResultStore, lookup: &CountryLookup, config: &Config) -> RunSummary {
    let mut summary = RunSummary::default();
    for spec in searches() {
        let pages = match store.load_meta(spec.name) {
            Ok(meta) => meta.pages,
            Err(e) => {
                warn!(query = spec.name, error = %e, "no metadata for saved table");
                None
            }
        };
        let result = store
            .load(spec.name)
            .with_context(|| format!("loading saved {} table", spec.name))
            .and_then(|raw| reshape(&spec, raw, Source::Stored { pages }, store, lookup, config));
        summary.push(spec.name, result);
    }
    summary
}

/// Fetch and save one raw result set. A partial retrieval is reported and
/// dropped, leaving any earlier saved table untouched.
#[instrument(level = "info", skip(fetcher, spec, store), fields(query = spec.name))]
async fn retrieve<F: PageFetcher>(
    fetcher: &F,
    spec: &QuerySpec,
    store: &ResultStore,
    page_size: usize,
) -> Result<(RecordTable, usize)> {
    let start = Instant::now();
    let retrieval = match fetch_all(fetcher, spec, page_size).await {
        Ok(r) => r,
        Err(e) => {
            warn!(
                discarded = e.partial().len(),
                "discarding incomplete result set"
            );
            return Err(e).with_context(|| format!("retrieving {}", spec.name));
        }
    };
    info!(
        records = retrieval.table.len(),
        pages = retrieval.pages,
        elapsed = ?start.elapsed(),
        "retrieved metadata"
    );

    store
        .save_retrieval(&retrieval, spec.name)
        .with_context(|| format!("saving {}", spec.name))?;
    Ok((retrieval.table, retrieval.pages))
}

/// Aggregate a raw table and persist the cumulative, map and time-line tables.
fn reshape(
    spec: &QuerySpec,
    raw: RecordTable,
    source: Source,
    store: &ResultStore,
    lookup: &CountryLookup,
    config: &Config,
) -> Result<QueryOutcome> {
    let records = raw.len();
    let cumulative = cumulative_by_country(raw)
        .with_context(|| format!("aggregating {} by country", spec.name))?;
    store.save(&cumulative.to_table(), &format!("cumulative_{}", spec.name))?;

    let totals = country_totals(&cumulative, lookup);
    store.save(&totals_table(&totals), &format!("map_{}", spec.name))?;

    let series = daily_series(&cumulative, &config.since);
    store.save(&series.to_table(), &format!("timeline_{}", spec.name))?;

    info!(
        query = spec.name,
        records,
        country_dates = cumulative.len(),
        countries = totals.len(),
        "reshaped metadata"
    );
    Ok(QueryOutcome {
        name: spec.name.to_string(),
        source,
        records,
        country_dates: cumulative.len(),
        countries: totals.len(),
    })
}
