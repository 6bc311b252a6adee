// src/config.rs

use clap::Parser;
use std::{path::PathBuf, time::Duration};

use crate::{
    fetch::{client::ENA_PORTAL_API_URL, MAX_PAGE_SIZE},
    report::summary::DEFAULT_SINCE,
};

/// Pull SARS-CoV-2 sequence and read-run metadata from ENA and reshape it
/// into per-country submission tables.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Full path to the working directory.
    #[arg(short, long)]
    pub directory: PathBuf,

    /// Portal search endpoint.
    #[arg(long, default_value = ENA_PORTAL_API_URL)]
    pub base_url: String,

    /// Records requested per page; a shorter page ends the retrieval.
    #[arg(long, default_value_t = MAX_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 600)]
    pub timeout_secs: u64,

    /// Reuse the tables saved by an earlier run instead of fetching.
    #[arg(long)]
    pub offline: bool,

    /// JSON country mapping: {"<name>": ["<alpha3>", "<numeric>", "<continent>"]}.
    #[arg(long)]
    pub country_mapping: Option<PathBuf>,

    /// Earliest collection date kept on the time-line.
    #[arg(long, default_value = DEFAULT_SINCE)]
    pub since: String,
}

fn parse_page_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("page size must be at least 1".to_string()),
        // the portal caps pages here; a larger limit would end paging early
        Ok(n) if n > MAX_PAGE_SIZE => Err(format!("page size must be at most {MAX_PAGE_SIZE}")),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Resolved run settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub workdir: PathBuf,
    pub base_url: String,
    pub page_size: usize,
    pub timeout: Duration,
    pub offline: bool,
    pub country_mapping: Option<PathBuf>,
    pub since: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            workdir: args.directory,
            base_url: args.base_url,
            page_size: args.page_size,
            timeout: Duration::from_secs(args.timeout_secs),
            offline: args.offline,
            country_mapping: args.country_mapping,
            since: args.since,
        }
    }
}

impl Config {
    /// Defaults for a given working directory.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            base_url: ENA_PORTAL_API_URL.to_string(),
            page_size: MAX_PAGE_SIZE,
            timeout: Duration::from_secs(600),
            offline: false,
            country_mapping: None,
            since: DEFAULT_SINCE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["enasurvey", "--directory", "/tmp/ena"]).unwrap();
        let cfg = Config::from(args);
        assert_eq!(cfg.workdir, PathBuf::from("/tmp/ena"));
        assert_eq!(cfg.page_size, 100_000);
        assert_eq!(cfg.base_url, ENA_PORTAL_API_URL);
        assert_eq!(cfg.since, "2020-01-02");
        assert!(!cfg.offline);
    }

    #[test]
    fn test_directory_is_required() {
        assert!(Args::try_parse_from(["enasurvey"]).is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(Args::try_parse_from(["enasurvey", "-d", "/tmp", "--page-size", "0"]).is_err());
        let args =
            Args::try_parse_from(["enasurvey", "-d", "/tmp", "--page-size", "500"]).unwrap();
        assert_eq!(args.page_size, 500);
    }

    #[test]
    fn test_page_size_above_portal_cap_rejected() {
        assert!(
            Args::try_parse_from(["enasurvey", "-d", "/tmp", "--page-size", "150000"]).is_err()
        );
        let args =
            Args::try_parse_from(["enasurvey", "-d", "/tmp", "--page-size", "100000"]).unwrap();
        assert_eq!(args.page_size, MAX_PAGE_SIZE);
    }
}
