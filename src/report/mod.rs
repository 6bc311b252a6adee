// src/report/mod.rs
//
// Tables behind the submissions map and the per-country time-line.

pub mod countries;
pub mod summary;

pub use countries::{canonical_country, CountryInfo, CountryLookup};
pub use summary::{country_totals, daily_series, totals_table, CountryTotal, DailySeries};
