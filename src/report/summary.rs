// src/report/summary.rs

use std::collections::{BTreeMap, HashMap};

use super::countries::{canonical_country, CountryLookup};
use crate::{aggregate::CumulativeCountryTable, table::RecordTable};

/// Collection dates lexically before this are left off the time-line.
pub const DEFAULT_SINCE: &str = "2020-01-02";

/// All-time submissions of one country, with the ISO data the map needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryTotal {
    pub country: String,
    pub continent: String,
    pub iso_alpha: String,
    pub iso_num: String,
    pub submissions: u64,
}

/// Sum submissions per country (aliased to its ISO name), in first-seen order.
pub fn country_totals(
    cumulative: &CumulativeCountryTable,
    lookup: &CountryLookup,
) -> Vec<CountryTotal> {
    let mut totals: Vec<CountryTotal> = Vec::new();
    let mut pos: HashMap<&str, usize> = HashMap::new();

    for row in cumulative.rows() {
        let country = canonical_country(&row.country);
        match pos.get(country) {
            Some(&i) => totals[i].submissions += row.submissions,
            None => {
                let info = lookup.info(country);
                pos.insert(country, totals.len());
                totals.push(CountryTotal {
                    country: country.to_string(),
                    continent: info.continent,
                    iso_alpha: info.iso_alpha,
                    iso_num: info.iso_num,
                    submissions: row.submissions,
                });
            }
        }
    }
    totals
}

pub fn totals_table(totals: &[CountryTotal]) -> RecordTable {
    let header = ["country", "continent", "iso_alpha", "iso_num", "submissions"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows = totals
        .iter()
        .map(|t| {
            vec![
                t.country.clone(),
                t.continent.clone(),
                t.iso_alpha.clone(),
                t.iso_num.clone(),
                t.submissions.to_string(),
            ]
        })
        .collect();
    RecordTable::from_rows(header, rows).expect("five cells per row")
}

/// Wide daily submissions: one row per collection date (ascending), one
/// column per country. `None` where a country has nothing on that date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySeries {
    pub countries: Vec<String>,
    pub rows: Vec<(String, Vec<Option<u64>>)>,
}

impl DailySeries {
    pub fn to_table(&self) -> RecordTable {
        let mut header = Vec::with_capacity(self.countries.len() + 1);
        header.push("collection_date".to_string());
        header.extend(self.countries.iter().cloned());

        let rows = self
            .rows
            .iter()
            .map(|(date, cells)| {
                let mut row = Vec::with_capacity(cells.len() + 1);
                row.push(date.clone());
                row.extend(
                    cells
                        .iter()
                        .map(|c| c.map(|n| n.to_string()).unwrap_or_default()),
                );
                row
            })
            .collect();
        RecordTable::from_rows(header, rows).expect("one cell per country plus the date")
    }
}

/// Outer-join every country's daily counts on collection date, dropping
/// dates that sort before `since`.
pub fn daily_series(cumulative: &CumulativeCountryTable, since: &str) -> DailySeries {
    let mut countries: Vec<String> = Vec::new();
    let mut column: HashMap<&str, usize> = HashMap::new();
    let mut by_date: BTreeMap<&str, HashMap<usize, u64>> = BTreeMap::new();

    for row in cumulative.rows() {
        let country = canonical_country(&row.country);
        let col = *column.entry(country).or_insert_with(|| {
            countries.push(country.to_string());
            countries.len() - 1
        });
        if row.collection_date.as_str() < since {
            continue;
        }
        *by_date
            .entry(row.collection_date.as_str())
            .or_default()
            .entry(col)
            .or_default() += row.submissions;
    }

    let width = countries.len();
    let rows = by_date
        .into_iter()
        .map(|(date, cells)| {
            let mut line = vec![None; width];
            for (col, n) in cells {
                line[col] = Some(n);
            }
            (date.to_string(), line)
        })
        .collect();

    DailySeries { countries, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{build_cumulative_table, CountryDailyCount};

    fn cumulative(rows: &[(&str, &str, u64)]) -> CumulativeCountryTable {
        build_cumulative_table(
            rows.iter()
                .map(|(country, date, n)| CountryDailyCount {
                    country: country.to_string(),
                    collection_date: date.to_string(),
                    submissions: *n,
                })
                .collect(),
        )
    }

    #[test]
    fn test_totals_alias_and_lookup() {
        let lookup = CountryLookup::from_entries([(
            "United States".to_string(),
            "USA".to_string(),
            "840".to_string(),
            "NA".to_string(),
        )]);
        let totals = country_totals(
            &cumulative(&[
                ("USA", "2020-03-01", 4),
                ("Peru", "2020-03-01", 1),
                ("USA", "2020-02-01", 2),
                ("United States", "2020-01-01", 1),
            ]),
            &lookup,
        );
        assert_eq!(totals.len(), 2);
        assert_eq!(
            totals[0],
            CountryTotal {
                country: "United States".into(),
                continent: "North America".into(),
                iso_alpha: "USA".into(),
                iso_num: "840".into(),
                submissions: 7,
            }
        );
        assert_eq!(totals[1].country, "Peru");
        assert_eq!(totals[1].iso_alpha, "Unknown Country");

        let table = totals_table(&totals);
        assert_eq!(table.rows()[0][4], "7");
    }

    #[test]
    fn test_daily_series_outer_join() {
        let series = daily_series(
            &cumulative(&[
                ("Peru", "2020-03-02", 3),
                ("Chile", "2020-03-01", 1),
                ("Peru", "2020-03-01", 2),
                ("Chile", "2019-12-31", 9),
                ("Chile", "2020", 5),
            ]),
            DEFAULT_SINCE,
        );
        assert_eq!(series.countries, vec!["Peru", "Chile"]);
        assert_eq!(
            series.rows,
            vec![
                ("2020-03-01".to_string(), vec![Some(2), Some(1)]),
                ("2020-03-02".to_string(), vec![Some(3), None]),
            ]
        );

        let table = series.to_table();
        assert_eq!(table.header(), ["collection_date", "Peru", "Chile"]);
        assert_eq!(table.rows()[1], ["2020-03-02", "3", ""]);
    }

    #[test]
    fn test_daily_series_keeps_country_with_only_old_dates() {
        let series = daily_series(&cumulative(&[("Chile", "2019-12-31", 9)]), DEFAULT_SINCE);
        assert_eq!(series.countries, vec!["Chile"]);
        assert!(series.rows.is_empty());
    }
}
