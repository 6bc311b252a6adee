// src/aggregate/mod.rs

use tracing::{debug, instrument};

use crate::{error::AggregateError, table::RecordTable};

pub mod counts;
pub mod locality;

pub use counts::count_by_country_and_date;
pub use locality::split_locality;

pub const COUNTRY_COLUMN: &str = "country";
pub const COLLECTION_DATE_COLUMN: &str = "collection_date";
pub const SUBMISSIONS_COLUMN: &str = "submissions";

/// Submissions from one country on one (textual) collection date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryDailyCount {
    pub country: String,
    pub collection_date: String,
    pub submissions: u64,
}

/// Every per-country daily count of one result set, newest date first.
///
/// "Cumulative" means merged across countries; there is no running sum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CumulativeCountryTable {
    rows: Vec<CountryDailyCount>,
}

impl CumulativeCountryTable {
    pub fn rows(&self) -> &[CountryDailyCount] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Persisted layout: `collection_date`, `submissions`, `country`.
    pub fn to_table(&self) -> RecordTable {
        let header = vec![
            COLLECTION_DATE_COLUMN.to_string(),
            SUBMISSIONS_COLUMN.to_string(),
            COUNTRY_COLUMN.to_string(),
        ];
        let rows = self
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.collection_date.clone(),
                    r.submissions.to_string(),
                    r.country.clone(),
                ]
            })
            .collect();
        RecordTable::from_rows(header, rows).expect("three cells per row")
    }

    /// Read back a stored cumulative table. Row order is kept as stored.
    pub fn from_table(table: &RecordTable) -> Result<Self, AggregateError> {
        let col = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| AggregateError::MissingColumn(name.to_string()))
        };
        let date_idx = col(COLLECTION_DATE_COLUMN)?;
        let subs_idx = col(SUBMISSIONS_COLUMN)?;
        let country_idx = col(COUNTRY_COLUMN)?;

        let rows = table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let submissions =
                    row[subs_idx]
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| AggregateError::InvalidCount {
                            row: i,
                            value: row[subs_idx].clone(),
                        })?;
                Ok(CountryDailyCount {
                    country: row[country_idx].clone(),
                    collection_date: row[date_idx].clone(),
                    submissions,
                })
            })
            .collect::<Result<Vec<_>, AggregateError>>()?;
        Ok(Self { rows })
    }
}

/// Merge per-country counts into one table sorted by collection date,
/// descending, comparing dates as plain strings. The sort is stable, so
/// rows sharing a date keep their input order.
pub fn build_cumulative_table(counts: Vec<CountryDailyCount>) -> CumulativeCountryTable {
    let mut rows = counts;
    rows.sort_by(|a, b| b.collection_date.cmp(&a.collection_date));
    CumulativeCountryTable { rows }
}

/// Full reshaping of a raw result set: split off the locality, count by
/// country and date, merge and sort.
///
/// A result set without rows, header-less or not, yields an empty table.
#[instrument(level = "info", skip(table), fields(rows = table.len()))]
pub fn cumulative_by_country(table: RecordTable) -> Result<CumulativeCountryTable, AggregateError> {
    if table.is_empty() {
        debug!("no records to aggregate");
        return Ok(CumulativeCountryTable::default());
    }
    let table = split_locality(table, COUNTRY_COLUMN)?;
    let counts = count_by_country_and_date(&table)?;
    debug!(pairs = counts.len(), "counted country/date pairs");
    Ok(build_cumulative_table(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn raw(rows: &[(&str, &str)]) -> RecordTable {
        RecordTable::from_rows(
            vec![
                "sample_accession".into(),
                "collection_date".into(),
                "country".into(),
            ],
            rows.iter()
                .enumerate()
                .map(|(i, (country, date))| {
                    vec![format!("SAMEA{i}"), date.to_string(), country.to_string()]
                })
                .collect(),
        )
        .unwrap()
    }

    fn sample() -> RecordTable {
        raw(&[
            ("United Kingdom:England", "2020-03-17"),
            ("United Kingdom:Wales", "2020-03-17"),
            ("United Kingdom", "2020-04-02"),
            ("USA: NY", "2020-03-17"),
            ("USA", "2020"),
            ("China: Wuhan", "2019-12-30"),
            ("", "2020-04-02"),
            ("USA: WA", "2020-03-17"),
        ])
    }

    #[test]
    fn test_sorted_by_date_descending() {
        let out = cumulative_by_country(sample()).unwrap();
        let dates: Vec<&str> = out.rows().iter().map(|r| r.collection_date.as_str()).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
        // lexical, not calendar: "2020" sorts below every 2020 full date
        assert_eq!(dates.first(), Some(&"2020-04-02"));
        assert_eq!(dates.last(), Some(&"2019-12-30"));
    }

    #[test]
    fn test_one_row_per_distinct_pair() {
        let out = cumulative_by_country(sample()).unwrap();
        let pairs: HashSet<(String, String)> = out
            .rows()
            .iter()
            .map(|r| (r.country.clone(), r.collection_date.clone()))
            .collect();
        assert_eq!(pairs.len(), out.len());
        assert_eq!(out.len(), 6);

        let uk = out
            .rows()
            .iter()
            .find(|r| r.country == "United Kingdom" && r.collection_date == "2020-03-17")
            .unwrap();
        assert_eq!(uk.submissions, 2);
        let us = out
            .rows()
            .iter()
            .find(|r| r.country == "USA" && r.collection_date == "2020-03-17")
            .unwrap();
        assert_eq!(us.submissions, 2);
    }

    #[test]
    fn test_counts_are_not_running_sums() {
        let out = cumulative_by_country(raw(&[
            ("Peru", "2020-05-01"),
            ("Peru", "2020-05-02"),
            ("Peru", "2020-05-02"),
        ]))
        .unwrap();
        assert_eq!(
            out.rows(),
            &[
                CountryDailyCount {
                    country: "Peru".into(),
                    collection_date: "2020-05-02".into(),
                    submissions: 2
                },
                CountryDailyCount {
                    country: "Peru".into(),
                    collection_date: "2020-05-01".into(),
                    submissions: 1
                },
            ]
        );
    }

    #[test]
    fn test_total_submissions_match_input_rows() {
        let input = sample();
        let n = input.len() as u64;
        let out = cumulative_by_country(input).unwrap();
        assert_eq!(out.rows().iter().map(|r| r.submissions).sum::<u64>(), n);
    }

    #[test]
    fn test_deterministic() {
        let input = sample();
        let a = cumulative_by_country(input.clone()).unwrap();
        let b = cumulative_by_country(input).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ties_keep_country_order() {
        let out = build_cumulative_table(vec![
            CountryDailyCount {
                country: "B".into(),
                collection_date: "d1".into(),
                submissions: 1,
            },
            CountryDailyCount {
                country: "A".into(),
                collection_date: "d2".into(),
                submissions: 1,
            },
            CountryDailyCount {
                country: "A".into(),
                collection_date: "d1".into(),
                submissions: 3,
            },
        ]);
        let order: Vec<(&str, &str)> = out
            .rows()
            .iter()
            .map(|r| (r.country.as_str(), r.collection_date.as_str()))
            .collect();
        assert_eq!(order, vec![("A", "d2"), ("B", "d1"), ("A", "d1")]);
    }

    #[test]
    fn test_empty_result_set_gives_empty_table() {
        let empty = cumulative_by_country(RecordTable::default()).unwrap();
        assert!(empty.is_empty());
        assert!(cumulative_by_country(raw(&[])).unwrap().is_empty());

        let no_country = RecordTable::from_rows(
            vec!["collection_date".into()],
            vec![vec!["2020-03-01".into()]],
        )
        .unwrap();
        assert_eq!(
            cumulative_by_country(no_country).unwrap_err(),
            AggregateError::MissingColumn("country".into())
        );
    }

    #[test]
    fn test_table_layout_and_read_back() {
        let out = cumulative_by_country(sample()).unwrap();
        let table = out.to_table();
        assert_eq!(table.header(), ["collection_date", "submissions", "country"]);
        assert_eq!(CumulativeCountryTable::from_table(&table).unwrap(), out);
    }

    #[test]
    fn test_read_back_rejects_bad_count() {
        let table = RecordTable::from_rows(
            vec!["collection_date".into(), "submissions".into(), "country".into()],
            vec![vec!["2020".into(), "many".into(), "Peru".into()]],
        )
        .unwrap();
        assert_eq!(
            CumulativeCountryTable::from_table(&table).unwrap_err(),
            AggregateError::InvalidCount {
                row: 0,
                value: "many".into()
            }
        );
    }
}
