// src/aggregate/counts.rs

use std::collections::HashMap;

use super::{CountryDailyCount, COLLECTION_DATE_COLUMN, COUNTRY_COLUMN};
use crate::{error::AggregateError, table::RecordTable};

/// Count records per exact `(country, collection_date)` pair.
///
/// Countries come out in first-seen order and dates in first-seen order
/// within each country. Values are grouped by textual equality only, so
/// `"2020"` and `"2020-03-01"` are separate dates and an empty cell is a
/// group of its own.
pub fn count_by_country_and_date(
    table: &RecordTable,
) -> Result<Vec<CountryDailyCount>, AggregateError> {
    let country_idx = table
        .column_index(COUNTRY_COLUMN)
        .ok_or_else(|| AggregateError::MissingColumn(COUNTRY_COLUMN.to_string()))?;
    let date_idx = table
        .column_index(COLLECTION_DATE_COLUMN)
        .ok_or_else(|| AggregateError::MissingColumn(COLLECTION_DATE_COLUMN.to_string()))?;

    // country -> (first-seen position, per-date counts in first-seen order)
    let mut countries: Vec<(&str, Vec<(&str, u64)>)> = Vec::new();
    let mut country_pos: HashMap<&str, usize> = HashMap::new();
    let mut date_pos: HashMap<(&str, &str), usize> = HashMap::new();

    for row in table.rows() {
        let country = row[country_idx].as_str();
        let date = row[date_idx].as_str();

        let ci = *country_pos.entry(country).or_insert_with(|| {
            countries.push((country, Vec::new()));
            countries.len() - 1
        });
        let dates = &mut countries[ci].1;
        match date_pos.get(&(country, date)) {
            Some(&di) => dates[di].1 += 1,
            None => {
                date_pos.insert((country, date), dates.len());
                dates.push((date, 1));
            }
        }
    }

    Ok(countries
        .into_iter()
        .flat_map(|(country, dates)| {
            dates.into_iter().map(move |(date, submissions)| CountryDailyCount {
                country: country.to_string(),
                collection_date: date.to_string(),
                submissions,
            })
        })
        .collect())
}
