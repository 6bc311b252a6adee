// src/aggregate/locality.rs

use crate::{error::AggregateError, table::RecordTable};

pub const LOCALITY_DELIMITER: char = ':';

/// Split `"<country>:<locality>"` cells of `column` at the first delimiter.
///
/// The left part stays in `column`; the right part goes to
/// `<column>_locality`, appended as the last column (or overwritten if the
/// table already has one). Cells without a delimiter get an empty locality.
pub fn split_locality(table: RecordTable, column: &str) -> Result<RecordTable, AggregateError> {
    let src = table
        .column_index(column)
        .ok_or_else(|| AggregateError::MissingColumn(column.to_string()))?;
    let locality_name = format!("{}_locality", column);
    let existing = table.column_index(&locality_name);

    let (mut header, mut rows) = table.into_parts();
    if existing.is_none() {
        header.push(locality_name);
    }

    for row in rows.iter_mut() {
        let (country, locality) = match row[src].split_once(LOCALITY_DELIMITER) {
            Some((country, locality)) => (country.to_string(), locality.to_string()),
            None => (row[src].clone(), String::new()),
        };
        row[src] = country;
        match existing {
            Some(dst) => row[dst] = locality,
            None => row.push(locality),
        }
    }

    Ok(RecordTable::from_rows(header, rows)
        .expect("every row gained exactly the one locality cell the header gained"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(countries: &[&str]) -> RecordTable {
        RecordTable::from_rows(
            vec!["accession".into(), "country".into()],
            countries
                .iter()
                .enumerate()
                .map(|(i, c)| vec![format!("ACC{i}"), c.to_string()])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_split_at_first_delimiter() {
        let out = split_locality(
            table(&["France:Paris", "Spain", "USA: CA:Los Angeles", ""]),
            "country",
        )
        .unwrap();

        assert_eq!(out.header(), ["accession", "country", "country_locality"]);
        assert_eq!(out.len(), 4);
        assert_eq!(out.rows()[0], ["ACC0", "France", "Paris"]);
        assert_eq!(out.rows()[1], ["ACC1", "Spain", ""]);
        assert_eq!(out.rows()[2], ["ACC2", "USA", " CA:Los Angeles"]);
        assert_eq!(out.rows()[3], ["ACC3", "", ""]);
    }

    #[test]
    fn test_split_twice_reuses_locality_column() {
        let once = split_locality(table(&["France:Paris"]), "country").unwrap();
        let twice = split_locality(once.clone(), "country").unwrap();
        assert_eq!(twice.header(), once.header());
        assert_eq!(twice.rows()[0], ["ACC0", "France", ""]);
    }

    #[test]
    fn test_missing_column() {
        let err = split_locality(table(&["Peru"]), "geo").unwrap_err();
        assert_eq!(err, AggregateError::MissingColumn("geo".into()));
    }
}
