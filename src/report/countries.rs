// src/report/countries.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

pub const UNKNOWN_COUNTRY: &str = "Unknown Country";

/// Portal spellings that differ from the ISO short names used for lookup.
static COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("USA", "United States"),
    ("State of Palestine", "Palestine, State of"),
    ("South Korea", "Korea, Republic of"),
];

static CONTINENTS: &[(&str, &str)] = &[
    ("EU", "Europe"),
    ("NA", "North America"),
    ("SA", "South America"),
    ("AS", "Asia"),
    ("OC", "Oceania"),
    ("AF", "Africa"),
];

/// Map a portal country label to the name used by [`CountryLookup`].
pub fn canonical_country(name: &str) -> &str {
    COUNTRY_ALIASES
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
        .unwrap_or(name)
}

fn continent_name(code_or_name: &str) -> String {
    CONTINENTS
        .iter()
        .find(|(code, _)| *code == code_or_name)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code_or_name.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInfo {
    pub iso_alpha: String,
    pub iso_num: String,
    pub continent: String,
}

impl CountryInfo {
    fn unknown() -> Self {
        Self {
            iso_alpha: UNKNOWN_COUNTRY.to_string(),
            iso_num: UNKNOWN_COUNTRY.to_string(),
            continent: UNKNOWN_COUNTRY.to_string(),
        }
    }
}

/// `["<alpha3>", "<numeric>", "<continent>"]` as stored in the mapping file.
#[derive(Deserialize)]
struct MappingEntry(String, String, String);

/// Read-only ISO country data, loaded once and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct CountryLookup {
    by_name: HashMap<String, CountryInfo>,
}

impl CountryLookup {
    /// Load `{"<country name>": ["<alpha3>", "<numeric>", "<continent>"]}`.
    /// Continent codes (`EU`, `AS`, ...) are expanded to names.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let raw: HashMap<String, MappingEntry> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Self::from_entries(raw.into_iter().map(
            |(name, MappingEntry(alpha, num, continent))| (name, alpha, num, continent),
        )))
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String, String)>,
    {
        let by_name = entries
            .into_iter()
            .map(|(name, iso_alpha, iso_num, continent)| {
                let info = CountryInfo {
                    iso_alpha,
                    iso_num,
                    continent: continent_name(&continent),
                };
                (name, info)
            })
            .collect();
        Self { by_name }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Look up a country by its canonical name; unknown names report
    /// [`UNKNOWN_COUNTRY`] in every field.
    pub fn info(&self, canonical_name: &str) -> CountryInfo {
        self.by_name
            .get(canonical_name)
            .cloned()
            .unwrap_or_else(CountryInfo::unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_aliases() {
        assert_eq!(canonical_country("USA"), "United States");
        assert_eq!(canonical_country("South Korea"), "Korea, Republic of");
        assert_eq!(canonical_country("France"), "France");
    }

    #[test]
    fn test_load_mapping_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"France": ["FRA", "250", "EU"], "United States": ["USA", "840", "North America"]}}"#
        )
        .unwrap();

        let lookup = CountryLookup::load(f.path()).unwrap();
        assert_eq!(lookup.len(), 2);
        assert_eq!(
            lookup.info("France"),
            CountryInfo {
                iso_alpha: "FRA".into(),
                iso_num: "250".into(),
                continent: "Europe".into(),
            }
        );
        assert_eq!(lookup.info("United States").continent, "North America");
        assert_eq!(lookup.info("Atlantis"), CountryInfo::unknown());
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(CountryLookup::load(f.path()).is_err());
    }
}
