// src/catalog.rs

/// Taxonomic filter for SARS-CoV-2 and everything below it.
pub const TAXON_QUERY: &str = "tax_tree(2697049)";

pub const DATA_PORTAL: &str = "ena";

static SEQUENCE_FIELDS: &[&str] = &[
    "study_accession",
    "sample_accession",
    "base_count",
    "collection_date",
    "country",
    "description",
    "host",
    "isolate",
    "strain",
];

static READ_RUN_FIELDS: &[&str] = &[
    "study_accession",
    "sample_accession",
    "experiment_accession",
    "instrument_platform",
    "instrument_model",
    "library_name",
    "nominal_length",
    "library_layout",
    "library_strategy",
    "library_source",
    "library_selection",
    "base_count",
    "center_name",
    "experiment_title",
    "fastq_ftp",
    "collection_date",
    "country",
    "description",
    "isolate",
    "strain",
];

/// One logical search against the portal. Pagination state lives in
/// [`crate::fetch::PageRequest`], never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// Logical name, also the stored table name.
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub query: &'static str,
    pub result: &'static str,
    pub data_portal: &'static str,
}

impl QuerySpec {
    pub fn fields_param(&self) -> String {
        self.fields.join(",")
    }
}

pub const SEQUENCE: QuerySpec = QuerySpec {
    name: "sequence",
    fields: SEQUENCE_FIELDS,
    query: TAXON_QUERY,
    result: "sequence",
    data_portal: DATA_PORTAL,
};

pub const READ_RUN: QuerySpec = QuerySpec {
    name: "read_run",
    fields: READ_RUN_FIELDS,
    query: TAXON_QUERY,
    result: "read_run",
    data_portal: DATA_PORTAL,
};

/// All searches run by the pipeline, in run order.
pub fn searches() -> [QuerySpec; 2] {
    [SEQUENCE, READ_RUN]
}
