// src/fetch/mod.rs

use std::future::Future;

use crate::{catalog::QuerySpec, error::FetchError, table::RecordTable};

pub mod accumulate;
pub mod client;

pub use accumulate::{fetch_all, Retrieval};
pub use client::EnaClient;

/// The portal never returns more than this many records per response.
pub const MAX_PAGE_SIZE: usize = 100_000;

/// One page request: the immutable query plus where to start reading.
/// Built fresh for every call, so concurrent queries never share state.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub spec: &'a QuerySpec,
    pub offset: usize,
    pub limit: usize,
}

impl<'a> PageRequest<'a> {
    pub fn new(spec: &'a QuerySpec, offset: usize, limit: usize) -> Self {
        Self {
            spec,
            offset,
            limit,
        }
    }

    /// Query-string pairs understood by the portal search endpoint.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("fields", self.spec.fields_param()),
            ("query", self.spec.query.to_string()),
            ("result", self.spec.result.to_string()),
            ("dataPortal", self.spec.data_portal.to_string()),
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
            ("format", "tsv".to_string()),
        ]
    }
}

/// Source of result pages.
pub trait PageFetcher {
    fn fetch_page(
        &self,
        request: &PageRequest<'_>,
    ) -> impl Future<Output = Result<RecordTable, FetchError>> + Send;
}
