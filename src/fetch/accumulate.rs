// src/fetch/accumulate.rs

use tracing::{error, info, instrument};

use super::{PageFetcher, PageRequest, MAX_PAGE_SIZE};
use crate::{
    catalog::QuerySpec,
    error::{FetchError, RetrievalError},
    table::RecordTable,
};

/// A complete result set and how many requests it took.
#[derive(Debug)]
pub struct Retrieval {
    pub table: RecordTable,
    pub pages: usize,
}

/// Page through `spec` until the portal hands back a short page.
///
/// The only completion signal is a page with fewer than `page_size` rows,
/// so a total that is an exact multiple of `page_size` ends with one empty
/// page. Any page failure stops the loop and surfaces what was gathered
/// as [`RetrievalError::Partial`].
#[instrument(level = "info", skip(fetcher, spec), fields(query = spec.name))]
pub async fn fetch_all<F: PageFetcher>(
    fetcher: &F,
    spec: &QuerySpec,
    page_size: usize,
) -> Result<Retrieval, RetrievalError> {
    // zero would never produce a short page; above the portal cap every
    // full page would look short
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

    let mut table = RecordTable::default();
    let mut offset = 0;
    let mut pages = 0;

    loop {
        let request = PageRequest::new(spec, offset, page_size);
        let page = match fetcher.fetch_page(&request).await {
            Ok(page) => page,
            Err(source) => {
                error!(offset, pages, error = %source, "page fetch failed; aborting retrieval");
                return Err(RetrievalError::Partial {
                    query: spec.name.to_string(),
                    offset,
                    pages,
                    partial: table,
                    source,
                });
            }
        };
        pages += 1;

        let received = page.len();
        if let Err(e) = table.append(page) {
            error!(offset, pages, error = %e, "page does not match earlier pages");
            return Err(RetrievalError::Partial {
                query: spec.name.to_string(),
                offset,
                pages: pages - 1,
                partial: table,
                source: FetchError::Malformed(e.to_string()),
            });
        }
        info!(offset, received, total = table.len(), "retrieved page");

        if received < page_size {
            break;
        }
        offset += received;
    }

    Ok(Retrieval { table, pages })
}
