//! This module turns the page-oriented source extractor into a lazy stream
//! of pages, one stream per phase.
//!
//! [`PageSource`] selects which entity kind is read; [`extract_pages`] drives
//! the offsets. Pages come back in ascending id order, so consecutive pages
//! never repeat or skip a record while the source is quiescent.
use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;
use roster_migrator_repository::{SourceExtractor, SourceRepositoryError};
use roster_migrator_shared::types::{EntityKind, SourceMemberRecord, SourceUnitRecord};
use tracing::trace;

use crate::errors::ExtractionError;

/// Reads one entity kind from the source store, page by page.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Record: Send + 'static;

    fn kind(&self) -> EntityKind;

    async fn read_page(
        &self,
        offset: u64,
        size: u64,
    ) -> Result<Vec<Self::Record>, SourceRepositoryError>;
}

/// Unit pages of a [`SourceExtractor`].
pub struct UnitPages {
    extractor: Arc<dyn SourceExtractor>,
}

impl UnitPages {
    pub fn new(extractor: Arc<dyn SourceExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl PageSource for UnitPages {
    type Record = SourceUnitRecord;

    fn kind(&self) -> EntityKind {
        EntityKind::Unit
    }

    async fn read_page(
        &self,
        offset: u64,
        size: u64,
    ) -> Result<Vec<SourceUnitRecord>, SourceRepositoryError> {
        self.extractor.read_units_page(offset, size).await
    }
}

/// Member pages of a [`SourceExtractor`].
pub struct MemberPages {
    extractor: Arc<dyn SourceExtractor>,
}

impl MemberPages {
    pub fn new(extractor: Arc<dyn SourceExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl PageSource for MemberPages {
    type Record = SourceMemberRecord;

    fn kind(&self) -> EntityKind {
        EntityKind::Member
    }

    async fn read_page(
        &self,
        offset: u64,
        size: u64,
    ) -> Result<Vec<SourceMemberRecord>, SourceRepositoryError> {
        self.extractor.read_members_page(offset, size).await
    }
}

/// Streams the pages of `source`, starting at page `start_page`.
///
/// The stream is lazy: nothing is read until it is polled. It ends after the
/// first page shorter than `page_size`, and empty pages are never yielded.
/// A read failure is yielded once and ends the stream; it is not retried.
///
/// # Arguments
///
/// * `source` - The page source for one entity kind
/// * `page_size` - Records per page, greater than zero
/// * `start_page` - Index of the first page to read; `0` reads from the start
///
/// # Returns
///
/// A stream of non-empty pages in ascending id order.
pub fn extract_pages<S: PageSource>(
    source: &S,
    page_size: u64,
    start_page: u64,
) -> impl Stream<Item = Result<Vec<S::Record>, ExtractionError>> + Send + '_ {
    async_stream::try_stream! {
        let kind = source.kind();
        let mut page_index = start_page;
        loop {
            let offset = page_index.saturating_mul(page_size);
            let page = source
                .read_page(offset, page_size)
                .await
                .map_err(|source| ExtractionError { kind, offset, source })?;

            let len = page.len() as u64;
            trace!(entity = %kind, page = page_index, count = len, "Read source page");

            if !page.is_empty() {
                yield page;
            }
            if len < page_size {
                break;
            }
            page_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{StreamExt, pin_mut};
    use roster_migrator_repository::InMemorySourceExtractor;

    fn unit(id: &str) -> SourceUnitRecord {
        SourceUnitRecord {
            id: id.to_string(),
            name: format!("Unit {}", id),
            address: None,
            city: None,
        }
    }

    fn pages_of(ids: &[&str]) -> UnitPages {
        let extractor = InMemorySourceExtractor::new(ids.iter().map(|id| unit(id)).collect(), vec![]);
        UnitPages::new(Arc::new(extractor))
    }

    async fn collect_ids(source: &UnitPages, page_size: u64, start_page: u64) -> Vec<Vec<String>> {
        let pages = extract_pages(source, page_size, start_page);
        pin_mut!(pages);
        let mut result = Vec::new();
        while let Some(page) = pages.next().await {
            result.push(page.unwrap().into_iter().map(|u| u.id).collect());
        }
        result
    }

    #[tokio::test]
    async fn test_every_record_is_visited_once_in_order() {
        let source = pages_of(&["U5", "U1", "U3", "U2", "U4"]);

        let pages = collect_ids(&source, 2, 0).await;

        assert_eq!(
            pages,
            vec![
                vec!["U1".to_string(), "U2".to_string()],
                vec!["U3".to_string(), "U4".to_string()],
                vec!["U5".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_exact_multiple_ends_on_empty_page() {
        let source = pages_of(&["U1", "U2", "U3", "U4"]);

        let pages = collect_ids(&source, 2, 0).await;

        assert_eq!(pages.len(), 2);
    }

    #[tokio::test]
    async fn test_stream_restarts_from_later_page() {
        let source = pages_of(&["U1", "U2", "U3", "U4", "U5"]);

        let pages = collect_ids(&source, 2, 1).await;

        assert_eq!(pages[0], vec!["U3".to_string(), "U4".to_string()]);
        assert_eq!(pages.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_source_yields_nothing() {
        let source = pages_of(&[]);
        assert!(collect_ids(&source, 10, 0).await.is_empty());
    }
}
