use std::future::Future;

use futures::future::try_join_all;
use log::debug;

use super::error::FetchError;

/// One page of a paginated resource, already parsed out of its envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Authoritative page count, read once from page 1 of an aggregation.
    pub total_pages: u32,
    pub items: Vec<T>,
}

/// Aggregates every page of a paginated resource into one flat sequence.
///
/// Page 1 is fetched first to learn the total page count; the remaining
/// pages are then requested concurrently, without throttling, and the
/// results are concatenated in ascending page order. Item order within a
/// page is preserved as returned by the server; no cross-page sort is
/// performed.
///
/// Fails fast: the first page failure aborts the whole aggregation and
/// already-fetched pages are discarded. The page count is read once, so a
/// dataset changing underneath the fan-out can yield an inconsistent
/// snapshot; that is accepted rather than re-validated.
pub async fn fetch_all<T, F, Fut>(fetch_page: F) -> Result<Vec<T>, FetchError>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, FetchError>>,
{
    let first = fetch_page(1).await?;
    let total_pages = first.total_pages;

    if total_pages <= 1 {
        return Ok(first.items);
    }

    debug!(total_pages = total_pages; "Fanning out remaining page fetches");
    let remaining = try_join_all((2..=total_pages).map(&fetch_page)).await?;

    let mut items = first.items;
    for page in remaining {
        items.extend(page.items);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::fetch::ResourceKind;
    use crate::http::HttpError;

    fn decode_error() -> FetchError {
        let source = HttpError::DecodeError(serde_json::from_str::<u32>("not json").unwrap_err());
        FetchError::page_fetch(ResourceKind::Transactions, 3, source)
    }

    /// Items are derived from the page number so ordering mistakes show up
    /// as wrong values, not just wrong counts.
    fn items_for(page: u32, per_page: u32) -> Vec<u32> {
        (0..per_page).map(|i| page * 100 + i).collect()
    }

    #[tokio::test]
    async fn single_page_resource_returns_first_batch() {
        let calls = AtomicU32::new(0);
        let result = fetch_all(|page| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok::<_, FetchError>(Page {
                    total_pages: 1,
                    items: items_for(page, 3),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(result, items_for(1, 3));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn two_pages_concatenate_in_page_order() {
        let result = fetch_all(|page| async move {
            Ok::<_, FetchError>(Page {
                total_pages: 2,
                items: items_for(page, 2),
            })
        })
        .await
        .unwrap();

        assert_eq!(result, vec![100, 101, 200, 201]);
    }

    #[tokio::test]
    async fn twenty_five_pages_complete_and_ordered() {
        let calls = AtomicU32::new(0);
        let result = fetch_all(|page| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok::<_, FetchError>(Page {
                    total_pages: 25,
                    items: items_for(page, 4),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 25);
        assert_eq!(result.len(), 100);
        let expected: Vec<u32> = (1..=25).flat_map(|page| items_for(page, 4)).collect();
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn any_failed_page_fails_the_aggregation() {
        let result = fetch_all(|page| async move {
            if page == 3 {
                Err(decode_error())
            } else {
                Ok(Page {
                    total_pages: 4,
                    items: items_for(page, 1),
                })
            }
        })
        .await;

        assert!(matches!(
            result,
            Err(FetchError::PageFetch { page: 3, .. })
        ));
    }

    #[tokio::test]
    async fn empty_first_page_is_a_valid_empty_sequence() {
        let result = fetch_all(|_| async {
            Ok::<_, FetchError>(Page {
                total_pages: 1,
                items: Vec::<u32>::new(),
            })
        })
        .await
        .unwrap();

        assert!(result.is_empty());
    }
}
