//! Paginate - Drain offset/limit listing APIs
//!
//! Listing APIs return one page per call together with the total number of
//! matching items. `fetch_all` keeps asking for the next page until the
//! reported total is exhausted or a page comes back empty.

use std::future::Future;

use crate::provider::{ProviderError, ProviderResult};

/// Position of the next page to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u64,
    pub limit: u64,
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of matching items as reported by the API
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }
}

/// Fetch every matching item, starting at offset 0
pub async fn fetch_all<T, F, Fut>(page_size: u64, fetch: F) -> ProviderResult<Vec<T>>
where
    F: FnMut(PageCursor) -> Fut,
    Fut: Future<Output = ProviderResult<Page<T>>>,
{
    fetch_up_to(page_size, None, fetch).await
}

/// Fetch matching items, stopping once `cap` items have been collected
///
/// The page size stays fixed; the last page is truncated to the cap.
pub async fn fetch_up_to<T, F, Fut>(
    page_size: u64,
    cap: Option<usize>,
    mut fetch: F,
) -> ProviderResult<Vec<T>>
where
    F: FnMut(PageCursor) -> Fut,
    Fut: Future<Output = ProviderResult<Page<T>>>,
{
    if page_size == 0 {
        return Err(ProviderError::validation("page size must be positive"));
    }

    let mut items = Vec::new();
    let mut cursor = PageCursor {
        offset: 0,
        limit: page_size,
    };

    loop {
        let page = fetch(cursor).await?;
        let fetched = page.items.len() as u64;
        items.extend(page.items);
        cursor.offset += fetched;

        if let Some(cap) = cap
            && items.len() >= cap
        {
            items.truncate(cap);
            break;
        }
        if fetched == 0 || cursor.offset >= page.total_count {
            break;
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn page_of(total: u64, cursor: PageCursor) -> Page<u64> {
        let end = (cursor.offset + cursor.limit).min(total);
        Page::new((cursor.offset..end).collect(), total)
    }

    #[tokio::test]
    async fn drains_all_pages_in_order() {
        let calls = Mutex::new(Vec::new());
        let items = fetch_all(50, |cursor| {
            calls.lock().unwrap().push(cursor);
            async move { Ok(page_of(137, cursor)) }
        })
        .await
        .unwrap();

        assert_eq!(items, (0..137).collect::<Vec<_>>());
        let calls = calls.into_inner().unwrap();
        assert_eq!(
            calls.iter().map(|c| c.offset).collect::<Vec<_>>(),
            vec![0, 50, 100]
        );
        assert!(calls.iter().all(|c| c.limit == 50));
    }

    #[tokio::test]
    async fn empty_result_takes_one_call() {
        let mut calls = 0;
        let items: Vec<u64> = fetch_all(100, |cursor| {
            calls += 1;
            async move { Ok(page_of(0, cursor)) }
        })
        .await
        .unwrap();
        assert!(items.is_empty());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn stops_on_empty_page_even_if_total_is_larger() {
        let mut calls = 0;
        let items = fetch_all(10, |cursor| {
            calls += 1;
            async move {
                let mut page = page_of(15, cursor);
                page.total_count = 1000;
                Ok(page)
            }
        })
        .await
        .unwrap();
        assert_eq!(items.len(), 15);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn error_discards_partial_results() {
        let result: ProviderResult<Vec<u64>> = fetch_all(50, |cursor| async move {
            if cursor.offset >= 50 {
                Err(ProviderError::malformed("boom"))
            } else {
                Ok(page_of(137, cursor))
            }
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn cap_truncates_with_fixed_page_size() {
        let calls = Mutex::new(Vec::new());
        let items = fetch_up_to(20, Some(45), |cursor| {
            calls.lock().unwrap().push(cursor);
            async move { Ok(page_of(137, cursor)) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 45);
        let calls = calls.into_inner().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.limit == 20));
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let result: ProviderResult<Vec<u64>> =
            fetch_all(0, |cursor| async move { Ok(page_of(1, cursor)) }).await;
        assert!(result.unwrap_err().is_validation());
    }
}
