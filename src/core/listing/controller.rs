use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::error::PageFetchError;
use super::page::{combine, Identity, Page, PageInfo};

/// Source of pages for a [ListingController].
#[async_trait::async_trait]
pub trait PageFetcher<T>: Send + Sync + 'static {
    /// Fetch the page starting after `after`, or the first page when `None`.
    async fn fetch(&self, after: Option<String>) -> anyhow::Result<Page<T>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NetworkStatus {
    InitialLoading,
    Idle,
    LoadingMore,
    Refetching,
    Error,
}

impl NetworkStatus {
    fn in_flight(self) -> bool {
        matches!(
            self,
            NetworkStatus::InitialLoading | NetworkStatus::LoadingMore | NetworkStatus::Refetching
        )
    }
}

/// What the presentation layer gets to render.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView<T> {
    pub items: Vec<T>,
    pub page_info: Option<PageInfo>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<PageFetchError>,
    pub is_refetching: bool,
}

/// Rendering decision for a listing.
#[derive(Clone, Debug)]
pub enum Presentation<T> {
    /// Nothing to show yet and a fetch is pending.
    Loading,
    /// Nothing to show and the last fetch failed.
    Failed(PageFetchError),
    /// The best list available, possibly with a trailing error.
    Ready(ListingView<T>),
}

struct State<T> {
    page: Option<Page<T>>,
    status: NetworkStatus,
    error: Option<PageFetchError>,
    fetching: bool,
    // The last refetch failed: the page held is the discarded one and must
    // not be paged further.
    restart_failed: bool,
}

enum Start {
    First,
    More(Option<String>),
}

/// Puts the controller back into its previous status when a fetch is
/// abandoned before it completes.
struct FetchGuard<'a, T> {
    state: &'a Mutex<State<T>>,
    restore: Option<NetworkStatus>,
}

impl<T> FetchGuard<'_, T> {
    fn disarm(&mut self) {
        self.restore = None;
    }
}

impl<T> Drop for FetchGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(status) = self.restore.take() {
            tracing::debug!("page fetch abandoned");
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.fetching = false;
            state.status = status;
        }
    }
}

/// Accumulates the pages of one listing query.
///
/// At most one page fetch is in flight per controller; a call that would
/// start a second one returns `Ok(false)` without fetching.
pub struct ListingController<T, F> {
    fetcher: F,
    state: Mutex<State<T>>,
}

impl<T, F> ListingController<T, F>
where
    T: Identity + Clone + Send + 'static,
    F: PageFetcher<T>,
{
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            state: Mutex::new(State {
                page: None,
                status: NetworkStatus::InitialLoading,
                error: None,
                fetching: false,
                restart_failed: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> NetworkStatus {
        self.state().status
    }

    /// Fetches the first page. Only valid before any data was loaded.
    pub async fn load(&self) -> Result<bool, PageFetchError> {
        let prior = {
            let mut state = self.state();
            if state.fetching || state.status != NetworkStatus::InitialLoading {
                return Ok(false);
            }
            state.fetching = true;
            state.status
        };
        self.run(prior, Start::First).await
    }

    /// Fetches the page after the stored cursor and folds it into the list.
    ///
    /// A no-op while another fetch is in flight or when there is no next page.
    /// After a failed page the same cursor may be retried.
    pub async fn load_next_page(&self) -> Result<bool, PageFetchError> {
        let (prior, cursor) = {
            let mut state = self.state();
            if state.restart_failed {
                tracing::debug!("refetch failed, only a refetch may continue");
                return Ok(false);
            }
            let page = match &state.page {
                Some(page) if page.has_next_page() => page,
                _ => return Ok(false),
            };
            let cursor = page.page_info.next_cursor.clone();
            if state.fetching
                || !matches!(state.status, NetworkStatus::Idle | NetworkStatus::Error)
            {
                tracing::debug!("a page fetch is already in flight");
                return Ok(false);
            }
            let prior = state.status;
            state.fetching = true;
            state.status = NetworkStatus::LoadingMore;
            (prior, cursor)
        };
        self.run(prior, Start::More(cursor)).await
    }

    /// Restarts the listing from an empty base page. The current items stay
    /// visible until the new first page arrives.
    pub async fn refetch(&self) -> Result<bool, PageFetchError> {
        let prior = {
            let mut state = self.state();
            if state.fetching {
                return Ok(false);
            }
            let prior = state.status;
            state.fetching = true;
            state.status = if state.page.is_some() {
                NetworkStatus::Refetching
            } else {
                NetworkStatus::InitialLoading
            };
            prior
        };
        self.run(prior, Start::First).await
    }

    async fn run(&self, prior: NetworkStatus, start: Start) -> Result<bool, PageFetchError> {
        let mut guard = FetchGuard { state: &self.state, restore: Some(prior) };
        let after = match &start {
            Start::First => None,
            Start::More(cursor) => cursor.clone(),
        };
        let result = self.fetcher.fetch(after).await;
        guard.disarm();

        let mut state = self.state();
        state.fetching = false;

        match result {
            Ok(more) => {
                let merged = match (&start, &state.page) {
                    (Start::More(_), Some(base)) => combine(base, &more),
                    _ => combine(&Page::empty(), &more),
                };
                tracing::debug!(items = merged.len(), "merged page");
                state.page = Some(merged);
                state.status = NetworkStatus::Idle;
                state.error = None;
                state.restart_failed = false;
                Ok(true)
            }
            Err(err) => {
                let err = PageFetchError::from(err);
                tracing::warn!(error = %err, "page fetch failed");
                state.status = NetworkStatus::Error;
                state.error = Some(err.clone());
                if matches!(start, Start::First) {
                    state.restart_failed = true;
                }
                Err(err)
            }
        }
    }

    pub fn view(&self) -> ListingView<T> {
        let state = self.state();
        ListingView {
            items: state
                .page
                .as_ref()
                .map(|page| page.items.clone())
                .unwrap_or_default(),
            page_info: state.page.as_ref().map(|page| page.page_info.clone()),
            loading: state.status.in_flight(),
            error: state.error.clone(),
            is_refetching: matches!(
                state.status,
                NetworkStatus::LoadingMore | NetworkStatus::Refetching
            ),
        }
    }

    pub fn presentation(&self) -> Presentation<T> {
        let view = self.view();
        if view.page_info.is_none() {
            return match view.error {
                Some(err) if !view.loading => Presentation::Failed(err),
                _ => Presentation::Loading,
            };
        }
        Presentation::Ready(view)
    }
}
