//! The current view of the customer collection.
//!
//! A [`CustomerCollection`] owns the view parameters (page, page size, search,
//! sort) together with the rows, total, loading flag and error slot of the
//! most recent fetch. Every parameter change triggers one fetch; every
//! successful mutation triggers one refetch of whatever the view is at that
//! moment. Nothing is cached between views.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::RwLock;

use crate::customers::{Customer, CustomerApi, CustomerUpdate, ListQuery, NewCustomer, SortKey};
use crate::error::{Error, Operation, OperationError};
use crate::stats::DashboardStats;

/// Owned copy of the collection state, for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSnapshot {
    pub view: ListQuery,
    pub customers: Vec<Customer>,
    /// Server-reported size of the filtered collection
    pub total: u64,
    pub loading: bool,
    pub error: Option<OperationError>,
}

impl CollectionSnapshot {
    /// Number of pages at the current page size
    pub fn page_count(&self) -> u64 {
        self.view.page_count(self.total)
    }

    /// Statistics over the loaded rows
    pub fn stats(&self, now: DateTime<Utc>) -> DashboardStats {
        DashboardStats::compute(&self.customers, self.total, now)
    }
}

struct State {
    view: ListQuery,
    customers: Vec<Customer>,
    total: u64,
    loading: bool,
    error: Option<OperationError>,
}

struct Inner<A> {
    api: A,
    state: RwLock<State>,
    /// Sequence number of the most recently issued fetch
    latest_fetch: AtomicU64,
}

/// Shared handle to the collection; clones observe the same state
pub struct CustomerCollection<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for CustomerCollection<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: CustomerApi> CustomerCollection<A> {
    /// Create a collection with the default view (page 1, 10 rows, sorted by first name)
    pub fn new(api: A) -> Self {
        Self::with_view(api, ListQuery::default())
    }

    /// Create a collection starting at `view`. Nothing is fetched until
    /// [`load`](Self::load) is called.
    pub fn with_view(api: A, view: ListQuery) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                state: RwLock::new(State {
                    view,
                    customers: Vec::new(),
                    total: 0,
                    loading: true,
                    error: None,
                }),
                latest_fetch: AtomicU64::new(0),
            }),
        }
    }

    /// The API this collection talks to
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    /// Initial fetch for the starting view
    pub async fn load(&self) -> Result<(), Error> {
        self.refresh().await
    }

    pub async fn snapshot(&self) -> CollectionSnapshot {
        let state = self.inner.state.read().await;
        CollectionSnapshot {
            view: state.view.clone(),
            customers: state.customers.clone(),
            total: state.total,
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    pub async fn view(&self) -> ListQuery {
        self.inner.state.read().await.view.clone()
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.inner.state.read().await.customers.clone()
    }

    pub async fn total(&self) -> u64 {
        self.inner.state.read().await.total
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.loading
    }

    pub async fn error(&self) -> Option<OperationError> {
        self.inner.state.read().await.error.clone()
    }

    /// Move to a 1-based page
    pub async fn set_page(&self, page: u32) -> Result<(), Error> {
        self.change_view(|view| view.page = page).await
    }

    pub async fn set_per_page(&self, per_page: u32) -> Result<(), Error> {
        self.change_view(|view| view.per_page = per_page).await
    }

    /// Change page and page size together with a single fetch
    pub async fn apply_pagination(&self, page: u32, per_page: u32) -> Result<(), Error> {
        self.change_view(|view| {
            view.page = page;
            view.per_page = per_page;
        })
        .await
    }

    pub async fn set_search(&self, search: impl Into<String>) -> Result<(), Error> {
        let search = search.into();
        self.change_view(|view| view.search = search).await
    }

    pub async fn set_sort(&self, sort_by: SortKey) -> Result<(), Error> {
        self.change_view(|view| view.sort_by = sort_by).await
    }

    /// Apply `change` to the view and fetch if anything actually changed
    async fn change_view<F>(&self, change: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ListQuery),
    {
        let changed = {
            let mut state = self.inner.state.write().await;
            let mut next = state.view.clone();
            change(&mut next);
            next.validate()?;
            if next == state.view {
                false
            } else {
                debug!("View changed: {:?} -> {:?}", state.view, next);
                state.view = next;
                true
            }
        };

        if changed {
            self.refresh().await
        } else {
            Ok(())
        }
    }

    /// Fetch the current view.
    ///
    /// If another fetch is issued while this one is in flight, this one's
    /// response is dropped when it arrives and `Ok(())` is returned.
    pub async fn refresh(&self) -> Result<(), Error> {
        // numbered under the lock so a later sequence never carries an older view
        let (seq, query) = {
            let mut state = self.inner.state.write().await;
            let seq = self.inner.latest_fetch.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
            (seq, state.view.clone())
        };

        debug!("Fetch #{} for {:?}", seq, query);
        let result = self.inner.api.list(&query).await;

        let mut state = self.inner.state.write().await;
        if self.inner.latest_fetch.load(Ordering::SeqCst) != seq {
            debug!("Discarding stale response for fetch #{}", seq);
            return Ok(());
        }

        state.loading = false;
        match result {
            Ok(page) => {
                debug!(
                    "Fetch #{} loaded {} of {} customers",
                    seq,
                    page.data.len(),
                    page.total
                );
                state.customers = page.data;
                state.total = page.total;
                Ok(())
            }
            Err(e) => {
                warn!("Fetch #{} failed: {}", seq, e);
                state.customers.clear();
                state.total = 0;
                state.error = Some(OperationError::new(Operation::Fetch, &e));
                Err(e)
            }
        }
    }

    /// Apply a partial update, then refetch the current view
    pub async fn update_customer(&self, id: &str, data: &CustomerUpdate) -> Result<(), Error> {
        let result = self.inner.api.update(id, data).await;
        self.finish_mutation(Operation::Update, id, result).await
    }

    /// Delete a customer, then refetch the current view
    pub async fn delete_customer(&self, id: &str) -> Result<(), Error> {
        let result = self.inner.api.delete(id).await;
        self.finish_mutation(Operation::Delete, id, result).await
    }

    /// Create a customer, then refetch the current view
    pub async fn create_customer(&self, data: &NewCustomer) -> Result<(), Error> {
        let result = self.inner.api.create(data).await;
        self.finish_mutation(Operation::Create, "-", result).await
    }

    async fn finish_mutation(
        &self,
        operation: Operation,
        id: &str,
        result: Result<(), Error>,
    ) -> Result<(), Error> {
        match result {
            Ok(()) => {
                info!("{} succeeded for {}", operation, id);
                // the mutation stands even if the refetch fails; the fetch
                // error is in the slot already
                if let Err(e) = self.refresh().await {
                    debug!("Refetch after {} failed: {}", operation, e);
                }
                Ok(())
            }
            Err(e) => {
                warn!("{} failed for {}: {}", operation, id, e);
                let mut state = self.inner.state.write().await;
                state.error = Some(OperationError::new(operation, &e));
                Err(e)
            }
        }
    }
}
