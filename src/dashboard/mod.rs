//! Dashboard interaction state
//!
//! [`Dashboard`] ties a [`CustomerCollection`] to the pieces a front end
//! drives: the debounced search box, grid sort and pagination events, the edit
//! modal and the delete confirmation. Rendering is left to the caller; it
//! reads rows, statistics and the error banner from here.

mod delete;
mod edit;
mod search;
mod table;

use chrono::Utc;
use log::warn;

use crate::collection::{CollectionSnapshot, CustomerCollection};
use crate::config::ClientOptions;
use crate::customers::{Customer, CustomerApi, ListQuery, NewCustomer};
use crate::error::Error;
use crate::stats::DashboardStats;

pub use delete::*;
pub use edit::*;
pub use search::*;
pub use table::*;

/// Pager figures for the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based
    pub page: u32,
    pub per_page: u32,
    pub page_count: u64,
    pub total: u64,
}

impl PageInfo {
    fn from_snapshot(snapshot: &CollectionSnapshot) -> Self {
        Self {
            page: snapshot.view.page,
            per_page: snapshot.view.per_page,
            page_count: snapshot.page_count(),
            total: snapshot.total,
        }
    }

    /// Grid pagination model for this page
    pub fn model(&self) -> PaginationModel {
        PaginationModel::from_view(self.page, self.per_page)
    }
}

pub struct Dashboard<A> {
    collection: CustomerCollection<A>,
    edit: EditModal,
    delete: DeleteDialog,
    search: SearchDebouncer,
    search_text: String,
}

impl<A: CustomerApi + 'static> Dashboard<A> {
    /// Create a dashboard over `api`. Must be called within a tokio runtime;
    /// nothing is fetched until [`mount`](Self::mount).
    pub fn new(api: A, options: &ClientOptions) -> Self {
        let view = ListQuery::default().per_page(options.per_page);
        let collection = CustomerCollection::with_view(api, view);

        let (search, mut settled) = SearchDebouncer::spawn(options.search_debounce);
        let forward_to = collection.clone();
        tokio::spawn(async move {
            while let Some(text) = settled.recv().await {
                if let Err(e) = forward_to.set_search(text).await {
                    warn!("Search fetch failed: {}", e);
                }
            }
        });

        Self {
            collection,
            edit: EditModal::new(),
            delete: DeleteDialog::new(),
            search,
            search_text: String::new(),
        }
    }

    /// Initial fetch
    pub async fn mount(&self) -> Result<(), Error> {
        self.collection.load().await
    }

    pub fn collection(&self) -> &CustomerCollection<A> {
        &self.collection
    }

    pub async fn snapshot(&self) -> CollectionSnapshot {
        self.collection.snapshot().await
    }

    pub async fn stats(&self) -> DashboardStats {
        self.snapshot().await.stats(Utc::now())
    }

    pub async fn rows(&self) -> Vec<CustomerRow> {
        rows(&self.collection.customers().await)
    }

    pub async fn page_info(&self) -> PageInfo {
        PageInfo::from_snapshot(&self.snapshot().await)
    }

    /// Message for the error banner, if the last operation failed
    pub async fn error(&self) -> Option<String> {
        self.collection.error().await.map(|e| e.message)
    }

    pub async fn refresh(&self) -> Result<(), Error> {
        self.collection.refresh().await
    }

    /// Text currently in the search box
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// A keystroke in the search box; the view follows after the quiet period
    pub fn search_input(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.search.input(self.search_text.clone());
    }

    /// Grid sort event
    pub async fn on_sort_change(&self, model: &[SortItem]) -> Result<(), Error> {
        match sort_key_for(model) {
            Some(key) => self.collection.set_sort(key).await,
            None => Ok(()),
        }
    }

    /// Grid pagination event
    pub async fn on_pagination_change(&self, model: PaginationModel) -> Result<(), Error> {
        self.collection
            .apply_pagination(model.view_page(), model.page_size)
            .await
    }

    pub fn edit_modal(&self) -> &EditModal {
        &self.edit
    }

    pub fn edit_customer(&mut self, customer: Customer) {
        self.edit.open(customer);
    }

    pub fn edit_field(&mut self, field: EditField, value: &str) -> Result<(), Error> {
        self.edit.set_field(field, value)
    }

    pub async fn save_edit(&mut self) -> Result<(), Error> {
        self.edit.save(&self.collection).await
    }

    pub fn close_edit(&mut self) {
        self.edit.close();
    }

    pub fn delete_dialog(&self) -> &DeleteDialog {
        &self.delete
    }

    pub fn request_delete(&mut self, customer: Customer) {
        self.delete.request(customer);
    }

    pub async fn confirm_delete(&mut self) -> Result<(), Error> {
        self.delete.confirm(&self.collection).await
    }

    pub fn cancel_delete(&mut self) {
        self.delete.cancel();
    }

    pub async fn create_customer(&self, data: &NewCustomer) -> Result<(), Error> {
        self.collection.create_customer(data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customers::SortKey;
    use crate::testing::FakeApi;
    use std::time::Duration;
    use tokio::time::sleep;

    fn dashboard(total: u64) -> Dashboard<FakeApi> {
        Dashboard::new(FakeApi::with_total(total), &ClientOptions::default())
    }

    #[tokio::test]
    async fn mount_shows_first_page() {
        let dashboard = dashboard(25);
        dashboard.mount().await.unwrap();

        let info = dashboard.page_info().await;
        assert_eq!(info.page, 1);
        assert_eq!(info.page_count, 3);
        assert_eq!(info.total, 25);
        assert_eq!(info.model().page, 0);
        assert_eq!(dashboard.rows().await.len(), 10);

        let stats = dashboard.stats().await;
        assert_eq!(stats.total_customers, 25);
        assert_eq!(stats.male_count + stats.female_count, 10);
        assert_eq!(stats.countries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_fires_one_search_fetch() {
        let mut dashboard = dashboard(25);

        dashboard.search_input("mar");
        sleep(Duration::from_millis(200)).await;
        dashboard.search_input("maria");
        assert_eq!(dashboard.search_text(), "maria");
        sleep(Duration::from_millis(800)).await;

        let calls = dashboard.collection().api().list_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].search, "maria");
    }

    #[tokio::test]
    async fn grid_events_translate_to_view() {
        let dashboard = dashboard(100);
        dashboard.mount().await.unwrap();

        dashboard.on_sort_change(&[]).await.unwrap();
        dashboard
            .on_sort_change(&[SortItem::new("country", SortDirection::Descending)])
            .await
            .unwrap();
        dashboard
            .on_pagination_change(PaginationModel {
                page: 1,
                page_size: 25,
            })
            .await
            .unwrap();

        let calls = dashboard.collection().api().list_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].sort_by, SortKey::Country);
        assert_eq!((calls[2].page, calls[2].per_page), (2, 25));
    }

    #[tokio::test]
    async fn confirmed_delete_refetches_unchanged_view() {
        let mut dashboard = dashboard(25);
        dashboard.mount().await.unwrap();
        dashboard
            .on_pagination_change(PaginationModel {
                page: 1,
                page_size: 10,
            })
            .await
            .unwrap();
        let view_before = dashboard.collection().view().await;

        let target = dashboard.snapshot().await.customers[0].clone();
        dashboard.request_delete(target.clone());
        assert!(dashboard.delete_dialog().is_open());
        dashboard.confirm_delete().await.unwrap();
        assert!(!dashboard.delete_dialog().is_open());

        let api = dashboard.collection().api();
        assert_eq!(api.deletes.lock().unwrap().clone(), vec![target.login.uuid]);
        let calls = api.list_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], view_before);
    }

    #[tokio::test]
    async fn edit_flow_sends_buffer() {
        let mut dashboard = dashboard(25);
        dashboard.mount().await.unwrap();
        let target = dashboard.snapshot().await.customers[1].clone();

        dashboard.edit_customer(target.clone());
        dashboard.edit_field(EditField::City, "Bergen").unwrap();
        dashboard.save_edit().await.unwrap();
        assert!(!dashboard.edit_modal().is_open());

        let updates = dashboard.collection().api().updates.lock().unwrap().clone();
        assert_eq!(updates[0].0, target.login.uuid);
        let location = updates[0].1.location.clone().unwrap();
        assert_eq!(location.city.as_deref(), Some("Bergen"));
        assert_eq!(location.country.as_deref(), Some("Norway"));
    }

    #[tokio::test]
    async fn banner_shows_last_failure() {
        let dashboard = dashboard(25);
        dashboard.collection().api().fail(crate::error::Operation::Fetch);
        assert!(dashboard.mount().await.is_err());
        assert_eq!(
            dashboard.error().await.as_deref(),
            Some("Failed to fetch customers: Internal Server Error")
        );
        assert!(dashboard.rows().await.is_empty());
    }
}
