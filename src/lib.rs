//! CRM dashboard client library
//!
//! A Rust client for a customer CRM API, together with the state a dashboard
//! needs on top of it: the paged/searched/sorted view of the collection,
//! statistics over the loaded page, and the edit and delete workflows.

pub mod collection;
pub mod config;
pub mod customers;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

use reqwest::Client;

use crate::collection::CustomerCollection;
use crate::config::ClientOptions;
use crate::customers::CustomersClient;
use crate::dashboard::Dashboard;
use crate::error::Error;

/// The main entry point for the CRM dashboard client
pub struct Crm {
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
}

impl Crm {
    /// Create a new client for the API at `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use crm_dashboard::Crm;
    ///
    /// let crm = Crm::new("https://user-api.builder-io.workers.dev/api").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::new_with_options(ClientOptions::default().with_base_url(base_url))
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use crm_dashboard::{Crm, config::ClientOptions};
    ///
    /// let options = ClientOptions::default()
    ///     .with_per_page(25)
    ///     .with_request_timeout(Some(Duration::from_secs(5)));
    /// let crm = Crm::new_with_options(options).unwrap();
    /// ```
    pub fn new_with_options(options: ClientOptions) -> Result<Self, Error> {
        options.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            options,
        })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> Result<Self, Error> {
        Self::new_with_options(ClientOptions::from_env()?)
    }

    /// HTTP client for the customers resource
    pub fn customers(&self) -> Result<CustomersClient, Error> {
        CustomersClient::new(&self.options.base_url, self.http_client.clone())
    }

    /// A collection view using the configured page size
    pub fn collection(&self) -> Result<CustomerCollection<CustomersClient>, Error> {
        let view = customers::ListQuery::default().per_page(self.options.per_page);
        Ok(CustomerCollection::with_view(self.customers()?, view))
    }

    /// A dashboard over the customers resource. Must be called within a
    /// tokio runtime.
    pub fn dashboard(&self) -> Result<Dashboard<CustomersClient>, Error> {
        Ok(Dashboard::new(self.customers()?, &self.options))
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::collection::{CollectionSnapshot, CustomerCollection};
    pub use crate::config::ClientOptions;
    pub use crate::customers::{
        Customer, CustomerApi, CustomerUpdate, CustomersClient, ListQuery, NewCustomer, SortKey,
    };
    pub use crate::dashboard::Dashboard;
    pub use crate::error::{Error, Operation};
    pub use crate::stats::DashboardStats;
    pub use crate::Crm;
}
