//! Customer operations against the `/users` resource

mod query;
mod types;

use async_trait::async_trait;
use log::info;
use reqwest::Client;
use url::Url;

use crate::error::{Error, Operation};
use crate::fetch::Fetch;

pub use query::*;
pub use types::*;

#[cfg(test)]
pub(crate) use types::fixtures;

/// The remote customers resource.
///
/// [`CustomersClient`] talks HTTP; the collection and dashboard only depend on
/// this trait.
#[async_trait]
pub trait CustomerApi: Send + Sync {
    /// Fetch one page of customers
    async fn list(&self, query: &ListQuery) -> Result<CustomersPage, Error>;

    /// Apply a partial update to the customer identified by `id`
    async fn update(&self, id: &str, data: &CustomerUpdate) -> Result<(), Error>;

    /// Remove the customer identified by `id`
    async fn delete(&self, id: &str) -> Result<(), Error>;

    /// Create a new customer
    async fn create(&self, data: &NewCustomer) -> Result<(), Error>;
}

/// HTTP client for the customers resource
#[derive(Debug, Clone)]
pub struct CustomersClient {
    /// API base, e.g. `https://host/api`
    base_url: Url,

    /// HTTP client
    client: Client,
}

impl CustomersClient {
    /// Create a new CustomersClient
    pub fn new(base_url: &str, client: Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!("not a base URL: {}", base_url)));
        }
        Ok(Self { base_url, client })
    }

    /// URL of the collection, or of one record when `id` is given
    fn users_url(&self, id: Option<&str>) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::config("base URL cannot carry a path"))?;
            segments.pop_if_empty().push("users");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn require_id(id: &str) -> Result<(), Error> {
        if id.trim().is_empty() {
            return Err(Error::invalid_input("customer id cannot be empty"));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerApi for CustomersClient {
    async fn list(&self, query: &ListQuery) -> Result<CustomersPage, Error> {
        query.validate()?;
        let url = self.users_url(None)?;
        Fetch::get(&self.client, url.as_str())
            .query(query.to_params())
            .execute::<CustomersPage>(Operation::Fetch)
            .await
    }

    async fn update(&self, id: &str, data: &CustomerUpdate) -> Result<(), Error> {
        Self::require_id(id)?;
        let url = self.users_url(Some(id))?;
        Fetch::put(&self.client, url.as_str())
            .json(data)?
            .execute_empty(Operation::Update)
            .await?;
        info!("Updated customer {}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        Self::require_id(id)?;
        let url = self.users_url(Some(id))?;
        Fetch::delete(&self.client, url.as_str())
            .execute_empty(Operation::Delete)
            .await?;
        info!("Deleted customer {}", id);
        Ok(())
    }

    async fn create(&self, data: &NewCustomer) -> Result<(), Error> {
        let url = self.users_url(None)?;
        Fetch::post(&self.client, url.as_str())
            .json(data)?
            .execute_empty(Operation::Create)
            .await?;
        info!("Created customer");
        Ok(())
    }
}
