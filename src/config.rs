//! Configuration options for the CRM dashboard client

use std::time::Duration;

use crate::error::Error;

/// Base URL of the public customers API
pub const DEFAULT_BASE_URL: &str = "https://user-api.builder-io.workers.dev/api";

/// Configuration options for the CRM dashboard client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the API, without the `/users` resource
    pub base_url: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Rows per page when a view is first created
    pub per_page: u32,

    /// Quiet period before search input is propagated
    pub search_debounce: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            per_page: 10,
            search_debounce: Duration::from_millis(500),
        }
    }
}

impl ClientOptions {
    /// Build options from the environment, falling back to defaults.
    ///
    /// Reads `CRM_API_URL`, `CRM_REQUEST_TIMEOUT_SECS` and `CRM_PER_PAGE`,
    /// loading a `.env` file first if one is present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        let mut options = Self::default();

        if let Ok(url) = std::env::var("CRM_API_URL") {
            options = options.with_base_url(&url);
        }

        if let Ok(secs) = std::env::var("CRM_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::config(format!("CRM_REQUEST_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            // zero disables the timeout
            let timeout = (secs > 0).then(|| Duration::from_secs(secs));
            options = options.with_request_timeout(timeout);
        }

        if let Ok(per_page) = std::env::var("CRM_PER_PAGE") {
            let per_page: u32 = per_page.trim().parse().map_err(|_| {
                Error::config(format!("CRM_PER_PAGE is not a number: {}", per_page))
            })?;
            options = options.with_per_page(per_page);
        }

        options.validate()?;
        Ok(options)
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the initial page size
    pub fn with_per_page(mut self, value: u32) -> Self {
        self.per_page = value;
        self
    }

    /// Set the search debounce period
    pub fn with_search_debounce(mut self, value: Duration) -> Self {
        self.search_debounce = value;
        self
    }

    /// Check the options for values no request could be built from
    pub fn validate(&self) -> Result<(), Error> {
        if self.base_url.is_empty() {
            return Err(Error::config("base_url cannot be empty"));
        }
        url::Url::parse(&self.base_url)?;
        if self.per_page == 0 {
            return Err(Error::config("per_page must be at least 1"));
        }
        Ok(())
    }
}
