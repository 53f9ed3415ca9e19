//! Listing parameters: paging, search and sort

use std::fmt;

use crate::error::Error;

/// Server-side sort keys, as dot-paths into the customer record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    FirstName,
    Email,
    Age,
    City,
    Country,
    RegisteredDate,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::FirstName,
        SortKey::Email,
        SortKey::Age,
        SortKey::City,
        SortKey::Country,
        SortKey::RegisteredDate,
    ];

    /// Convert the key to the path the API expects in `sortBy`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::FirstName => "name.first",
            SortKey::Email => "email",
            SortKey::Age => "dob.age",
            SortKey::City => "location.city",
            SortKey::Country => "location.country",
            SortKey::RegisteredDate => "registered.date",
        }
    }

    /// Parse a dot-path; anything unrecognized sorts by first name
    pub fn from_path(path: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == path)
            .unwrap_or_default()
    }

    /// Map a table column to its sort key; unknown columns sort by first name
    pub fn from_column(column: &str) -> Self {
        match column {
            "fullName" => SortKey::FirstName,
            "email" => SortKey::Email,
            "age" => SortKey::Age,
            "city" => SortKey::City,
            "country" => SortKey::Country,
            "registeredDate" => SortKey::RegisteredDate,
            _ => SortKey::FirstName,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The view parameters for one page of customers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
    /// Free text; omitted from the request when empty
    pub search: String,
    pub sort_by: SortKey,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            search: String::new(),
            sort_by: SortKey::FirstName,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn search(mut self, search: &str) -> Self {
        self.search = search.to_string();
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_by = key;
        self
    }

    /// Reject pages and page sizes the API cannot serve
    pub fn validate(&self) -> Result<(), Error> {
        if self.page == 0 {
            return Err(Error::invalid_input("page numbers start at 1"));
        }
        if self.per_page == 0 {
            return Err(Error::invalid_input("per_page must be at least 1"));
        }
        Ok(())
    }

    /// Query string pairs in request order
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("perPage".to_string(), self.per_page.to_string()),
            ("sortBy".to_string(), self.sort_by.as_str().to_string()),
        ];
        if !self.search.is_empty() {
            params.push(("search".to_string(), self.search.clone()));
        }
        params
    }

    /// Number of pages needed to show `total` rows at this page size
    pub fn page_count(&self, total: u64) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        total.div_ceil(u64::from(self.per_page))
    }
}
