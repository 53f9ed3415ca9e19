//! Table vocabulary: what a grid widget reports and what each row shows

use crate::customers::{Customer, SortKey};

/// Page sizes offered by the pager
pub const PAGE_SIZE_OPTIONS: [u32; 5] = [5, 10, 25, 50, 100];

/// Pagination as reported by the grid: 0-based page index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationModel {
    pub page: u32,
    pub page_size: u32,
}

impl PaginationModel {
    /// Grid model for a 1-based view page
    pub fn from_view(page: u32, per_page: u32) -> Self {
        Self {
            page: page.saturating_sub(1),
            page_size: per_page,
        }
    }

    /// 1-based page for the view
    pub fn view_page(&self) -> u32 {
        self.page + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One entry of the grid's sort model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortItem {
    pub field: String,
    pub direction: SortDirection,
}

impl SortItem {
    pub fn new(field: &str, direction: SortDirection) -> Self {
        Self {
            field: field.to_string(),
            direction,
        }
    }
}

/// Sort key for a grid sort model; `None` when the model is empty.
///
/// Only the first entry counts. The API sorts in its own fixed direction.
pub fn sort_key_for(model: &[SortItem]) -> Option<SortKey> {
    model.first().map(|item| SortKey::from_column(&item.field))
}

/// Colour band for the age chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    Young,
    Adult,
    Middle,
    Senior,
}

impl AgeBand {
    pub fn for_age(age: u32) -> Self {
        match age {
            0..=24 => AgeBand::Young,
            25..=34 => AgeBand::Adult,
            35..=49 => AgeBand::Middle,
            _ => AgeBand::Senior,
        }
    }
}

/// Display projection of a customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub id: String,
    pub thumbnail: String,
    pub full_name: String,
    /// `@username`
    pub handle: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub age_band: AgeBand,
    pub city: String,
    /// Country followed by nationality code, e.g. `Norway (NO)`
    pub country: String,
    pub gender: String,
    /// Registration date as `Mon D, YYYY`; the raw value if it does not parse
    pub registered: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.login.uuid.clone(),
            thumbnail: customer.picture.thumbnail.clone(),
            full_name: customer.full_name(),
            handle: format!("@{}", customer.login.username),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            age: customer.dob.age,
            age_band: AgeBand::for_age(customer.dob.age),
            city: customer.location.city.clone(),
            country: format!("{} ({})", customer.location.country, customer.nat),
            gender: customer.gender.clone().unwrap_or_default(),
            registered: format_registered(customer),
        }
    }
}

fn format_registered(customer: &Customer) -> String {
    match customer.registered.parsed() {
        Some(ts) => ts.format("%b %-d, %Y").to_string(),
        None => customer.registered.date.clone(),
    }
}

/// Rows for a loaded page, in server order
pub fn rows(customers: &[Customer]) -> Vec<CustomerRow> {
    customers.iter().map(CustomerRow::from).collect()
}
