//! Summary statistics over the currently loaded page

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::customers::Customer;

/// Window for "new this month"
pub const RECENT_REGISTRATION_DAYS: i64 = 30;

/// Figures shown on the dashboard cards.
///
/// Everything except `total_customers` is computed over the loaded rows only,
/// not the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Server-reported size of the collection
    pub total_customers: u64,
    /// Rounded mean of `dob.age`; 0 when no rows are loaded
    pub avg_age: u32,
    pub male_count: usize,
    pub female_count: usize,
    /// Distinct `location.country` values
    pub countries: usize,
    /// Rows registered within the last thirty days
    pub recent_registrations: usize,
}

impl DashboardStats {
    /// Derive the statistics for `rows` as of `now`
    pub fn compute(rows: &[Customer], total: u64, now: DateTime<Utc>) -> Self {
        let avg_age = if rows.is_empty() {
            0
        } else {
            let sum: u64 = rows.iter().map(|c| u64::from(c.dob.age)).sum();
            (sum as f64 / rows.len() as f64).round() as u32
        };

        let male_count = rows
            .iter()
            .filter(|c| c.gender.as_deref() == Some("male"))
            .count();
        let female_count = rows
            .iter()
            .filter(|c| c.gender.as_deref() == Some("female"))
            .count();

        let countries = rows
            .iter()
            .map(|c| c.location.country.as_str())
            .collect::<HashSet<_>>()
            .len();

        let cutoff = now - Duration::days(RECENT_REGISTRATION_DAYS);
        let recent_registrations = rows
            .iter()
            .filter_map(|c| c.registered.parsed())
            .filter(|registered| *registered > cutoff)
            .count();

        Self {
            total_customers: total,
            avg_age,
            male_count,
            female_count,
            countries,
            recent_registrations,
        }
    }

    /// Card descriptors in display order
    pub fn cards(&self) -> Vec<StatCard> {
        vec![
            StatCard::new("Total Customers", group_thousands(self.total_customers), "All time"),
            StatCard::new("Average Age", format!("{} years", self.avg_age), "Current dataset"),
            StatCard::new("Male Customers", self.male_count.to_string(), "Current page"),
            StatCard::new("Female Customers", self.female_count.to_string(), "Current page"),
            StatCard::new("Countries", self.countries.to_string(), "Current page"),
            StatCard::new(
                "New This Month",
                self.recent_registrations.to_string(),
                "Last 30 days",
            ),
        ]
    }
}

/// One statistics card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    /// Scope the value covers
    pub interval: &'static str,
}

impl StatCard {
    fn new(title: &'static str, value: String, interval: &'static str) -> Self {
        Self {
            title,
            value,
            interval,
        }
    }
}

/// 1234567 -> "1,234,567"
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
