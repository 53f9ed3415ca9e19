//! In-memory `CustomerApi` used by unit tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::customers::{
    fixtures, CustomerApi, CustomerUpdate, CustomersPage, ListQuery, NewCustomer,
};
use crate::error::{Error, Operation};

/// Records every call; serves `total` synthetic customers.
#[derive(Default)]
pub struct FakeApi {
    pub total: u64,
    pub lists: Mutex<Vec<ListQuery>>,
    pub updates: Mutex<Vec<(String, CustomerUpdate)>>,
    pub deletes: Mutex<Vec<String>>,
    pub creates: Mutex<Vec<NewCustomer>>,
    /// Per-search delay before `list` answers
    pub delays: HashMap<String, Duration>,
    /// Operations that answer with a 500
    pub failing: Mutex<Vec<Operation>>,
}

impl FakeApi {
    pub fn with_total(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn delay(mut self, search: &str, delay: Duration) -> Self {
        self.delays.insert(search.to_string(), delay);
        self
    }

    pub fn fail(&self, operation: Operation) {
        self.failing.lock().unwrap().push(operation);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn list_calls(&self) -> Vec<ListQuery> {
        self.lists.lock().unwrap().clone()
    }

    fn check(&self, operation: Operation) -> Result<(), Error> {
        if self.failing.lock().unwrap().contains(&operation) {
            return Err(Error::api(
                operation,
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerApi for FakeApi {
    async fn list(&self, query: &ListQuery) -> Result<CustomersPage, Error> {
        self.lists.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delays.get(&query.search) {
            tokio::time::sleep(*delay).await;
        }
        self.check(Operation::Fetch)?;

        let start = u64::from(query.page - 1) * u64::from(query.per_page);
        let end = (start + u64::from(query.per_page)).min(self.total);
        let data = (start..end)
            .map(|i| {
                let gender = if i % 2 == 0 { "female" } else { "male" };
                let first = if query.search.is_empty() {
                    format!("Customer{}", i)
                } else {
                    format!("{}{}", query.search, i)
                };
                let age = 20 + (i % 40) as u32;
                fixtures::customer(&format!("uuid-{}", i), &first, gender, age, "Norway")
            })
            .collect();

        Ok(CustomersPage {
            page: query.page,
            per_page: query.per_page,
            total: self.total,
            span: String::new(),
            effective_page: query.page,
            data,
        })
    }

    async fn update(&self, id: &str, data: &CustomerUpdate) -> Result<(), Error> {
        self.check(Operation::Update)?;
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), data.clone()));
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.check(Operation::Delete)?;
        self.deletes.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn create(&self, data: &NewCustomer) -> Result<(), Error> {
        self.check(Operation::Create)?;
        self.creates.lock().unwrap().push(data.clone());
        Ok(())
    }
}
