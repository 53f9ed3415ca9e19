//! Delete confirmation dialog

use crate::collection::CustomerCollection;
use crate::customers::{Customer, CustomerApi};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    Confirming {
        customer: Customer,
        /// Message from a failed confirm; the dialog stays open
        error: Option<String>,
    },
}

#[derive(Debug, Default)]
pub struct DeleteDialog {
    state: DeleteState,
}

impl DeleteDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DeleteState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DeleteState::Confirming { .. })
    }

    pub fn pending(&self) -> Option<&Customer> {
        match &self.state {
            DeleteState::Confirming { customer, .. } => Some(customer),
            DeleteState::Idle => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            DeleteState::Confirming { error, .. } => error.as_deref(),
            DeleteState::Idle => None,
        }
    }

    /// Question shown in the dialog body
    pub fn prompt(&self) -> Option<String> {
        self.pending().map(|c| {
            format!(
                "Are you sure you want to delete {}? This action cannot be undone.",
                c.full_name()
            )
        })
    }

    pub fn request(&mut self, customer: Customer) {
        self.state = DeleteState::Confirming {
            customer,
            error: None,
        };
    }

    /// Delete the pending customer; the dialog closes only on success
    pub async fn confirm<A: CustomerApi>(
        &mut self,
        collection: &CustomerCollection<A>,
    ) -> Result<(), Error> {
        let id = match self.pending() {
            Some(customer) => customer.login.uuid.clone(),
            None => return Err(Error::invalid_input("no deletion is pending")),
        };

        match collection.delete_customer(&id).await {
            Ok(()) => {
                self.state = DeleteState::Idle;
                Ok(())
            }
            Err(e) => {
                if let DeleteState::Confirming { error, .. } = &mut self.state {
                    *error = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    pub fn cancel(&mut self) {
        self.state = DeleteState::Idle;
    }
}
