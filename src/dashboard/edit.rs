//! Edit modal: seed, change, save or discard a partial update

use log::debug;

use crate::collection::CustomerCollection;
use crate::customers::{Customer, CustomerApi, CustomerUpdate};
use crate::error::Error;

/// Shown when a save fails without a usable message
pub const GENERIC_SAVE_ERROR: &str = "Failed to save customer data";

/// Gender choices offered by the form
pub const GENDER_OPTIONS: [(&str, &str); 3] =
    [("male", "Male"), ("female", "Female"), ("other", "Other")];

/// An editable leaf of a customer record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    Title,
    FirstName,
    LastName,
    Email,
    Gender,
    Phone,
    Cell,
    StreetNumber,
    StreetName,
    City,
    State,
    Country,
    Postcode,
}

impl EditField {
    pub const ALL: [EditField; 13] = [
        EditField::Title,
        EditField::FirstName,
        EditField::LastName,
        EditField::Email,
        EditField::Gender,
        EditField::Phone,
        EditField::Cell,
        EditField::StreetNumber,
        EditField::StreetName,
        EditField::City,
        EditField::State,
        EditField::Country,
        EditField::Postcode,
    ];

    /// Form label
    pub fn label(&self) -> &'static str {
        match self {
            EditField::Title => "Title",
            EditField::FirstName => "First Name",
            EditField::LastName => "Last Name",
            EditField::Email => "Email",
            EditField::Gender => "Gender",
            EditField::Phone => "Phone",
            EditField::Cell => "Cell",
            EditField::StreetNumber => "Street Number",
            EditField::StreetName => "Street Name",
            EditField::City => "City",
            EditField::State => "State",
            EditField::Country => "Country",
            EditField::Postcode => "Postcode",
        }
    }

    /// Write `value` into `update`. Street numbers must parse as unsigned
    /// integers; on error `update` is left unchanged.
    pub fn apply(&self, update: &mut CustomerUpdate, value: &str) -> Result<(), Error> {
        match self {
            EditField::Title => update.set_title(value),
            EditField::FirstName => update.set_first_name(value),
            EditField::LastName => update.set_last_name(value),
            EditField::Email => update.set_email(value),
            EditField::Gender => update.set_gender(value),
            EditField::Phone => update.set_phone(value),
            EditField::Cell => update.set_cell(value),
            EditField::StreetNumber => {
                let number = value.trim().parse::<u32>().map_err(|_| {
                    Error::invalid_input(format!("street number must be a number: {:?}", value))
                })?;
                update.set_street_number(number);
            }
            EditField::StreetName => update.set_street_name(value),
            EditField::City => update.set_city(value),
            EditField::State => update.set_state(value),
            EditField::Country => update.set_country(value),
            EditField::Postcode => update.set_postcode(value),
        }
        Ok(())
    }
}

/// A record open in the modal
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub customer: Customer,
    pub buffer: CustomerUpdate,
    /// Inline error from the last save attempt
    pub error: Option<String>,
    pub saving: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(EditSession),
}

#[derive(Debug, Default)]
pub struct EditModal {
    state: EditState,
}

impl EditModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditState::Editing(session) => Some(session),
            EditState::Idle => None,
        }
    }

    /// Open the modal on `customer`, seeding the buffer from its editable fields
    pub fn open(&mut self, customer: Customer) {
        debug!("Editing customer {}", customer.login.uuid);
        let buffer = CustomerUpdate::from_customer(&customer);
        self.state = EditState::Editing(EditSession {
            customer,
            buffer,
            error: None,
            saving: false,
        });
    }

    pub fn set_field(&mut self, field: EditField, value: &str) -> Result<(), Error> {
        match &mut self.state {
            EditState::Editing(session) => field.apply(&mut session.buffer, value),
            EditState::Idle => Err(Error::invalid_input("no customer is being edited")),
        }
    }

    /// Send the buffer as an update. Success closes the modal; failure keeps
    /// it open with the error shown inline.
    pub async fn save<A: CustomerApi>(
        &mut self,
        collection: &CustomerCollection<A>,
    ) -> Result<(), Error> {
        let (id, buffer) = match &mut self.state {
            EditState::Editing(session) => {
                session.saving = true;
                session.error = None;
                (session.customer.login.uuid.clone(), session.buffer.clone())
            }
            EditState::Idle => return Err(Error::invalid_input("no customer is being edited")),
        };

        let result = collection.update_customer(&id, &buffer).await;

        match result {
            Ok(()) => {
                self.state = EditState::Idle;
                Ok(())
            }
            Err(e) => {
                if let EditState::Editing(session) = &mut self.state {
                    session.saving = false;
                    let message = e.to_string();
                    session.error = Some(if message.is_empty() {
                        GENERIC_SAVE_ERROR.to_string()
                    } else {
                        message
                    });
                }
                Err(e)
            }
        }
    }

    /// Close without saving
    pub fn close(&mut self) {
        self.state = EditState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customers::fixtures::customer;
    use crate::error::Operation;
    use crate::testing::FakeApi;
    use serde_json::json;

    #[test]
    fn street_number_edit_leaves_name_alone() {
        let mut modal = EditModal::new();
        modal.open(customer("abc", "Jane", "female", 30, "Norway"));
        modal.set_field(EditField::StreetNumber, "42").unwrap();

        let payload = serde_json::to_value(&modal.session().unwrap().buffer).unwrap();
        assert_eq!(payload["location"]["street"]["number"], json!(42));
        assert_eq!(payload["name"]["first"], "Jane");
        assert_eq!(payload["name"]["last"], "Doe");
    }

    #[test]
    fn non_numeric_street_number_is_rejected() {
        let mut modal = EditModal::new();
        modal.open(customer("abc", "Jane", "female", 30, "Norway"));
        let before = modal.session().unwrap().buffer.clone();
        assert!(modal.set_field(EditField::StreetNumber, "forty").is_err());
        assert_eq!(modal.session().unwrap().buffer, before);
    }

    #[test]
    fn editing_requires_an_open_record() {
        let mut modal = EditModal::new();
        assert!(modal.set_field(EditField::Email, "x").is_err());
        assert!(!modal.is_open());
    }

    #[test]
    fn every_field_writes_its_own_slot() {
        let mut update = CustomerUpdate::new();
        for field in EditField::ALL {
            let value = if field == EditField::StreetNumber { "1" } else { "v" };
            field.apply(&mut update, value).unwrap();
        }
        let name = update.name.clone().unwrap();
        assert_eq!(name.title.as_deref(), Some("v"));
        let location = update.location.clone().unwrap();
        assert_eq!(location.street.unwrap().number, Some(1));
        assert_eq!(location.postcode.as_deref(), Some("v"));
        assert_eq!(update.cell.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn successful_save_closes_modal() {
        let collection = CustomerCollection::new(FakeApi::with_total(5));
        let mut modal = EditModal::new();
        modal.open(customer("abc", "Jane", "female", 30, "Norway"));
        modal.set_field(EditField::Email, "jane@new.example").unwrap();

        modal.save(&collection).await.unwrap();
        assert!(!modal.is_open());

        let updates = collection.api().updates.lock().unwrap().clone();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "abc");
        assert_eq!(updates[0].1.email.as_deref(), Some("jane@new.example"));
    }

    #[tokio::test]
    async fn failed_save_stays_open_with_message() {
        let collection = CustomerCollection::new(FakeApi::with_total(5));
        collection.api().fail(Operation::Update);

        let mut modal = EditModal::new();
        modal.open(customer("abc", "Jane", "female", 30, "Norway"));
        assert!(modal.save(&collection).await.is_err());

        let session = modal.session().unwrap();
        assert!(!session.saving);
        assert_eq!(
            session.error.as_deref(),
            Some("Failed to update customer: Internal Server Error")
        );

        modal.close();
        assert_eq!(modal.state(), &EditState::Idle);
    }
}
