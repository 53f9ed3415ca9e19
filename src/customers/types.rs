//! Types for customer records and the payloads sent back to the API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Login identity. `uuid` addresses the record for update and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Login {
    pub uuid: String,
    pub username: String,
    /// Opaque; never inspected by this client
    #[serde(default)]
    pub password: String,
}

/// Personal name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub title: String,
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Street {
    pub number: u32,
    pub name: String,
}

/// Geographic coordinates. The API may send these as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(deserialize_with = "f64_from_any")]
    pub latitude: f64,
    #[serde(deserialize_with = "f64_from_any")]
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timezone {
    pub offset: String,
    pub description: String,
}

/// Postal location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub street: Street,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(deserialize_with = "string_from_any")]
    pub postcode: String,
    pub coordinates: Coordinates,
    pub timezone: Timezone,
}

/// A date with the whole number of years elapsed since it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedAge {
    pub date: String,
    pub age: u32,
}

impl DatedAge {
    /// Parse `date`, accepting RFC 3339 timestamps and bare `YYYY-MM-DD` dates
    pub fn parsed(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub large: String,
    pub medium: String,
    pub thumbnail: String,
}

/// A single customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub login: Login,
    pub name: Name,
    /// Free-form; observed values are "male", "female" and "other". Some
    /// records carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub location: Location,
    pub email: String,
    pub dob: DatedAge,
    pub registered: DatedAge,
    pub phone: String,
    pub cell: String,
    pub picture: Picture,
    pub nat: String,
}

impl Customer {
    /// Unique identifier used to address this record
    pub fn id(&self) -> &str {
        &self.login.uuid
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.first, self.name.last)
    }
}

/// One page of the customer listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersPage {
    pub page: u32,
    pub per_page: u32,
    /// Size of the whole filtered collection, independent of page size
    pub total: u64,
    #[serde(default)]
    pub span: String,
    #[serde(default)]
    pub effective_page: u32,
    pub data: Vec<Customer>,
}

/// Partial update of a customer's name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

/// Partial update of a street address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Partial update of a location. Coordinates and timezone are not editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<StreetUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
}

/// Sparse update payload for `PUT /users/{uuid}`.
///
/// Only fields that are `Some` are serialized; the server leaves everything
/// else untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NameUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl CustomerUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an update with every editable field of `customer`
    pub fn from_customer(customer: &Customer) -> Self {
        let location = &customer.location;
        Self {
            name: Some(NameUpdate {
                title: Some(customer.name.title.clone()),
                first: Some(customer.name.first.clone()),
                last: Some(customer.name.last.clone()),
            }),
            location: Some(LocationUpdate {
                street: Some(StreetUpdate {
                    number: Some(location.street.number),
                    name: Some(location.street.name.clone()),
                }),
                city: Some(location.city.clone()),
                state: Some(location.state.clone()),
                country: Some(location.country.clone()),
                postcode: Some(location.postcode.clone()),
            }),
            email: Some(customer.email.clone()),
            phone: Some(customer.phone.clone()),
            cell: Some(customer.cell.clone()),
            gender: customer.gender.clone(),
        }
    }

    /// Whether the update would change nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn name_mut(&mut self) -> &mut NameUpdate {
        self.name.get_or_insert_with(NameUpdate::default)
    }

    pub fn location_mut(&mut self) -> &mut LocationUpdate {
        self.location.get_or_insert_with(LocationUpdate::default)
    }

    pub fn street_mut(&mut self) -> &mut StreetUpdate {
        self.location_mut()
            .street
            .get_or_insert_with(StreetUpdate::default)
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.name_mut().title = Some(value.into());
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.name_mut().first = Some(value.into());
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.name_mut().last = Some(value.into());
    }

    pub fn set_street_number(&mut self, value: u32) {
        self.street_mut().number = Some(value);
    }

    pub fn set_street_name(&mut self, value: impl Into<String>) {
        self.street_mut().name = Some(value.into());
    }

    pub fn set_city(&mut self, value: impl Into<String>) {
        self.location_mut().city = Some(value.into());
    }

    pub fn set_state(&mut self, value: impl Into<String>) {
        self.location_mut().state = Some(value.into());
    }

    pub fn set_country(&mut self, value: impl Into<String>) {
        self.location_mut().country = Some(value.into());
    }

    pub fn set_postcode(&mut self, value: impl Into<String>) {
        self.location_mut().postcode = Some(value.into());
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = Some(value.into());
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.phone = Some(value.into());
    }

    pub fn set_cell(&mut self, value: impl Into<String>) {
        self.cell = Some(value.into());
    }

    pub fn set_gender(&mut self, value: impl Into<String>) {
        self.gender = Some(value.into());
    }

    /// Builder form of [`CustomerUpdate::set_email`]
    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.set_email(value);
        self
    }
}

/// Sparse payload for `POST /users`. Each top-level group is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<Login>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<DatedAge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered: Option<DatedAge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<Picture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat: Option<String>,
}

impl NewCustomer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, title: &str, first: &str, last: &str) -> Self {
        self.name = Some(Name {
            title: title.to_string(),
            first: first.to_string(),
            last: last.to_string(),
        });
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }
}

/// Parse an API timestamp
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn f64_from_any<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("number out of range")),
        Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "expected number or numeric string, got {}",
            other
        ))),
    }
}

fn string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire_customer() -> Value {
        json!({
            "login": { "uuid": "abc", "username": "bluebird", "password": "pw" },
            "name": { "title": "Mrs", "first": "Jane", "last": "Roe" },
            "gender": "female",
            "location": {
                "street": { "number": 12, "name": "Elm Road" },
                "city": "Leeds",
                "state": "West Yorkshire",
                "country": "United Kingdom",
                "postcode": 40511,
                "coordinates": { "latitude": "-69.8246", "longitude": 134.8719 },
                "timezone": { "offset": "+5:30", "description": "Bombay" }
            },
            "email": "jane.roe@example.com",
            "dob": { "date": "1985-02-11T03:12:45.123Z", "age": 39 },
            "registered": { "date": "2010-09-01T12:00:00.000Z", "age": 14 },
            "phone": "011-1234",
            "cell": "077-5678",
            "picture": {
                "large": "https://example.com/l.jpg",
                "medium": "https://example.com/m.jpg",
                "thumbnail": "https://example.com/t.jpg"
            },
            "nat": "GB"
        })
    }

    #[test]
    fn customer_tolerates_loose_wire_types() {
        let customer: Customer = serde_json::from_value(wire_customer()).unwrap();
        assert_eq!(customer.id(), "abc");
        assert_eq!(customer.full_name(), "Jane Roe");
        assert_eq!(customer.location.postcode, "40511");
        assert!((customer.location.coordinates.latitude + 69.8246).abs() < 1e-9);
        assert!(customer.registered.parsed().is_some());
    }

    #[test]
    fn gender_may_be_missing() {
        let mut wire = wire_customer();
        wire.as_object_mut().unwrap().remove("gender");
        let customer: Customer = serde_json::from_value(wire).unwrap();
        assert_eq!(customer.gender, None);

        let update = CustomerUpdate::from_customer(&customer);
        assert!(serde_json::to_value(&update).unwrap().get("gender").is_none());
    }

    #[test]
    fn page_uses_camel_case_keys() {
        let page: CustomersPage = serde_json::from_value(json!({
            "page": 1,
            "perPage": 10,
            "total": 25,
            "span": "1-10",
            "effectivePage": 1,
            "data": [wire_customer()]
        }))
        .unwrap();
        assert_eq!(page.per_page, 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.effective_page, 1);
        assert_eq!(page.data.len(), 1);
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        let update = CustomerUpdate::new();
        assert!(update.is_empty());
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({}));
    }

    #[test]
    fn setters_only_touch_their_branch() {
        let mut update = CustomerUpdate::new();
        update.set_street_number(42);
        update.set_email("new@example.com");
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "location": { "street": { "number": 42 } },
                "email": "new@example.com"
            })
        );
    }

    #[test]
    fn seeded_update_covers_editable_fields() {
        let customer: Customer = serde_json::from_value(wire_customer()).unwrap();
        let update = CustomerUpdate::from_customer(&customer);
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["name"]["first"], "Jane");
        assert_eq!(value["location"]["street"]["number"], 12);
        assert_eq!(value["location"]["postcode"], "40511");
        assert_eq!(value["gender"], "female");
        assert!(value["location"].get("coordinates").is_none());
        assert!(value.get("login").is_none());
    }

    #[test]
    fn new_customer_is_sparse() {
        let payload = NewCustomer::new()
            .with_name("Mr", "John", "Smith")
            .with_email("john@example.com");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "name": { "title": "Mr", "first": "John", "last": "Smith" },
                "email": "john@example.com"
            })
        );
    }

    #[test]
    fn timestamps_accept_plain_dates() {
        assert!(parse_timestamp("2024-01-31").is_some());
        assert!(parse_timestamp("2024-01-31T10:00:00Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
