use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    /// Unique identifier of the customer.
    pub id: i32,
    /// Login account linked to the customer, if any.
    pub user_id: Option<i32>,
    /// Human-friendly display name of the customer.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Primary email address stored in lowercase for comparisons.
    pub email: String,
    /// Timestamp for when the customer record was created.
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a new customer.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NewCustomer {
    /// Login account linked to the customer, if any.
    pub user_id: Option<i32>,
    /// Human-friendly display name of the customer.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Primary email address stored in lowercase for comparisons.
    pub email: String,
}

impl NewCustomer {
    /// Build a new customer payload while normalising the email to lowercase.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: None,
            name: name.into(),
            phone: phone.into(),
            email: email.into().trim().to_lowercase(),
        }
    }

    /// Link the customer to a login account.
    #[must_use]
    pub fn with_user_id(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }
}
