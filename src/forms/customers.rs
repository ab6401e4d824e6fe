use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::customer::NewCustomer;
use crate::forms::{empty_string_as_none, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 200;
const PHONE_MAX_LEN: u64 = 200;

/// Result type returned by the customer form helpers.
pub type CustomerFormResult<T> = Result<T, CustomerFormError>;

/// Errors that can occur while processing customer forms.
#[derive(Debug, Error)]
pub enum CustomerFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("customer name cannot be empty")]
    EmptyName,
}

/// Form payload emitted when submitting the "Add customer" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCustomerForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = PHONE_MAX_LEN))]
    pub phone: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email)]
    pub email: Option<String>,
}

impl AddCustomerForm {
    /// Validates and sanitizes the payload into a domain `NewCustomer`.
    /// Fields are sanitized first so the length and email rules see the stored values.
    pub fn into_new_customer(self) -> CustomerFormResult<NewCustomer> {
        let form = Self {
            name: sanitize_inline_text(&self.name),
            phone: sanitize_inline_text(&self.phone),
            email: self
                .email
                .map(|email| email.trim().to_string())
                .filter(|email| !email.is_empty()),
        };

        if form.name.is_empty() {
            return Err(CustomerFormError::EmptyName);
        }

        form.validate()?;

        Ok(NewCustomer::new(
            form.name,
            form.phone,
            form.email.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_customer_form_builds_customer() {
        let form = AddCustomerForm {
            name: "  Acme   Corp ".to_string(),
            phone: " +1 555 0100 ".to_string(),
            email: Some("Orders@Acme.test".to_string()),
        };

        let customer = form
            .into_new_customer()
            .expect("expected conversion to succeed");

        assert_eq!(customer.name, "Acme Corp");
        assert_eq!(customer.phone, "+1 555 0100");
        assert_eq!(customer.email, "orders@acme.test");
        assert_eq!(customer.user_id, None);
    }

    #[test]
    fn add_customer_form_allows_blank_contact_details() {
        let form = AddCustomerForm {
            name: "Walk-in".to_string(),
            phone: String::new(),
            email: None,
        };

        let customer = form
            .into_new_customer()
            .expect("expected conversion to succeed");

        assert!(customer.phone.is_empty());
        assert!(customer.email.is_empty());
    }

    #[test]
    fn add_customer_form_trims_email_before_validating() {
        let form: AddCustomerForm =
            serde_html_form::from_str("name=Acme&phone=&email=+a%40b.com+").expect("form parses");
        assert_eq!(form.email.as_deref(), Some("a@b.com"));

        let customer = form
            .into_new_customer()
            .expect("expected padded email to be accepted");
        assert_eq!(customer.email, "a@b.com");

        let blank: AddCustomerForm =
            serde_html_form::from_str("name=Acme&email=+++").expect("form parses");
        assert_eq!(blank.email, None);
    }

    #[test]
    fn add_customer_form_accepts_padded_email_built_directly() {
        let form = AddCustomerForm {
            name: "Acme".to_string(),
            phone: String::new(),
            email: Some(" Orders@Acme.test ".to_string()),
        };

        let customer = form
            .into_new_customer()
            .expect("expected conversion to succeed");

        assert_eq!(customer.email, "orders@acme.test");
    }

    #[test]
    fn add_customer_form_rejects_invalid_email() {
        let form = AddCustomerForm {
            name: "Acme".to_string(),
            phone: String::new(),
            email: Some("not-an-email".to_string()),
        };

        let result = form.into_new_customer();

        assert!(matches!(result, Err(CustomerFormError::Validation(_))));
    }
}
