//! Order form data and validation.
//!
//! Billing and shipping fields are validated before submission is allowed:
//! every required field non-empty, email well-formed. Field names
//! serialize in the wire casing the order service expects.

use serde::{Deserialize, Serialize};

use teekit_core::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInfo {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub phone: String,
    #[serde(rename = "phoneAlt", skip_serializing_if = "Option::is_none")]
    pub phone_alt: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
    pub country: String,
}

/// Everything the user enters on the order screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderForm {
    pub billing: BillingInfo,
    pub shipping: ShippingAddress,
    pub notes: Option<String>,
}

impl OrderForm {
    /// Checks all required fields before submission is allowed. The first
    /// offending field is reported; the UI surfaces it inline.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required: [(&'static str, &str); 9] = [
            ("firstName", &self.billing.first_name),
            ("lastName", &self.billing.last_name),
            ("phone", &self.billing.phone),
            ("email", &self.billing.email),
            ("street", &self.shipping.street),
            ("city", &self.shipping.city),
            ("state", &self.shipping.state),
            ("zipCode", &self.shipping.zip_code),
            ("country", &self.shipping.country),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField { field });
            }
        }
        if !is_valid_email(&self.billing.email) {
            return Err(ValidationError::InvalidEmail {
                value: self.billing.email.clone(),
            });
        }
        Ok(())
    }
}

/// `local@domain.tld` shape check; anything stricter belongs to the order
/// service, which validates again on its side.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.contains(char::is_whitespace)
        && email.matches('@').count() == 1
}
