//! Payment method selection for checkout.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the customer intends to pay.
///
/// Serializes to the lowercase tags the backend expects (`"transfer"` /
/// `"pickup"`). Bank transfer is the default selection and is the only
/// method that requires the last-5-digits confirmation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Bank/ATM transfer, confirmed by the last five digits of the
    /// remitting account.
    #[default]
    Transfer,
    /// Pay in person on pickup.
    Pickup,
}

impl PaymentMethod {
    /// The wire tag for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Pickup => "pickup",
        }
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a payment-method tag.
#[derive(Debug, Error)]
#[error("unknown payment method: {0}")]
pub struct PaymentMethodError(String);

impl FromStr for PaymentMethod {
    type Err = PaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transfer" => Ok(Self::Transfer),
            "pickup" => Ok(Self::Pickup),
            other => Err(PaymentMethodError(other.to_string())),
        }
    }
}
