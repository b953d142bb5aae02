//! Checkout form state and validation.

use farmstand_core::PaymentMethod;
use thiserror::Error;

use crate::cart::CartStore;

/// Maximum length of the transfer-confirmation digits field.
const LAST5_MAX_LEN: usize = 5;

/// Customer-supplied delivery and payment details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub payment_method: PaymentMethod,
    // Private so the digits-only rule cannot be bypassed
    last5_digits: String,
}

impl CheckoutForm {
    /// An empty form with the default payment method.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the transfer-confirmation digits.
    ///
    /// Content validity is enforced here, at input time: non-digits are
    /// stripped and the value is truncated to five characters, mirroring a
    /// masked input field. Validation later only checks non-emptiness.
    pub fn set_last5_digits(&mut self, input: &str) {
        self.last5_digits = input
            .chars()
            .filter(char::is_ascii_digit)
            .take(LAST5_MAX_LEN)
            .collect();
    }

    /// The transfer-confirmation digits (0-5 numeric characters).
    #[must_use]
    pub fn last5_digits(&self) -> &str {
        &self.last5_digits
    }

    /// Reset every field to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A checkout rejection, one variant per ordered check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("the cart is empty")]
    EmptyCart,
    #[error("please enter your name")]
    MissingName,
    #[error("please enter your phone number")]
    MissingPhone,
    #[error("please enter a delivery address")]
    MissingAddress,
    #[error("please enter the last 5 digits of the remitting account")]
    MissingLast5Digits,
}

/// Validate the form against the cart.
///
/// Checks run in a fixed order and stop at the first failure, matching the
/// single-message prompt the shopper sees. Only non-emptiness is checked;
/// the digits-only rule for the transfer field is enforced at input time by
/// [`CheckoutForm::set_last5_digits`].
///
/// # Errors
///
/// Returns the first failing check.
pub fn validate(cart: &CartStore, form: &CheckoutForm) -> Result<(), ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    if form.customer_name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if form.customer_phone.trim().is_empty() {
        return Err(ValidationError::MissingPhone);
    }
    if form.address.trim().is_empty() {
        return Err(ValidationError::MissingAddress);
    }
    if form.payment_method == PaymentMethod::Transfer && form.last5_digits.trim().is_empty() {
        return Err(ValidationError::MissingLast5Digits);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstand_core::{Price, Product, ProductId};

    fn filled_form(payment_method: PaymentMethod) -> CheckoutForm {
        let mut form = CheckoutForm {
            customer_name: "A".to_string(),
            customer_phone: "0912".to_string(),
            address: "X".to_string(),
            payment_method,
            ..CheckoutForm::default()
        };
        form.set_last5_digits("12345");
        form
    }

    fn cart_with_one_item() -> CartStore {
        let mut cart = CartStore::new();
        cart.add(Product {
            id: ProductId::new("p1"),
            name: "Rice".to_string(),
            brand: "Grains".to_string(),
            price: Price::ZERO,
            description: String::new(),
            image_url: String::new(),
        });
        cart
    }

    #[test]
    fn test_empty_cart_wins_over_field_failures() {
        // Fully filled form, empty cart: the cart check fires first
        let result = validate(&CartStore::new(), &filled_form(PaymentMethod::Pickup));
        assert_eq!(result, Err(ValidationError::EmptyCart));
    }

    #[test]
    fn test_checks_run_in_fixed_order() {
        let cart = cart_with_one_item();
        let mut form = CheckoutForm::new();

        assert_eq!(validate(&cart, &form), Err(ValidationError::MissingName));
        form.customer_name = "A".to_string();
        assert_eq!(validate(&cart, &form), Err(ValidationError::MissingPhone));
        form.customer_phone = "0912".to_string();
        assert_eq!(validate(&cart, &form), Err(ValidationError::MissingAddress));
        form.address = "X".to_string();
        assert_eq!(
            validate(&cart, &form),
            Err(ValidationError::MissingLast5Digits)
        );
        form.set_last5_digits("54321");
        assert_eq!(validate(&cart, &form), Ok(()));
    }

    #[test]
    fn test_whitespace_only_fields_fail() {
        let cart = cart_with_one_item();
        let mut form = filled_form(PaymentMethod::Pickup);
        form.customer_name = "   ".to_string();

        assert_eq!(validate(&cart, &form), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_transfer_requires_last5_digits() {
        let cart = cart_with_one_item();
        let mut form = filled_form(PaymentMethod::Transfer);
        form.set_last5_digits("");

        assert_eq!(
            validate(&cart, &form),
            Err(ValidationError::MissingLast5Digits)
        );
    }

    #[test]
    fn test_pickup_ignores_last5_digits() {
        let cart = cart_with_one_item();
        let mut form = filled_form(PaymentMethod::Pickup);
        form.set_last5_digits("");

        assert_eq!(validate(&cart, &form), Ok(()));
    }

    #[test]
    fn test_last5_digits_stripped_and_truncated_on_input() {
        let mut form = CheckoutForm::new();
        form.set_last5_digits("a1b2-3 456789");

        assert_eq!(form.last5_digits(), "12345");

        form.set_last5_digits("no digits here");
        assert_eq!(form.last5_digits(), "");
    }
}
