//! # Validation Module
//!
//! Input validators run at the service boundary, before any store is
//! touched. A request that fails here leaves every table unchanged.
//!
//! ## Usage
//! ```rust
//! use checkout_core::validation::{validate_item_name, validate_price_cents};
//!
//! let name = validate_item_name("  Apple ").unwrap();
//! assert_eq!(name, "Apple");
//! assert!(validate_price_cents("unitPrice", -1).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_ID_LENGTH, MAX_ITEM_NAME_LENGTH, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_ITEM_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_ITEM_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

/// Validates a client-supplied cart key.
///
/// ## Rules
/// - 1 to 64 characters
/// - ASCII letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use checkout_core::validation::validate_cart_id;
///
/// assert!(validate_cart_id("lane-1").is_ok());
/// assert!(validate_cart_id("").is_err());
/// assert!(validate_cart_id("lane/1").is_err());
/// ```
pub fn validate_cart_id(key: &str) -> ValidationResult<String> {
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "cartId".to_string(),
        });
    }

    if key.len() > MAX_CART_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: "cartId".to_string(),
            max: MAX_CART_ID_LENGTH,
        });
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "cartId".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(key.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in minor units.
///
/// ## Rules
/// - Not negative (a zero price is a valid giveaway)
/// - At most `MAX_PRICE_CENTS`
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a value that must be strictly positive.
///
/// Used for offer group sizes and decrement amounts.
///
/// ## Example
/// ```rust
/// use checkout_core::validation::validate_positive;
///
/// assert!(validate_positive("quantity", 2).is_ok());
/// assert!(validate_positive("quantity", 0).is_err());
/// assert!(validate_positive("quantity", -1).is_err());
/// ```
pub fn validate_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert_eq!(validate_item_name("Apple").unwrap(), "Apple");
        assert_eq!(validate_item_name("  Kiwi\t").unwrap(), "Kiwi");
        assert!(matches!(
            validate_item_name("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_item_name(&"x".repeat(201)),
            Err(ValidationError::TooLong { max: 200, .. })
        ));
        assert!(validate_item_name(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_cart_id() {
        assert_eq!(validate_cart_id("default").unwrap(), "default");
        assert!(validate_cart_id(&"a".repeat(64)).is_ok());
        assert!(matches!(
            validate_cart_id(&"a".repeat(65)),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            validate_cart_id("lane 1"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents("unitPrice", 0).is_ok());
        assert!(validate_price_cents("unitPrice", 30).is_ok());
        assert!(validate_price_cents("unitPrice", MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents("unitPrice", -1).is_err());
        assert!(validate_price_cents("unitPrice", MAX_PRICE_CENTS + 1).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("by", 1).is_ok());
        let err = validate_positive("by", 0).unwrap_err();
        assert_eq!(err.to_string(), "by must be positive");
    }
}
