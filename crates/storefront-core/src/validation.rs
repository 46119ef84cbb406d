//! # Validation Module
//!
//! Form-level checks run before a request leaves the client.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  └── Types and required flags                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Campaign form bounds and date order                               │
//! │  ├── Review rating and comment length                                  │
//! │  └── Shipping address completeness                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Authoritative; its errors come back as ClientError                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure here means no network call was made.

use crate::discount::CampaignRequest;
use crate::error::ValidationError;
use crate::order::ShippingAddress;
use crate::types::DiscountType;
use crate::MAX_REVIEW_COMMENT_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Discount Campaigns
// =============================================================================

/// Validates a campaign create/update form.
///
/// ## Rules
/// - Name must not be blank (max 200 characters)
/// - Value must be greater than 0, and at most 100 for percentages
/// - Cap, when given, must be greater than 0
/// - End date must not be before start date
/// - At least one product or variant must be in scope
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use storefront_core::discount::CampaignRequest;
/// use storefront_core::types::DiscountType;
/// use storefront_core::validation::validate_campaign;
///
/// let now = Utc::now();
/// let mut form = CampaignRequest {
///     name: "Summer".into(),
///     description: None,
///     discount_type: DiscountType::Percentage,
///     discount_value: 20.0,
///     max_discount_amount: None,
///     start_date: now,
///     end_date: now + Duration::days(7),
///     is_active: true,
///     product_ids: vec![1],
///     variant_ids: vec![],
/// };
/// assert!(validate_campaign(&form).is_ok());
///
/// form.discount_value = 120.0;
/// assert!(validate_campaign(&form).is_err());
/// ```
pub fn validate_campaign(form: &CampaignRequest) -> ValidationResult<()> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }
    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    validate_discount_value(form.discount_type, form.discount_value)?;

    if let Some(cap) = form.max_discount_amount {
        if !(cap.is_finite() && cap > 0.0) {
            return Err(ValidationError::MustBePositive {
                field: "maxDiscountAmount".to_string(),
            });
        }
    }

    if form.end_date < form.start_date {
        return Err(ValidationError::DateOrder {
            start_field: "startDate".to_string(),
            end_field: "endDate".to_string(),
        });
    }

    if form.product_ids.is_empty() && form.variant_ids.is_empty() {
        return Err(ValidationError::EmptySelection {
            what: "product or variant".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount value for its type.
pub fn validate_discount_value(discount_type: DiscountType, value: f64) -> ValidationResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ValidationError::MustBePositive {
            field: "discountValue".to_string(),
        });
    }
    if discount_type == DiscountType::Percentage && value > 100.0 {
        return Err(ValidationError::OutOfRange {
            field: "discountValue".to_string(),
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(())
}

// =============================================================================
// Reviews
// =============================================================================

/// Validates a star rating (1 to 5).
pub fn validate_rating(rating: u8) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1.0,
            max: 5.0,
        });
    }
    Ok(())
}

/// Validates and normalizes a review comment.
///
/// Blank comments become `None`.
pub fn validate_review_comment(comment: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if comment.chars().count() > MAX_REVIEW_COMMENT_LEN {
        return Err(ValidationError::TooLong {
            field: "comment".to_string(),
            max: MAX_REVIEW_COMMENT_LEN,
        });
    }
    Ok(Some(comment.to_string()))
}

// =============================================================================
// Checkout
// =============================================================================

/// Validates a shipping address.
///
/// ## Rules
/// - Full name, phone and address line are required
/// - Phone: 8 to 15 digits, optional leading `+`, spaces and dashes ignored
pub fn validate_shipping_address(address: &ShippingAddress) -> ValidationResult<()> {
    if address.full_name.trim().is_empty() {
        return Err(ValidationError::required("fullName"));
    }
    if address.address_line.trim().is_empty() {
        return Err(ValidationError::required("addressLine"));
    }
    validate_phone(&address.phone)
}

/// Validates a phone number.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::required("phone"));
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let digits: String = digits.chars().filter(|c| *c != ' ' && *c != '-').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) || !(8..=15).contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain 8 to 15 digits".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Search
// =============================================================================

/// Validates a search query; returns it trimmed.
///
/// Empty is allowed (lists everything). Maximum 100 characters.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }
    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
