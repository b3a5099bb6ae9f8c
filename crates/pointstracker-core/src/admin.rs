//! Admin settings validation and recipient slot editing.
//!
//! Everything here is pure. [`crate::tracker::PointsTracker`] calls these
//! before persisting, so a rejected value never reaches the store.

use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

use crate::error::ValidationError;
use crate::state::{NotificationConfig, NOTIFICATION_SLOTS};

/// Max digits kept in a recipient phone number.
pub const PHONE_MAX_DIGITS: usize = 10;
pub const MIN_PASSWORD_LEN: usize = 4;

/// Accept exactly four ASCII digits (after trimming).
pub fn validate_pin(input: &str) -> Result<String, ValidationError> {
    let pin = input.trim();
    if pin.len() == 4 && pin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(pin.to_string())
    } else {
        Err(ValidationError::InvalidPin)
    }
}

/// Accept a trimmed password of at least four characters.
pub fn validate_new_password(input: &str) -> Result<String, ValidationError> {
    let password = input.trim();
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(password.to_string())
    } else {
        Err(ValidationError::PasswordTooShort)
    }
}

/// Parse a threshold: an integer from 1 to `u32::MAX`.
pub fn parse_threshold(input: &str) -> Result<u32, ValidationError> {
    let too_large = ValidationError::ThresholdTooLarge { max: u32::MAX };
    match input.trim().parse::<i64>() {
        Ok(n) if n >= 1 => u32::try_from(n).map_err(|_| too_large),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(too_large),
        _ => Err(ValidationError::InvalidThreshold),
    }
}

/// Keep digits only, at most ten.
pub fn sanitize_phone(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_MAX_DIGITS)
        .collect()
}

/// Which half of a recipient slot is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientField {
    Phone,
    Carrier,
}

/// Edit one slot of a recipient draft in place.
///
/// Partial records are allowed here; they are dropped by
/// [`normalize_recipients`] on save.
pub fn edit_recipient(
    draft: &mut Vec<NotificationConfig>,
    index: usize,
    field: RecipientField,
    value: &str,
) -> Result<(), ValidationError> {
    if index >= NOTIFICATION_SLOTS {
        return Err(ValidationError::OutOfBounds {
            collection: "notification slots".to_string(),
            index,
            len: NOTIFICATION_SLOTS,
        });
    }
    if draft.len() <= index {
        draft.resize(index + 1, NotificationConfig::default());
    }
    let slot = &mut draft[index];
    match field {
        RecipientField::Phone => slot.phone = sanitize_phone(value),
        RecipientField::Carrier => slot.carrier = value.to_string(),
    }
    Ok(())
}

/// Trim, drop incomplete records, then cut or pad to exactly five slots.
pub fn normalize_recipients(draft: &[NotificationConfig]) -> Vec<NotificationConfig> {
    let mut saved: Vec<NotificationConfig> = draft
        .iter()
        .map(|n| NotificationConfig::new(n.phone.trim(), n.carrier.trim()))
        .filter(NotificationConfig::is_complete)
        .take(NOTIFICATION_SLOTS)
        .collect();
    saved.resize(NOTIFICATION_SLOTS, NotificationConfig::default());
    saved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_requires_four_digits() {
        assert_eq!(validate_pin(" 4321 ").unwrap(), "4321");
        assert_eq!(validate_pin("123"), Err(ValidationError::InvalidPin));
        assert_eq!(validate_pin("12345"), Err(ValidationError::InvalidPin));
        assert_eq!(validate_pin("12a4"), Err(ValidationError::InvalidPin));
        assert_eq!(validate_pin("١٢٣٤"), Err(ValidationError::InvalidPin));
    }

    #[test]
    fn password_needs_four_trimmed_chars() {
        assert_eq!(validate_new_password("  abcd ").unwrap(), "abcd");
        assert_eq!(
            validate_new_password("  abc  "),
            Err(ValidationError::PasswordTooShort)
        );
    }

    #[test]
    fn threshold_must_be_positive_integer() {
        assert_eq!(parse_threshold("25"), Ok(25));
        assert_eq!(parse_threshold(" 1 "), Ok(1));
        assert_eq!(parse_threshold("0"), Err(ValidationError::InvalidThreshold));
        assert_eq!(parse_threshold("-3"), Err(ValidationError::InvalidThreshold));
        assert_eq!(parse_threshold("ten"), Err(ValidationError::InvalidThreshold));
        assert_eq!(parse_threshold(""), Err(ValidationError::InvalidThreshold));
    }

    #[test]
    fn threshold_above_u32_reports_range() {
        let too_large = Err(ValidationError::ThresholdTooLarge { max: u32::MAX });
        assert_eq!(parse_threshold("4294967295"), Ok(u32::MAX));
        assert_eq!(parse_threshold("4294967296"), too_large);
        assert_eq!(parse_threshold("99999999999999999999"), too_large);
        assert_eq!(
            ValidationError::ThresholdTooLarge { max: u32::MAX }.to_string(),
            "Threshold must be at most 4294967295."
        );
    }

    #[test]
    fn phone_is_digits_only_and_truncated() {
        assert_eq!(sanitize_phone("(555) 123-4567"), "5551234567");
        assert_eq!(sanitize_phone("+1 555 123 4567 99"), "1555123456");
        assert_eq!(sanitize_phone("call me"), "");
    }

    #[test]
    fn edit_rejects_slot_out_of_range() {
        let mut draft = crate::state::empty_slots();
        let err = edit_recipient(&mut draft, 5, RecipientField::Phone, "555").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfBounds { index: 5, .. }));
    }

    #[test]
    fn edit_allows_partial_records_in_draft() {
        let mut draft = Vec::new();
        edit_recipient(&mut draft, 2, RecipientField::Phone, "555-123-4567").unwrap();
        assert_eq!(draft.len(), 3);
        assert_eq!(draft[2], NotificationConfig::new("5551234567", ""));
    }

    #[test]
    fn normalize_drops_partial_and_pads_to_five() {
        let draft = vec![
            NotificationConfig::new("5551234567", ""),
            NotificationConfig::new("", "Verizon"),
            NotificationConfig::new(" 5559876543 ", " mycarrier.net "),
        ];
        let saved = normalize_recipients(&draft);
        assert_eq!(saved.len(), NOTIFICATION_SLOTS);
        assert_eq!(saved[0], NotificationConfig::new("5559876543", "mycarrier.net"));
        assert!(saved[1..].iter().all(NotificationConfig::is_empty));
    }

    #[test]
    fn normalize_keeps_five_full_slots() {
        let draft: Vec<_> = (0..NOTIFICATION_SLOTS)
            .map(|i| NotificationConfig::new(format!("555000000{i}"), "Cricket"))
            .collect();
        assert_eq!(normalize_recipients(&draft), draft);
    }

    #[test]
    fn normalize_cuts_extra_complete_slots() {
        let draft: Vec<_> = (0..7)
            .map(|i| NotificationConfig::new(format!("555000000{i}"), "Verizon"))
            .collect();
        let saved = normalize_recipients(&draft);
        assert_eq!(saved.len(), NOTIFICATION_SLOTS);
        assert_eq!(saved, draft[..NOTIFICATION_SLOTS]);
    }
}
