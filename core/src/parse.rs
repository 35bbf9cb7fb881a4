//! Typed parsing for form inputs.
//!
//! Every parser returns a `FieldError` on malformed input; nothing is
//! silently coerced to zero or NaN.

use crate::error::FieldError;
use crate::form::FormField;

/// Title and description must contain something other than whitespace.
/// The value is kept as typed.
pub fn parse_required_text(field: FormField, input: &str) -> Result<String, FieldError> {
    if input.trim().is_empty() {
        return Err(FieldError::Missing(field));
    }
    Ok(input.to_string())
}

/// Program ids are positive integers. Surrounding whitespace is ignored.
pub fn parse_program_id(input: &str) -> Result<i64, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Missing(FormField::ProgramId));
    }
    let id: i64 = trimmed.parse().map_err(|_| FieldError::Malformed {
        field: FormField::ProgramId,
        input: input.to_string(),
    })?;
    if id <= 0 {
        return Err(FieldError::OutOfRange {
            field: FormField::ProgramId,
            input: input.to_string(),
        });
    }
    Ok(id)
}

/// A blank budget means "no budget". Otherwise it must be a finite,
/// non-negative decimal.
pub fn parse_budget(input: &str) -> Result<Option<f64>, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let amount: f64 = trimmed.parse().map_err(|_| FieldError::Malformed {
        field: FormField::Budget,
        input: input.to_string(),
    })?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(FieldError::OutOfRange {
            field: FormField::Budget,
            input: input.to_string(),
        });
    }
    Ok(Some(amount))
}
