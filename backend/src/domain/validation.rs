//! Validation helpers shared by product, dish and menu constructors.

use rust_decimal::Decimal;

use super::error::InvalidArgument;

/// Trim `value`, rejecting blank input.
pub(crate) fn non_blank(value: String, field: &'static str) -> Result<String, InvalidArgument> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InvalidArgument::blank(field));
    }
    if trimmed.len() == value.len() {
        return Ok(value);
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn ensure_positive(value: Decimal, field: &'static str) -> Result<Decimal, InvalidArgument> {
    if value <= Decimal::ZERO {
        return Err(InvalidArgument::not_positive(field));
    }
    Ok(value)
}

pub(crate) fn ensure_non_negative(
    value: Decimal,
    field: &'static str,
) -> Result<Decimal, InvalidArgument> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InvalidArgument::negative(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::Constraint;

    #[rstest]
    #[case("  Flour ", "Flour")]
    #[case("Flour", "Flour")]
    fn non_blank_trims(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(non_blank(raw.to_owned(), "name").expect("valid"), expected);
    }

    #[rstest]
    fn non_blank_rejects_whitespace() {
        assert_eq!(
            non_blank(" \n".to_owned(), "name"),
            Err(InvalidArgument::blank("name"))
        );
    }

    #[rstest]
    #[case(Decimal::ZERO, false)]
    #[case(Decimal::new(-1, 2), false)]
    #[case(Decimal::new(1, 2), true)]
    fn positivity(#[case] value: Decimal, #[case] accepted: bool) {
        assert_eq!(ensure_positive(value, "quantity").is_ok(), accepted);
    }

    #[rstest]
    fn zero_is_not_negative() {
        assert!(ensure_non_negative(-Decimal::ZERO, "price").is_ok());
        let err = ensure_non_negative(Decimal::NEGATIVE_ONE, "price").expect_err("negative");
        assert_eq!(err.constraint(), &Constraint::NotNegative);
    }
}
