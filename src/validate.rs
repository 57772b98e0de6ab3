//! Local validation of request models
//!
//! Every request model checks its documented required parameters before
//! it is serialized. A failed check never reaches the network.

use crate::error::{Error, Result};
use crate::types::Id;

/// Largest page the API returns for list endpoints
pub const MAX_PAGE_SIZE: u32 = 50;

/// Implemented by every request model
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Field checks bound to one model name, so errors read `Model.field`
#[derive(Debug, Clone, Copy)]
pub struct Rules {
    model: &'static str,
}

impl Rules {
    pub const fn new(model: &'static str) -> Self {
        Self { model }
    }

    fn fail(&self, field: &str, message: &str) -> Error {
        Error::validation(self.model, field, message)
    }

    /// Required identifier: must be non-zero
    pub fn id(&self, field: &str, value: Id) -> Result<&Self> {
        if value == 0 {
            return Err(self.fail(field, "is required"));
        }
        Ok(self)
    }

    /// Optional identifier: zero is rejected when present
    pub fn opt_id(&self, field: &str, value: Option<Id>) -> Result<&Self> {
        match value {
            Some(v) => self.id(field, v),
            None => Ok(self),
        }
    }

    /// Required text: must not be blank
    pub fn text(&self, field: &str, value: &str) -> Result<&Self> {
        if value.trim().is_empty() {
            return Err(self.fail(field, "must not be empty"));
        }
        Ok(self)
    }

    /// Optional text: blank is rejected when present
    pub fn opt_text(&self, field: &str, value: Option<&str>) -> Result<&Self> {
        match value {
            Some(v) => self.text(field, v),
            None => Ok(self),
        }
    }

    /// Amount that must be finite and `>= 0`
    pub fn non_negative(&self, field: &str, value: f64) -> Result<&Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(self.fail(field, "must be a non-negative number"));
        }
        Ok(self)
    }

    pub fn opt_non_negative(&self, field: &str, value: Option<f64>) -> Result<&Self> {
        match value {
            Some(v) => self.non_negative(field, v),
            None => Ok(self),
        }
    }

    /// Percentage in `0..=100`
    pub fn percent(&self, field: &str, value: Option<f64>) -> Result<&Self> {
        match value {
            Some(v) if !(0.0..=100.0).contains(&v) => {
                Err(self.fail(field, "must be between 0 and 100"))
            }
            _ => Ok(self),
        }
    }

    /// Page size in `1..=MAX_PAGE_SIZE`
    pub fn qty(&self, value: Option<u32>) -> Result<&Self> {
        match value {
            Some(0) => Err(self.fail("qty", "must be at least 1")),
            Some(v) if v > MAX_PAGE_SIZE => Err(self.fail(
                "qty",
                &format!("must not exceed {MAX_PAGE_SIZE}"),
            )),
            _ => Ok(self),
        }
    }

    /// Value restricted to a documented set
    pub fn one_of<T: PartialEq + std::fmt::Debug>(
        &self,
        field: &str,
        value: &T,
        allowed: &[T],
    ) -> Result<&Self> {
        if !allowed.contains(value) {
            return Err(self.fail(field, &format!("must be one of {allowed:?}")));
        }
        Ok(self)
    }

    /// At least one element
    pub fn non_empty<T>(&self, field: &str, items: &[T]) -> Result<&Self> {
        if items.is_empty() {
            return Err(self.fail(field, "must contain at least one entry"));
        }
        Ok(self)
    }

    /// Validate nested records, reporting `field[i].inner`
    pub fn each<T: Validate>(&self, field: &str, items: &[T]) -> Result<&Self> {
        for (i, item) in items.iter().enumerate() {
            item.validate().map_err(|e| match e {
                Error::Validation {
                    field: inner,
                    message,
                    ..
                } => Error::validation(self.model, format!("{field}[{i}].{inner}"), message),
                other => other,
            })?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    struct Line {
        id: Id,
    }

    impl Validate for Line {
        fn validate(&self) -> Result<()> {
            Rules::new("Line").id("line_id", self.id)?;
            Ok(())
        }
    }

    fn field_of(err: Error) -> String {
        match err {
            Error::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_chained_rules() {
        let rules = Rules::new("Model");
        assert!(rules
            .id("company_id", 1)
            .and_then(|r| r.text("name", "x"))
            .and_then(|r| r.non_negative("price", 0.0))
            .is_ok());
    }

    #[test]
    fn test_id_rejects_zero() {
        let err = Rules::new("Model").id("company_id", 0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Model.company_id: is required");
    }

    #[test]
    fn test_text_rejects_blank() {
        assert_eq!(
            field_of(Rules::new("M").text("name", "   ").unwrap_err()),
            "name"
        );
        assert!(Rules::new("M").opt_text("notes", None).is_ok());
    }

    #[test_case(Some(0), false ; "zero")]
    #[test_case(Some(1), true ; "one")]
    #[test_case(Some(50), true ; "max")]
    #[test_case(Some(51), false ; "over max")]
    #[test_case(None, true ; "unset")]
    fn test_qty(qty: Option<u32>, ok: bool) {
        assert_eq!(Rules::new("M").qty(qty).is_ok(), ok);
    }

    #[test_case(-1.0, false ; "negative")]
    #[test_case(f64::NAN, false ; "nan")]
    #[test_case(0.0, true ; "zero")]
    #[test_case(12.5, true ; "positive")]
    fn test_non_negative(value: f64, ok: bool) {
        assert_eq!(Rules::new("M").non_negative("price", value).is_ok(), ok);
    }

    #[test]
    fn test_percent() {
        assert!(Rules::new("M").percent("discount", Some(100.0)).is_ok());
        assert!(Rules::new("M").percent("discount", Some(100.5)).is_err());
        assert!(Rules::new("M").percent("discount", None).is_ok());
    }

    #[test]
    fn test_one_of() {
        assert!(Rules::new("M").one_of("type", &2u8, &[1, 2, 3]).is_ok());
        assert!(Rules::new("M").one_of("type", &9u8, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_each_reports_nested_path() {
        let lines = vec![Line { id: 3 }, Line { id: 0 }];
        let err = Rules::new("Invoice").each("products", &lines).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Invoice.products[1].line_id: is required"
        );
    }
}
