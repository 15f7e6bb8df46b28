use std::fmt;

#[cfg(feature = "regex")]
use crate::error::{CsvError, CsvResult};

/// A predicate over the raw text of one field.
///
/// Validators are supplied positionally, one per schema column, and only run
/// when [`ParseOptions::validate_fields`](super::options::ParseOptions) is set.
///
/// ```
/// use alpha_csv::core::validator::Validator;
///
/// let digits = Validator::new(|text| text.chars().all(|c| c.is_ascii_digit()));
///
/// assert!(digits.is_valid("2022"));
/// assert!(!digits.is_valid("20x2"));
/// assert!(Validator::any().is_valid(""));
/// ```
pub struct Validator {
    predicate: Box<dyn Fn(&str) -> bool>,
}

impl Validator {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + 'static,
    {
        Self {
            predicate: Box::new(predicate),
        }
    }

    /// Accepts every field.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    /// Accepts fields matching `pattern` anywhere; anchor it with `^...$` for whole-field matches.
    #[cfg(feature = "regex")]
    pub fn pattern(pattern: &str) -> CsvResult<Self> {
        let regex = regex::Regex::new(pattern).map_err(|error| {
            CsvError::Configuration(format!("Invalid validation pattern `{pattern}`: {error}"))
        })?;
        Ok(Self::from_regex(regex))
    }

    #[cfg(feature = "regex")]
    pub fn from_regex(regex: regex::Regex) -> Self {
        Self::new(move |text| regex.is_match(text))
    }

    pub fn is_valid(&self, text: &str) -> bool {
        (self.predicate)(text)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}
