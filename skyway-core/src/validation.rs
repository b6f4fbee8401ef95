use std::fmt;

use serde::Serialize;

use crate::{CoreError, CoreResult};

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// Every constraint a request failed, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self(vec![Violation {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|v| format!("\"{}\" {}", v.field, v.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Values the `required` rule knows how to check for presence.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        self.as_str().is_present()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

macro_rules! always_present {
    ($($ty:ty),*) => {
        $(impl Presence for $ty {
            fn is_present(&self) -> bool {
                true
            }
        })*
    };
}

always_present!(i32, i64, u32, u64, f64, bool, chrono::DateTime<chrono::Utc>);

/// Collects constraint violations for a request.
///
/// ```
/// use skyway_core::Validator;
///
/// let page = 0;
/// let order = "SIDEWAYS";
/// let errors = Validator::new()
///     .min("page", page, 1)
///     .one_of("order", order, &["ASC", "DESC"])
///     .finish()
///     .unwrap_err();
/// assert_eq!(errors.fields(), vec!["page", "order"]);
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(Violation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn required<T: Presence + ?Sized>(mut self, field: &str, value: &T) -> Self {
        if !value.is_present() {
            self.push(field, "is required");
        }
        self
    }

    /// Lower bound; an absent optional value is left to `required`.
    pub fn min<T, V>(mut self, field: &str, value: V, min: T) -> Self
    where
        T: PartialOrd + fmt::Display + Copy,
        V: Into<Option<T>>,
    {
        if let Some(value) = value.into() {
            if value < min {
                self.push(field, format!("must be greater than or equal to {min}"));
            }
        }
        self
    }

    pub fn range<T, V>(mut self, field: &str, value: V, min: T, max: T) -> Self
    where
        T: PartialOrd + fmt::Display + Copy,
        V: Into<Option<T>>,
    {
        if let Some(value) = value.into() {
            if value < min || value > max {
                self.push(field, format!("must be between {min} and {max}"));
            }
        }
        self
    }

    pub fn one_of<'a, V>(mut self, field: &str, value: V, allowed: &[&str]) -> Self
    where
        V: Into<Option<&'a str>>,
    {
        if let Some(value) = value.into() {
            if !allowed.contains(&value) {
                self.push(field, format!("must be one of [{}]", allowed.join(", ")));
            }
        }
        self
    }

    pub fn email<'a, V>(mut self, field: &str, value: V) -> Self
    where
        V: Into<Option<&'a str>>,
    {
        if let Some(value) = value.into() {
            if !looks_like_email(value) {
                self.push(field, "must be a valid email");
            }
        }
        self
    }

    /// Arbitrary predicate, typically for rules spanning several fields.
    pub fn check(mut self, field: &str, ok: bool, message: &str) -> Self {
        if !ok {
            self.push(field, message);
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.violations))
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !value.chars().any(char::is_whitespace)
}

/// Unwrap a field the gate has already checked with `required`.
pub fn take<T>(field: &str, value: Option<T>) -> CoreResult<T> {
    value.ok_or_else(|| CoreError::invalid(field, "is required"))
}
