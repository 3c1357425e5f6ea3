//! Value coercion: turning a single token into a typed value and back.
//!
//! Every bound destination, built-in or custom, goes through the [`Value`]
//! trait. The option and positional sets never special-case a type: booleans,
//! integers, strings and durations are ordinary implementations registered
//! against the same trait as user types.
//!
//! # Custom kinds
//!
//! ```rust
//! use standout_args::{Hint, Value, ValueError};
//!
//! #[derive(Default)]
//! struct Level(u8);
//!
//! impl Value for Level {
//!     fn set(&mut self, raw: &str) -> Result<(), ValueError> {
//!         self.0 = match raw {
//!             "low" => 0,
//!             "high" => 1,
//!             _ => return Err(ValueError::new(raw, "low or high")),
//!         };
//!         Ok(())
//!     }
//!
//!     fn render(&self) -> String {
//!         if self.0 == 0 { "low".into() } else { "high".into() }
//!     }
//!
//!     fn hint(&self) -> Hint {
//!         Hint::kind("level").with_text("low|high")
//!     }
//! }
//! ```

use chrono::Duration;

use crate::duration::{format_duration, parse_duration, DURATION_SYNTAX};
use crate::error::ValueError;

/// Optional usage annotations for a value kind.
///
/// `kind` is a short type tag (`int`, `duration`) and `text` is free-form
/// hint text. Each is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hint {
    pub kind: Option<String>,
    pub text: Option<String>,
}

impl Hint {
    /// A hint with neither tag nor text.
    pub fn none() -> Self {
        Self::default()
    }

    /// A hint carrying only a type tag.
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            text: None,
        }
    }

    /// A hint carrying only free-form text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: None,
            text: Some(text.into()),
        }
    }

    /// Adds free-form text to this hint.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns true if neither tag nor text is present.
    pub fn is_empty(&self) -> bool {
        self.kind.as_deref().map_or(true, str::is_empty)
            && self.text.as_deref().map_or(true, str::is_empty)
    }
}

/// A typed destination that can be written from a string token.
pub trait Value {
    /// Parses `raw` and stores the result.
    ///
    /// On error the destination must be left unchanged.
    fn set(&mut self, raw: &str) -> Result<(), ValueError>;

    /// Renders the current value in a form [`set`](Self::set) accepts.
    fn render(&self) -> String;

    /// Usage annotations. Defaults to none.
    fn hint(&self) -> Hint {
        Hint::none()
    }

    /// Flag kinds may appear as a bare option with no `=value`.
    fn is_flag(&self) -> bool {
        false
    }

    /// Whether the current value is the kind's zero value.
    ///
    /// Options only annotate their default in usage output when it is not
    /// zero. Custom kinds are considered zero when they render empty.
    fn is_zero(&self) -> bool {
        self.render().is_empty()
    }

    /// The current value as shown in a `(default: ...)` annotation.
    fn display_default(&self) -> String {
        self.render()
    }
}

impl<T: Value + ?Sized> Value for &mut T {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        (**self).set(raw)
    }

    fn render(&self) -> String {
        (**self).render()
    }

    fn hint(&self) -> Hint {
        (**self).hint()
    }

    fn is_flag(&self) -> bool {
        (**self).is_flag()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn display_default(&self) -> String {
        (**self).display_default()
    }
}

impl Value for bool {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        *self = match raw {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => true,
            "0" | "f" | "F" | "false" | "FALSE" | "False" => false,
            _ => return Err(ValueError::new(raw, "true or false")),
        };
        Ok(())
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn hint(&self) -> Hint {
        Hint::kind("bool")
    }

    fn is_flag(&self) -> bool {
        true
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Value for String {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        raw.clone_into(self);
        Ok(())
    }

    fn render(&self) -> String {
        self.clone()
    }

    fn hint(&self) -> Hint {
        Hint::kind("string")
    }

    fn display_default(&self) -> String {
        format!("{self:?}")
    }
}

/// Splits an optional sign and a `0x`/`0o`/`0b` radix prefix off an integer.
fn split_radix(raw: &str) -> (bool, u32, &str) {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let lower = digits.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ => (10, digits),
    };
    (negative, radix, digits)
}

/// Parses an integer with optional sign and radix prefix through `i128`.
fn parse_integer(raw: &str) -> Option<i128> {
    let (negative, radix, digits) = split_radix(raw);
    // from_str_radix would otherwise accept a second sign after the prefix.
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

macro_rules! integer_value {
    ($($ty:ty => $kind:literal),* $(,)?) => {$(
        impl Value for $ty {
            fn set(&mut self, raw: &str) -> Result<(), ValueError> {
                *self = parse_integer(raw)
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| ValueError::new(
                        raw,
                        concat!("an integer in range for ", stringify!($ty)),
                    ))?;
                Ok(())
            }

            fn render(&self) -> String {
                self.to_string()
            }

            fn hint(&self) -> Hint {
                Hint::kind($kind)
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }
        }
    )*};
}

integer_value! {
    i64 => "int",
    i32 => "int",
    u64 => "uint",
    u32 => "uint",
    usize => "uint",
}

impl Value for f64 {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        *self = raw
            .parse()
            .map_err(|_| ValueError::new(raw, "a floating point number"))?;
        Ok(())
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn hint(&self) -> Hint {
        Hint::kind("float")
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Value for Duration {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        *self = parse_duration(raw)?;
        Ok(())
    }

    fn render(&self) -> String {
        format_duration(self)
    }

    fn hint(&self) -> Hint {
        Hint::kind("duration").with_text(format!("({DURATION_SYNTAX})"))
    }

    fn is_zero(&self) -> bool {
        *self == Duration::zero()
    }
}
