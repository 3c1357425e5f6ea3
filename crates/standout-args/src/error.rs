//! Error types raised while parsing options and positional arguments.

use thiserror::Error;

/// A single token could not be coerced into the target value kind.
///
/// Carries the offending token and a description of the accepted syntax, so
/// the message can tell the user what would have worked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?}, expected {expected}")]
pub struct ValueError {
    /// The token that failed to parse.
    pub value: String,
    /// Description of the accepted syntax (e.g. "an integer").
    pub expected: String,
}

impl ValueError {
    /// Create a value error for `value`, naming the `expected` syntax.
    pub fn new(value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// Errors produced by [`OptionSet::parse`](crate::OptionSet::parse) and
/// [`ArgSet::parse`](crate::ArgSet::parse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    /// An option token named an option that was never declared.
    #[error("option provided but not defined: -{0}")]
    UnknownOption(String),

    /// A token looked like an option but was malformed.
    #[error("bad option syntax: {0}")]
    BadSyntax(String),

    /// A non-boolean option appeared as the last token with no value.
    #[error("option needs an argument: -{0}")]
    MissingValue(String),

    /// An option value failed to coerce.
    #[error("invalid value for option -{name}: {source}")]
    InvalidOption {
        name: String,
        #[source]
        source: ValueError,
    },

    /// A positional value failed to coerce.
    #[error("invalid value for arg <{name}>: {source}")]
    InvalidArgument {
        name: String,
        #[source]
        source: ValueError,
    },

    /// A required positional (or the minimum of a remaining collector)
    /// received no token.
    #[error("missing arg <{name}> at position {position}")]
    MissingArgument { name: String, position: usize },

    /// Tokens were left over after every positional was satisfied.
    #[error("found {count} additional {}", arg_noun(.count))]
    TooManyArguments { count: usize },

    /// `-h` or `-help` was given and no option claims that name.
    #[error("help requested")]
    HelpRequested,

    /// The declarations themselves are inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ArgError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true for [`ArgError::HelpRequested`].
    pub fn is_help_request(&self) -> bool {
        matches!(self, ArgError::HelpRequested)
    }
}

fn arg_noun(count: &usize) -> &'static str {
    if *count == 1 {
        "arg"
    } else {
        "args"
    }
}
