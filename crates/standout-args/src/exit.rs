//! Error shapes that decide what a command prints and how the process exits.
//!
//! Commands return `anyhow::Error`. Before exiting, the runner passes that
//! error to [`classify`], which recognises a handful of shapes by downcasting:
//!
//! | Shape | Message | Exit code |
//! |-------|---------|-----------|
//! | no error | empty | [`EXIT_SUCCESS`] |
//! | [`QuietExit`] | empty | its code, even 0 |
//! | [`UsageError`] | usage text, then `error: ...` | 0 for help, else [`EXIT_USAGE`] |
//! | [`CodedError`] | the wrapped message | its code |
//! | [`ErrorGroup`] | one `- ` line per member | its code or [`EXIT_FAILURE`] |
//! | anything else | the error chain | [`EXIT_FAILURE`] |
//!
//! Only [`CodedError`] carries a code among arbitrary errors. To exit with a
//! specific code from your own error type, tag it with [`with_code`].
//!
//! # Usage text binding
//!
//! A [`UsageError`] is usually raised before anyone knows the full command
//! context. The usage slot is filled afterwards, exactly once, by whoever
//! does know it (normally [`run_command`](crate::run_command)). Later writes
//! are ignored; every other part of these errors is immutable.

use std::fmt;
use std::io::Write;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::debug;

/// The command completed.
pub const EXIT_SUCCESS: i32 = 0;
/// A generic failure.
pub const EXIT_FAILURE: i32 = 1;
/// The command line was malformed (`EX_USAGE` from sysexits).
pub const EXIT_USAGE: i32 = 64;
/// An error reached the top level in a shape that carries no exit code.
pub const EXIT_INTERNAL: i32 = 255;

/// Exit with a status code and print nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("exit code {0}")]
pub struct QuietExit(pub i32);

impl QuietExit {
    pub fn code(&self) -> i32 {
        self.0
    }
}

/// An arbitrary error tagged with an explicit exit code.
///
/// Create with [`with_code`].
#[derive(Debug, Error)]
#[error("{source}")]
pub struct CodedError {
    code: i32,
    #[source]
    source: anyhow::Error,
}

impl CodedError {
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The tagged error.
    pub fn inner(&self) -> &anyhow::Error {
        &self.source
    }
}

/// Tags `err` with an exit code.
///
/// Tagging an error that is already a [`CodedError`] replaces its code
/// instead of nesting a second tag.
pub fn with_code(code: i32, err: impl Into<anyhow::Error>) -> anyhow::Error {
    let mut err = err.into();
    if let Some(coded) = err.downcast_mut::<CodedError>() {
        coded.code = code;
        return err;
    }
    CodedError { code, source: err }.into()
}

/// An error that should be shown together with the command's usage text.
#[derive(Debug)]
pub struct UsageError {
    source: Option<anyhow::Error>,
    usage: OnceCell<String>,
    help_request: bool,
}

impl UsageError {
    /// Wraps an existing error.
    pub fn new(err: impl Into<anyhow::Error>) -> Self {
        Self {
            source: Some(err.into()),
            usage: OnceCell::new(),
            help_request: false,
        }
    }

    /// Creates a usage error from a message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::new(anyhow::anyhow!("{message}"))
    }

    /// A request for full help. Classifies with exit code 0.
    pub fn help_request() -> Self {
        Self {
            source: None,
            usage: OnceCell::new(),
            help_request: true,
        }
    }

    pub fn is_help_request(&self) -> bool {
        self.help_request
    }

    /// 0 for help requests, otherwise [`EXIT_USAGE`].
    pub fn code(&self) -> i32 {
        if self.help_request {
            EXIT_SUCCESS
        } else {
            EXIT_USAGE
        }
    }

    /// The wrapped error, if any.
    pub fn inner(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    /// The attached usage text, if it has been set.
    pub fn usage(&self) -> Option<&str> {
        self.usage.get().map(String::as_str)
    }

    /// Attaches usage text. Returns false if usage was already attached.
    pub fn set_usage(&self, usage: impl Into<String>) -> bool {
        self.usage.set(usage.into()).is_ok()
    }

    /// Builder form of [`set_usage`](Self::set_usage).
    pub fn with_usage(self, usage: impl Into<String>) -> Self {
        self.set_usage(usage);
        self
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            _ if self.help_request => f.write_str("help requested"),
            Some(err) => fmt::Display::fmt(err, f),
            None => f.write_str("usage error"),
        }
    }
}

impl std::error::Error for UsageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn std::error::Error + 'static))
    }
}

/// Several independent failures reported together.
#[derive(Debug, Default)]
pub struct ErrorGroup {
    errors: Vec<anyhow::Error>,
    code: Option<i32>,
}

impl ErrorGroup {
    pub fn new(errors: impl IntoIterator<Item = anyhow::Error>) -> Self {
        Self {
            errors: errors.into_iter().collect(),
            code: None,
        }
    }

    /// Sets the exit code used when this group is classified.
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn push(&mut self, err: impl Into<anyhow::Error>) {
        self.errors.push(err.into());
    }

    pub fn errors(&self) -> &[anyhow::Error] {
        &self.errors
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ErrorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            write!(f, "- {err:#}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorGroup {}

/// What to print and which status to exit with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub message: String,
    pub code: i32,
}

impl Classified {
    fn new(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

/// Computes the display message and exit code for an error.
pub fn classify(err: &anyhow::Error) -> Classified {
    let classified = if let Some(quiet) = err.downcast_ref::<QuietExit>() {
        Classified::new("", quiet.code())
    } else if let Some(usage) = err.downcast_ref::<UsageError>() {
        let mut message = usage.usage().unwrap_or_default().trim().to_string();
        if let Some(inner) = usage.inner() {
            if !message.is_empty() {
                message.push_str("\n\n");
            }
            message.push_str(&format!("error: {inner}"));
        }
        Classified::new(message, usage.code())
    } else if let Some(coded) = err.downcast_ref::<CodedError>() {
        Classified::new(format!("{:#}", coded.inner()), coded.code())
    } else if let Some(group) = err.downcast_ref::<ErrorGroup>() {
        Classified::new(group.to_string(), group.code().unwrap_or(EXIT_FAILURE))
    } else {
        Classified::new(format!("{err:#}"), EXIT_FAILURE)
    };
    debug!(code = classified.code, "classified error");
    classified
}

/// [`classify`] for a command result; success has an empty message and code 0.
pub fn classify_result(result: &anyhow::Result<()>) -> Classified {
    match result {
        Ok(()) => Classified::new("", EXIT_SUCCESS),
        Err(err) => classify(err),
    }
}

/// The exit code carried by `err`.
///
/// Unlike [`classify`], an error that carries no code of its own maps to
/// [`EXIT_INTERNAL`] rather than [`EXIT_FAILURE`].
pub fn exit_code(err: Option<&anyhow::Error>) -> i32 {
    let Some(err) = err else {
        return EXIT_SUCCESS;
    };
    if let Some(quiet) = err.downcast_ref::<QuietExit>() {
        quiet.code()
    } else if let Some(usage) = err.downcast_ref::<UsageError>() {
        usage.code()
    } else if let Some(coded) = err.downcast_ref::<CodedError>() {
        coded.code()
    } else {
        err.downcast_ref::<ErrorGroup>()
            .and_then(ErrorGroup::code)
            .unwrap_or(EXIT_INTERNAL)
    }
}

fn find_usage_error(err: &anyhow::Error) -> Option<&UsageError> {
    err.chain().find_map(|cause| cause.downcast_ref::<UsageError>())
}

/// Returns true if `err` or any of its causes is a help request.
pub fn is_help_request(err: &anyhow::Error) -> bool {
    find_usage_error(err).map_or(false, UsageError::is_help_request)
}

/// Returns true if `err` or any of its causes is a usage error, including
/// help requests.
pub fn is_usage_error(err: &anyhow::Error) -> bool {
    find_usage_error(err).is_some()
}

/// Writes the classified message for `result` to `out` and returns the
/// exit code.
pub fn report(result: &anyhow::Result<()>, out: &mut impl Write) -> i32 {
    let Classified { message, code } = classify_result(result);
    if !message.is_empty() {
        let _ = writeln!(out, "{message}");
    }
    code
}
