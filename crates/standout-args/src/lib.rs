//! Declarative option and positional argument parsing for small commands.
//!
//! `standout-args` binds command-line tokens to caller-owned values, renders
//! deterministic usage text, and maps command outcomes to process exit codes.
//!
//! # Quick Start
//!
//! ```rust
//! use standout_args::{ArgSet, Arity, OptionSet};
//!
//! let mut verbose = false;
//! let mut count = 0i64;
//! let mut files: Vec<String> = Vec::new();
//! {
//!     let mut options = OptionSet::new();
//!     options
//!         .bool("v", &mut verbose, false, "Verbose output")
//!         .int("count", &mut count, 1, "How many times");
//!     let mut args = ArgSet::new();
//!     args.remaining("files", &mut files, Arity::at_least(1), "Input files");
//!
//!     standout_args::parse(&mut options, &mut args, &["-v", "-count=3", "a.txt"]).unwrap();
//! }
//! assert!(verbose);
//! assert_eq!(count, 3);
//! assert_eq!(files, ["a.txt"]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! tokens ─► OptionSet::parse ─► rest ─► ArgSet::parse
//!               │                          │
//!               └──── Value::set ◄─────────┘   (typed destinations)
//!
//! Command::run ─► anyhow::Result ─► classify ─► (message, exit code)
//! ```
//!
//! - [`Value`] is the single coercion seam: built-in kinds and custom kinds
//!   are implemented the same way
//! - [`OptionSet`] and [`ArgSet`] hold mutable borrows of their destinations,
//!   so the sets must be dropped before the destinations are read
//! - [`exit`] defines the error shapes that carry exit codes and usage text
//!
//! # Logging
//!
//! Parsing and classification emit `tracing` events at `trace` and `debug`
//! level. Nothing is printed unless the application installs a subscriber.

mod command;
mod duration;
mod error;
pub mod exit;
mod options;
mod positional;
pub mod usage;
mod value;

pub use command::{parse, run_command, usage, Command, CommandContext};
pub use duration::{format_duration, parse_duration, DURATION_SYNTAX};
pub use error::{ArgError, ValueError};
pub use exit::{
    classify, classify_result, exit_code, is_help_request, is_usage_error, report, with_code,
    Classified, CodedError, ErrorGroup, QuietExit, UsageError, EXIT_FAILURE, EXIT_INTERNAL,
    EXIT_SUCCESS, EXIT_USAGE,
};
pub use options::{OptionConfig, OptionSet};
pub use positional::{ArgKind, ArgSet, Arity};
pub use usage::{page, page_with, render, UsageConfig};
pub use value::{Hint, Value};
