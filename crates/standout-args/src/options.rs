//! Named options: declaration and parsing of `-name[=value]` tokens.
//!
//! An [`OptionSet`] binds option names to caller-owned destinations. All
//! declarations must happen before the first call to [`OptionSet::parse`];
//! the set is not meant to be shared across threads while parsing.
//!
//! ```rust
//! use standout_args::OptionSet;
//!
//! let mut verbose = false;
//! let mut name = String::new();
//! let rest = {
//!     let mut options = OptionSet::new();
//!     options
//!         .bool("v", &mut verbose, false, "Verbose output")
//!         .string("name", &mut name, "world", "Who to greet");
//!     let tokens = ["-v", "-name=alice", "extra"];
//!     options.parse(&tokens).unwrap().to_vec()
//! };
//! assert!(verbose);
//! assert_eq!(name, "alice");
//! assert_eq!(rest, ["extra"]);
//! ```
//!
//! # Syntax
//!
//! - `-name` for flag kinds (booleans), which set `true`
//! - `-name=value` or `-name value` for every other kind
//! - `--` ends option parsing and is consumed
//! - the first token that does not start with a dash ends option parsing and
//!   is left for positional arguments
//! - with [`OptionConfig::double_dash`] enabled, names longer than one
//!   character may also be written `--name`

use std::collections::BTreeMap;

use chrono::Duration;
use tracing::trace;

use crate::error::ArgError;
use crate::value::Value;

/// Per-set parsing configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionConfig {
    /// Accept `--name` for options whose name is longer than one character.
    pub double_dash: bool,
}

impl OptionConfig {
    /// Creates the default configuration (single dash only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the `--name` alias for multi-character names.
    pub fn double_dash(mut self, enabled: bool) -> Self {
        self.double_dash = enabled;
        self
    }
}

pub(crate) struct OptionDecl<'a> {
    pub(crate) name: String,
    pub(crate) usage: String,
    /// Default as displayed in usage output, captured at declaration time.
    pub(crate) default: String,
    pub(crate) show_default: bool,
    pub(crate) value: Box<dyn Value + 'a>,
    seen: bool,
}

/// A set of named options bound to destinations that live for `'a`.
pub struct OptionSet<'a> {
    config: OptionConfig,
    decls: Vec<OptionDecl<'a>>,
    index: BTreeMap<String, usize>,
    config_error: Option<ArgError>,
}

impl Default for OptionSet<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> OptionSet<'a> {
    /// Creates an empty set with the default configuration.
    pub fn new() -> Self {
        Self::with_config(OptionConfig::default())
    }

    /// Creates an empty set with the given configuration.
    pub fn with_config(config: OptionConfig) -> Self {
        Self {
            config,
            decls: Vec::new(),
            index: BTreeMap::new(),
            config_error: None,
        }
    }

    /// The configuration this set was built with.
    pub fn config(&self) -> OptionConfig {
        self.config
    }

    /// Declares a boolean flag.
    pub fn bool(
        &mut self,
        name: &str,
        dest: &'a mut bool,
        default: bool,
        usage: &str,
    ) -> &mut Self {
        self.option(name, dest, default, usage)
    }

    /// Declares an integer option.
    pub fn int(
        &mut self,
        name: &str,
        dest: &'a mut i64,
        default: i64,
        usage: &str,
    ) -> &mut Self {
        self.option(name, dest, default, usage)
    }

    /// Declares a string option.
    pub fn string(
        &mut self,
        name: &str,
        dest: &'a mut String,
        default: impl Into<String>,
        usage: &str,
    ) -> &mut Self {
        self.option(name, dest, default.into(), usage)
    }

    /// Declares a duration option (`1h2s`, `-3.4ms`).
    pub fn duration(
        &mut self,
        name: &str,
        dest: &'a mut Duration,
        default: Duration,
        usage: &str,
    ) -> &mut Self {
        self.option(name, dest, default, usage)
    }

    /// Declares an option of any kind, writing `default` into `dest` first.
    pub fn option<T: Value + 'a>(
        &mut self,
        name: &str,
        dest: &'a mut T,
        default: T,
        usage: &str,
    ) -> &mut Self {
        *dest = default;
        self.value(name, dest, usage)
    }

    /// Declares an option bound to a custom value kind.
    ///
    /// The destination's current value is treated as the default.
    pub fn value<T: Value + ?Sized + 'a>(
        &mut self,
        name: &str,
        dest: &'a mut T,
        usage: &str,
    ) -> &mut Self {
        if let Err(err) = self.check_name(name) {
            if self.config_error.is_none() {
                self.config_error = Some(err);
            }
            return self;
        }

        self.index.insert(name.to_string(), self.decls.len());
        self.decls.push(OptionDecl {
            name: name.to_string(),
            usage: usage.to_string(),
            default: dest.display_default(),
            show_default: !dest.is_zero(),
            value: Box::new(dest),
            seen: false,
        });
        self
    }

    fn check_name(&self, name: &str) -> Result<(), ArgError> {
        if name.is_empty() {
            return Err(ArgError::config("option name must not be empty"));
        }
        if name.starts_with('-') {
            return Err(ArgError::config(format!(
                "option name {name:?} must not begin with a dash"
            )));
        }
        if name.contains('=') || name.chars().any(char::is_whitespace) {
            return Err(ArgError::config(format!(
                "option name {name:?} must not contain '=' or whitespace"
            )));
        }
        if self.index.contains_key(name) {
            return Err(ArgError::config(format!("option -{name} declared twice")));
        }
        Ok(())
    }

    /// Consumes leading option tokens and returns the unconsumed remainder.
    ///
    /// Later occurrences of a repeated option overwrite earlier ones. A `--`
    /// following an option that needs a value is never taken as that value.
    pub fn parse<'t, S: AsRef<str>>(&mut self, tokens: &'t [S]) -> Result<&'t [S], ArgError> {
        if let Some(err) = &self.config_error {
            return Err(err.clone());
        }
        for decl in &mut self.decls {
            decl.seen = false;
        }

        let mut next = 0;
        while let Some(token) = tokens.get(next).map(|t| t.as_ref()) {
            if token.len() < 2 || !token.starts_with('-') {
                break;
            }
            next += 1;
            if token == "--" {
                trace!("option terminator");
                break;
            }

            let (double, body) = match token.strip_prefix("--") {
                Some(body) => (true, body),
                None => (false, &token[1..]),
            };
            if body.is_empty() || body.starts_with(['-', '=']) {
                return Err(ArgError::BadSyntax(token.to_string()));
            }
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };
            if double && (!self.config.double_dash || name.chars().count() == 1) {
                return Err(ArgError::BadSyntax(token.to_string()));
            }

            let Some(&slot) = self.index.get(name) else {
                if name == "h" || name == "help" {
                    return Err(ArgError::HelpRequested);
                }
                return Err(ArgError::UnknownOption(name.to_string()));
            };
            let decl = &mut self.decls[slot];

            let raw = match inline {
                Some(value) => value,
                None if decl.value.is_flag() => "true",
                None => {
                    let value = tokens
                        .get(next)
                        .map(|t| t.as_ref())
                        .filter(|&value| value != "--")
                        .ok_or_else(|| ArgError::MissingValue(name.to_string()))?;
                    next += 1;
                    value
                }
            };

            decl.value
                .set(raw)
                .map_err(|source| ArgError::InvalidOption {
                    name: name.to_string(),
                    source,
                })?;
            decl.seen = true;
            trace!(option = name, value = raw, "option set");
        }

        Ok(&tokens[next..])
    }

    /// Returns true if the named option appeared during the last parse.
    pub fn is_set(&self, name: &str) -> bool {
        self.index
            .get(name)
            .map_or(false, |&slot| self.decls[slot].seen)
    }

    /// The current value of the named option, rendered.
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.index
            .get(name)
            .map(|&slot| self.decls[slot].value.render())
    }

    /// Declared option names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Number of declared options.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Returns true if no options are declared.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Declarations sorted by name.
    pub(crate) fn sorted(&self) -> impl Iterator<Item = &OptionDecl<'a>> {
        self.index.values().map(|&slot| &self.decls[slot])
    }

    /// Renders the usage block for these options.
    pub fn usage(&self) -> String {
        crate::usage::render(Some(self), None, &crate::usage::UsageConfig::default())
    }
}

impl std::fmt::Debug for OptionSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionSet")
            .field("config", &self.config)
            .field("names", &self.index.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_without_value_sets_true() {
        let mut pants = false;
        let mut options = OptionSet::new();
        options.bool("pants", &mut pants, false, "");
        let rest = options.parse(&["-pants"]).unwrap();
        assert!(rest.is_empty());
        assert!(options.is_set("pants"));
        drop(options);
        assert!(pants);
    }

    #[test]
    fn flag_accepts_explicit_value() {
        let mut pants = true;
        let mut options = OptionSet::new();
        options.bool("pants", &mut pants, true, "");
        options.parse(&["-pants=false"]).unwrap();
        drop(options);
        assert!(!pants);
    }

    #[test]
    fn value_from_following_token() {
        let mut n = 0;
        let mut options = OptionSet::new();
        options.int("n", &mut n, 0, "");
        let rest = options.parse(&["-n", "-5", "tail"]).unwrap();
        assert_eq!(rest, ["tail"]);
        drop(options);
        assert_eq!(n, -5);
    }

    #[test]
    fn repeated_option_overwrites() {
        let mut s = String::new();
        let mut options = OptionSet::new();
        options.string("s", &mut s, "", "");
        options.parse(&["-s=a", "-s", "b"]).unwrap();
        drop(options);
        assert_eq!(s, "b");
    }

    #[test]
    fn terminator_is_consumed() {
        let mut v = false;
        let mut options = OptionSet::new();
        options.bool("v", &mut v, false, "");
        let rest = options.parse(&["--", "-v"]).unwrap();
        assert_eq!(rest, ["-v"]);
        assert!(!options.is_set("v"));
    }

    #[test]
    fn terminator_is_never_taken_as_a_value() {
        let mut s = String::new();
        let mut options = OptionSet::new();
        options.string("s", &mut s, "", "");
        let rest = options.parse(&["-s=x", "--", "-s", "y"]).unwrap();
        assert_eq!(rest, ["-s", "y"]);
    }

    #[test]
    fn terminator_after_valued_option_is_a_missing_value() {
        let mut s = String::new();
        let mut options = OptionSet::new();
        options.string("s", &mut s, "", "");
        assert_eq!(
            options.parse(&["-s", "--", "x"]).unwrap_err(),
            ArgError::MissingValue("s".into())
        );
        drop(options);
        assert_eq!(s, "");
    }

    #[test]
    fn is_set_reflects_only_the_last_parse() {
        let mut v = false;
        let mut options = OptionSet::new();
        options.bool("v", &mut v, false, "");
        options.parse(&["-v"]).unwrap();
        assert!(options.is_set("v"));
        options.parse::<&str>(&[]).unwrap();
        assert!(!options.is_set("v"));
    }

    #[test]
    fn first_non_option_stops_parsing() {
        let mut v = false;
        let mut options = OptionSet::new();
        options.bool("v", &mut v, false, "");
        let rest = options.parse(&["file", "-v"]).unwrap();
        assert_eq!(rest, ["file", "-v"]);
        let rest = options.parse(&["-", "-v"]).unwrap();
        assert_eq!(rest, ["-", "-v"]);
    }

    #[test]
    fn unknown_option_names_the_option() {
        let mut options = OptionSet::new();
        let err = options.parse(&["-zzz"]).unwrap_err();
        assert_eq!(err, ArgError::UnknownOption("zzz".into()));
        assert!(err.to_string().contains("zzz"));
    }

    #[test]
    fn missing_value_at_end() {
        let mut n = 0;
        let mut options = OptionSet::new();
        options.int("n", &mut n, 0, "");
        assert_eq!(
            options.parse(&["-n"]).unwrap_err(),
            ArgError::MissingValue("n".into())
        );
    }

    #[test]
    fn invalid_value_is_prefixed_with_name() {
        let mut n = 3;
        let mut options = OptionSet::new();
        options.int("iv", &mut n, 3, "");
        let err = options.parse(&["-iv=quack"]).unwrap_err();
        match &err {
            ArgError::InvalidOption { name, source } => {
                assert_eq!(name, "iv");
                assert_eq!(source.value, "quack");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        drop(options);
        assert_eq!(n, 3);
    }

    #[test]
    fn help_is_requested_when_undeclared() {
        let mut options = OptionSet::new();
        assert_eq!(
            options.parse(&["-help"]).unwrap_err(),
            ArgError::HelpRequested
        );
        assert_eq!(options.parse(&["-h"]).unwrap_err(), ArgError::HelpRequested);
    }

    #[test]
    fn declared_help_is_an_ordinary_flag() {
        let mut help = false;
        let mut options = OptionSet::new();
        options.bool("help", &mut help, false, "");
        options.parse(&["-help"]).unwrap();
        drop(options);
        assert!(help);
    }

    #[test]
    fn double_dash_rejected_unless_enabled() {
        let mut verbose = false;
        let mut options = OptionSet::new();
        options.bool("verbose", &mut verbose, false, "");
        assert_eq!(
            options.parse(&["--verbose"]).unwrap_err(),
            ArgError::BadSyntax("--verbose".into())
        );
    }

    #[test]
    fn double_dash_reaches_long_names_only() {
        let mut a = false;
        let mut a2 = false;
        let mut options = OptionSet::with_config(OptionConfig::new().double_dash(true));
        options
            .bool("a", &mut a, false, "")
            .bool("a2", &mut a2, false, "");
        options.parse(&["-a2", "--a2=true", "-a"]).unwrap();
        assert!(matches!(
            options.parse(&["--a"]).unwrap_err(),
            ArgError::BadSyntax(_)
        ));
        drop(options);
        assert!(a);
        assert!(a2);
    }

    #[test]
    fn malformed_tokens_are_bad_syntax() {
        let mut options = OptionSet::with_config(OptionConfig::new().double_dash(true));
        for token in ["---x", "-=x", "--=x"] {
            assert_eq!(
                options.parse(&[token]).unwrap_err(),
                ArgError::BadSyntax(token.into())
            );
        }
    }

    #[test]
    fn bad_names_surface_at_parse_time() {
        let mut a = false;
        let mut b = false;
        let mut options = OptionSet::new();
        options.bool("a", &mut a, false, "").bool("a", &mut b, false, "");
        assert!(matches!(
            options.parse::<&str>(&[]).unwrap_err(),
            ArgError::Config(_)
        ));

        let mut c = false;
        let mut options = OptionSet::new();
        options.bool("-c", &mut c, false, "");
        assert!(matches!(
            options.parse::<&str>(&[]).unwrap_err(),
            ArgError::Config(_)
        ));

        let mut d = false;
        let mut options = OptionSet::new();
        options.bool("", &mut d, false, "");
        assert!(matches!(
            options.parse::<&str>(&[]).unwrap_err(),
            ArgError::Config(_)
        ));
    }

    #[test]
    fn names_are_sorted() {
        let (mut z, mut a, mut m) = (false, false, false);
        let mut options = OptionSet::new();
        options
            .bool("z", &mut z, false, "")
            .bool("a", &mut a, false, "")
            .bool("m", &mut m, false, "");
        assert_eq!(options.names().collect::<Vec<_>>(), ["a", "m", "z"]);
        assert_eq!(options.lookup("a").as_deref(), Some("false"));
        assert_eq!(options.len(), 3);
    }
}
