//! Positional arguments, consumed in declaration order after options.
//!
//! Three kinds of declaration exist:
//!
//! | Kind | Tokens | When absent |
//! |------|--------|-------------|
//! | required | exactly one | `missing arg` error |
//! | optional | zero or one | destination keeps its default |
//! | remaining | bounded by an [`Arity`] | error below the minimum |
//!
//! A remaining collector must be the last declaration and there can be only
//! one. Declaring a required argument after an optional one is allowed:
//! tokens are still assigned strictly by position, so the optional argument
//! only falls back to its default when the input runs out before it.
//!
//! ```rust
//! use standout_args::{ArgSet, Arity};
//!
//! let mut src = String::new();
//! let mut rest: Vec<String> = Vec::new();
//! {
//!     let mut args = ArgSet::new();
//!     args.required("src", &mut src, "Source file")
//!         .remaining("rest", &mut rest, Arity::at_least(1), "Targets");
//!     args.parse(&["a", "b", "c"]).unwrap();
//! }
//! assert_eq!(src, "a");
//! assert_eq!(rest, ["b", "c"]);
//! ```

use tracing::trace;

use crate::error::{ArgError, ValueError};
use crate::value::{Hint, Value};

/// Count bounds for a remaining collector.
///
/// `max` of `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Arity {
    min: usize,
    max: Option<usize>,
}

impl Arity {
    /// Any number of tokens, including none.
    pub const fn any() -> Self {
        Self { min: 0, max: None }
    }

    /// At least `n` tokens.
    pub const fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    /// At most `n` tokens.
    pub const fn at_most(n: usize) -> Self {
        Self { min: 0, max: Some(n) }
    }

    /// Between `min` and `max` tokens, inclusive.
    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// Adds an upper bound to this arity.
    pub const fn and_at_most(self, n: usize) -> Self {
        Self {
            min: self.min,
            max: Some(n),
        }
    }

    /// Adds a lower bound to this arity.
    pub const fn and_at_least(self, n: usize) -> Self {
        Self {
            min: n,
            max: self.max,
        }
    }

    /// The fewest tokens accepted.
    pub fn min(&self) -> usize {
        self.min
    }

    /// The most tokens accepted, or `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Returns false when the minimum exceeds the maximum.
    pub fn is_valid(&self) -> bool {
        self.max.map_or(true, |max| self.min <= max)
    }
}

/// How a positional declaration consumes tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Required,
    Optional,
    Remaining(Arity),
}

/// Type-erased sink for the tokens of a remaining collector.
trait Collector {
    fn reset(&mut self);
    fn push(&mut self, raw: &str) -> Result<(), ValueError>;
}

struct VecCollector<'a, T> {
    dest: &'a mut Vec<T>,
}

impl<T: Value + Default> Collector for VecCollector<'_, T> {
    fn reset(&mut self) {
        self.dest.clear();
    }

    fn push(&mut self, raw: &str) -> Result<(), ValueError> {
        let mut item = T::default();
        item.set(raw)?;
        self.dest.push(item);
        Ok(())
    }
}

enum Target<'a> {
    One(Box<dyn Value + 'a>),
    Many(Box<dyn Collector + 'a>),
}

pub(crate) struct ArgDecl<'a> {
    pub(crate) name: String,
    pub(crate) usage: String,
    pub(crate) kind: ArgKind,
    pub(crate) hint: Hint,
    /// Default as displayed in usage output, for optional arguments.
    pub(crate) default: Option<String>,
    /// Default in the form `set` accepts, restored when an optional argument
    /// receives no token.
    reset: Option<String>,
    target: Target<'a>,
}

/// An ordered set of positional argument declarations.
#[derive(Default)]
pub struct ArgSet<'a> {
    decls: Vec<ArgDecl<'a>>,
    config_error: Option<ArgError>,
}

impl<'a> ArgSet<'a> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an argument that must receive exactly one token.
    pub fn required<T: Value + ?Sized + 'a>(
        &mut self,
        name: &str,
        dest: &'a mut T,
        usage: &str,
    ) -> &mut Self {
        let hint = dest.hint();
        self.declare(name, usage, ArgKind::Required, hint, None, None, Target::One(Box::new(dest)))
    }

    /// Declares an argument that falls back to `default` when no token is left.
    pub fn optional<T: Value + 'a>(
        &mut self,
        name: &str,
        dest: &'a mut T,
        default: T,
        usage: &str,
    ) -> &mut Self {
        *dest = default;
        let hint = dest.hint();
        let shown = dest.display_default();
        let reset = dest.render();
        self.declare(
            name,
            usage,
            ArgKind::Optional,
            hint,
            Some(shown),
            Some(reset),
            Target::One(Box::new(dest)),
        )
    }

    /// Declares a trailing collector for all leftover tokens.
    pub fn remaining<T: Value + Default + 'a>(
        &mut self,
        name: &str,
        dest: &'a mut Vec<T>,
        arity: Arity,
        usage: &str,
    ) -> &mut Self {
        if !arity.is_valid() {
            self.fail(ArgError::config(format!(
                "arg <{name}> has minimum {} above maximum {}",
                arity.min,
                arity.max.unwrap_or_default()
            )));
        }
        let hint = T::default().hint();
        let target = Target::Many(Box::new(VecCollector { dest }));
        self.declare(name, usage, ArgKind::Remaining(arity), hint, None, None, target)
    }

    fn declare(
        &mut self,
        name: &str,
        usage: &str,
        kind: ArgKind,
        hint: Hint,
        default: Option<String>,
        reset: Option<String>,
        target: Target<'a>,
    ) -> &mut Self {
        if name.is_empty() {
            return self.fail(ArgError::config("arg name must not be empty"));
        }
        if self.decls.iter().any(|d| d.name == name) {
            return self.fail(ArgError::config(format!("arg <{name}> declared twice")));
        }
        if let Some(last) = self.decls.last() {
            if matches!(last.kind, ArgKind::Remaining(_)) {
                return self.fail(ArgError::config(format!(
                    "arg <{name}> declared after remaining arg <{}>",
                    last.name
                )));
            }
        }

        self.decls.push(ArgDecl {
            name: name.to_string(),
            usage: usage.to_string(),
            kind,
            hint,
            default,
            reset,
            target,
        });
        self
    }

    fn fail(&mut self, err: ArgError) -> &mut Self {
        if self.config_error.is_none() {
            self.config_error = Some(err);
        }
        self
    }

    /// Assigns `tokens` to the declarations in order.
    ///
    /// Optional arguments left without a token are set back to their default.
    /// Destinations written before an error is detected keep their new values.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), ArgError> {
        if let Some(err) = &self.config_error {
            return Err(err.clone());
        }

        let mut next = 0;
        for (index, decl) in self.decls.iter_mut().enumerate() {
            let position = index + 1;
            match &mut decl.target {
                Target::One(value) => {
                    let Some(token) = tokens.get(next) else {
                        if decl.kind == ArgKind::Required {
                            return Err(ArgError::MissingArgument {
                                name: decl.name.clone(),
                                position,
                            });
                        }
                        if let Some(raw) = &decl.reset {
                            value.set(raw).map_err(|source| ArgError::InvalidArgument {
                                name: decl.name.clone(),
                                source,
                            })?;
                        }
                        continue;
                    };
                    value
                        .set(token.as_ref())
                        .map_err(|source| ArgError::InvalidArgument {
                            name: decl.name.clone(),
                            source,
                        })?;
                    trace!(arg = %decl.name, position, "positional set");
                    next += 1;
                }
                Target::Many(collector) => {
                    let ArgKind::Remaining(arity) = decl.kind else {
                        continue;
                    };
                    let rest = &tokens[next..];
                    if rest.len() < arity.min {
                        return Err(ArgError::MissingArgument {
                            name: decl.name.clone(),
                            position: position + rest.len(),
                        });
                    }
                    if let Some(max) = arity.max {
                        if rest.len() > max {
                            return Err(ArgError::TooManyArguments {
                                count: rest.len() - max,
                            });
                        }
                    }
                    collector.reset();
                    for token in rest {
                        collector
                            .push(token.as_ref())
                            .map_err(|source| ArgError::InvalidArgument {
                                name: decl.name.clone(),
                                source,
                            })?;
                    }
                    trace!(arg = %decl.name, count = rest.len(), "remaining collected");
                    next = tokens.len();
                }
            }
        }

        if next < tokens.len() {
            return Err(ArgError::TooManyArguments {
                count: tokens.len() - next,
            });
        }
        Ok(())
    }

    /// Compact argument summary for a usage line, e.g. `<src> [<dst>] [<more>...]`.
    pub fn synopsis(&self) -> String {
        self.decls
            .iter()
            .map(|decl| match decl.kind {
                ArgKind::Required => format!("<{}>", decl.name),
                ArgKind::Optional => format!("[<{}>]", decl.name),
                ArgKind::Remaining(arity) if arity.min == 0 => format!("[<{}>...]", decl.name),
                ArgKind::Remaining(_) => format!("<{}>...", decl.name),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of declared arguments.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Returns true if no arguments are declared.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Declarations in declaration order.
    pub(crate) fn declarations(&self) -> impl Iterator<Item = &ArgDecl<'a>> {
        self.decls.iter()
    }

    /// Renders the usage block for these arguments.
    pub fn usage(&self) -> String {
        crate::usage::render(None, Some(self), &crate::usage::UsageConfig::default())
    }
}

impl std::fmt::Debug for ArgSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgSet")
            .field("synopsis", &self.synopsis())
            .finish()
    }
}
