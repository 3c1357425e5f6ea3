//! Running a single command: declare, parse, then execute.
//!
//! A [`Command`] declares its options and positional arguments against
//! fields of itself, and [`run_command`] drives the lifecycle:
//!
//! 1. [`Command::configure`] binds destinations into fresh sets
//! 2. the tokens are parsed, options first, then positionals
//! 3. parse failures and help requests come back as a [`UsageError`] with
//!    the help page attached
//! 4. otherwise [`Command::run`] executes with the parsed fields in place
//!
//! ```rust
//! use standout_args::{run_command, ArgSet, Command, CommandContext, OptionSet};
//!
//! #[derive(Default)]
//! struct Greet {
//!     loud: bool,
//!     name: String,
//! }
//!
//! impl Command for Greet {
//!     fn configure<'a>(&'a mut self, options: &mut OptionSet<'a>, args: &mut ArgSet<'a>) {
//!         options.bool("loud", &mut self.loud, false, "Shout");
//!         args.required("name", &mut self.name, "Who to greet");
//!     }
//!
//!     fn run(&mut self, _ctx: &CommandContext) -> anyhow::Result<()> {
//!         assert!(self.loud);
//!         assert_eq!(self.name, "ferris");
//!         Ok(())
//!     }
//! }
//!
//! run_command("greet", &mut Greet::default(), &["-loud", "ferris"]).unwrap();
//! ```

use tracing::debug;

use crate::error::ArgError;
use crate::exit::UsageError;
use crate::options::{OptionConfig, OptionSet};
use crate::positional::ArgSet;

/// Information about the invocation, passed to [`Command::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    /// The command path being executed (e.g., `["secho"]`).
    pub command_path: Vec<String>,
}

impl CommandContext {
    pub fn new(command_path: Vec<String>) -> Self {
        Self { command_path }
    }
}

/// A command with declared options and arguments.
pub trait Command {
    /// One-line description shown at the top of the help page.
    fn synopsis(&self) -> &str {
        ""
    }

    /// Longer text shown after the option and argument listing.
    fn help(&self) -> &str {
        ""
    }

    /// Parsing configuration for this command's options.
    fn option_config(&self) -> OptionConfig {
        OptionConfig::default()
    }

    /// Binds the command's fields as options and positional arguments.
    fn configure<'a>(&'a mut self, options: &mut OptionSet<'a>, args: &mut ArgSet<'a>) {
        let _ = (options, args);
    }

    /// Executes the command after a successful parse.
    fn run(&mut self, ctx: &CommandContext) -> anyhow::Result<()>;
}

/// Parses `tokens` into `options`, then hands whatever options leave
/// behind to `args`.
pub fn parse<S: AsRef<str>>(
    options: &mut OptionSet<'_>,
    args: &mut ArgSet<'_>,
    tokens: &[S],
) -> Result<(), ArgError> {
    let rest = options.parse(tokens)?;
    args.parse(rest)
}

/// The help page for a command named `name`.
pub fn usage(name: &str, options: &OptionSet<'_>, args: &ArgSet<'_>) -> String {
    crate::usage::page(name, options, args)
}

fn help_page(synopsis: &str, page: &str, help: &str) -> String {
    [synopsis, page, help]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Configures, parses and runs `command`.
///
/// A usage error returned by [`Command::run`] itself gets the help page
/// attached too, unless it already carries usage text.
pub fn run_command<C, S>(name: &str, command: &mut C, tokens: &[S]) -> anyhow::Result<()>
where
    C: Command + ?Sized,
    S: AsRef<str>,
{
    let synopsis = command.synopsis().to_string();
    let help = command.help().to_string();

    let page = {
        let mut options = OptionSet::with_config(command.option_config());
        let mut args = ArgSet::new();
        command.configure(&mut options, &mut args);
        let page = help_page(&synopsis, &usage(name, &options, &args), &help);

        if let Err(err) = parse(&mut options, &mut args, tokens) {
            debug!(command = name, error = %err, "parse failed");
            let usage_err = if err.is_help_request() {
                UsageError::help_request()
            } else {
                UsageError::new(err)
            };
            return Err(usage_err.with_usage(page).into());
        }
        page
    };

    debug!(command = name, "running");
    let ctx = CommandContext::new(vec![name.to_string()]);
    command.run(&ctx).map_err(|err| {
        if let Some(usage_err) = err.downcast_ref::<UsageError>() {
            usage_err.set_usage(page);
        }
        err
    })
}
