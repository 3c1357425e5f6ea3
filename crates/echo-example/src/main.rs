//! `secho`: echo words back, a worked example of a standout-args command.
//!
//! ```text
//! $ secho -repeat=2 -sep=, hello world
//! hello,world
//! hello,world
//! ```
//!
//! Set `RUST_LOG=debug` to watch parsing and classification on stderr.

use std::io::{self, Write};
use std::thread;

use anyhow::Context;
use chrono::Duration;
use standout_args::{
    report, run_command, with_code, ArgSet, Arity, Command, CommandContext, OptionConfig,
    OptionSet, UsageError,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Echo {
    no_newline: bool,
    repeat: i64,
    sep: String,
    delay: Duration,
    words: Vec<String>,
}

impl Command for Echo {
    fn synopsis(&self) -> &str {
        "Print words to standard output."
    }

    fn help(&self) -> &str {
        "Words are joined with the separator and printed once per repetition. \
         Use -- before words that begin with a dash."
    }

    fn option_config(&self) -> OptionConfig {
        OptionConfig::new().double_dash(true)
    }

    fn configure<'a>(&'a mut self, options: &mut OptionSet<'a>, args: &mut ArgSet<'a>) {
        options
            .bool("n", &mut self.no_newline, false, "Do not print the trailing newline")
            .int("repeat", &mut self.repeat, 1, "How many times to print the line")
            .string("sep", &mut self.sep, " ", "Separator placed between words")
            .duration("delay", &mut self.delay, Duration::zero(), "Pause between repetitions");
        args.remaining("words", &mut self.words, Arity::any(), "Words to print");
    }

    fn run(&mut self, ctx: &CommandContext) -> anyhow::Result<()> {
        if self.repeat < 0 {
            return Err(UsageError::msg(format!(
                "-repeat must not be negative, got {}",
                self.repeat
            ))
            .into());
        }
        let pause = self
            .delay
            .to_std()
            .map_err(|_| UsageError::msg("-delay must not be negative"))?;

        debug!(command = ?ctx.command_path, words = self.words.len(), "echo");
        let line = self.words.join(&self.sep);
        let mut stdout = io::stdout().lock();
        for i in 0..self.repeat {
            if i > 0 && !pause.is_zero() {
                thread::sleep(pause);
            }
            write!(stdout, "{line}").context("writing to stdout")?;
            if !self.no_newline {
                writeln!(stdout).context("writing to stdout")?;
            }
        }
        stdout
            .flush()
            .context("flushing stdout")
            .map_err(|err| with_code(74, err))?;
        info!(repeat = self.repeat, "done");
        Ok(())
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let tokens: Vec<String> = std::env::args().skip(1).collect();
    let result = run_command("secho", &mut Echo::default(), &tokens);
    let code = report(&result, &mut io::stderr());
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use standout_args::{classify, EXIT_USAGE};

    #[test]
    fn options_bind_to_fields() {
        let mut echo = Echo::default();
        run_command("secho", &mut echo, &["-n", "--repeat=0", "-sep", ",", "a", "b"]).unwrap();
        assert!(echo.no_newline);
        assert_eq!(echo.repeat, 0);
        assert_eq!(echo.sep, ",");
        assert_eq!(echo.words, ["a", "b"]);
    }

    #[test]
    fn negative_repeat_shows_usage() {
        let err = run_command("secho", &mut Echo::default(), &["-repeat=-1"]).unwrap_err();
        let classified = classify(&err);
        assert_eq!(classified.code, EXIT_USAGE);
        assert!(classified.message.contains("Usage: secho [options] [<words>...]"));
        assert!(classified
            .message
            .ends_with("error: -repeat must not be negative, got -1"));
    }

    #[test]
    fn negative_delay_is_rejected() {
        let err = run_command("secho", &mut Echo::default(), &["-delay=-1s", "x"]).unwrap_err();
        assert_eq!(classify(&err).code, EXIT_USAGE);
    }
}
