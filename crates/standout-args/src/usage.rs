//! Usage text rendering.
//!
//! Output is a pure function of the declared options and arguments, so the
//! same declarations always produce byte-identical text. Layout:
//!
//! ```text
//!   -b    Short signatures start their text on the same line, padded to the
//!         text column.
//!   -iv=<int>
//!         Longer signatures put their text on the following lines.
//!         (default: 2)
//!   <path> (kind) hint
//!         Positional arguments keep declaration order.
//!
//!   -quiet
//!   -verbose
//! ```
//!
//! Options are sorted by name and listed before positional arguments.
//! Entries with neither usage text nor hint text collapse to a single line;
//! a blank line separates an annotated entry from a following collapsed one.

use unicode_width::UnicodeWidthStr;

use crate::options::OptionSet;
use crate::positional::{ArgKind, ArgSet};

/// Layout parameters for usage text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageConfig {
    /// Maximum width of wrapped usage text, excluding the indent.
    pub width: usize,
    /// Column at which usage text starts.
    pub indent: usize,
    /// Signatures at most this wide (including their two-space lead) share
    /// a line with the first line of usage text.
    pub inline_limit: usize,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            width: 80,
            indent: 8,
            inline_limit: 4,
        }
    }
}

/// One rendered declaration, before layout.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    signature: String,
    hint_text: Option<String>,
    usage: String,
    default: Option<String>,
}

impl Entry {
    fn is_compact(&self) -> bool {
        self.usage.trim().is_empty() && self.hint_text.is_none() && self.default.is_none()
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}

fn option_entries(options: &OptionSet<'_>) -> Vec<Entry> {
    let double_dash = options.config().double_dash;
    options
        .sorted()
        .map(|decl| {
            let hint = decl.value.hint();
            let mut signature = format!("-{}", decl.name);
            if double_dash && decl.name.chars().count() > 1 {
                signature.push_str(&format!(", --{}", decl.name));
            }
            if !decl.value.is_flag() {
                let kind = non_empty(hint.kind).unwrap_or_else(|| "value".to_string());
                signature.push_str(&format!("=<{kind}>"));
            }
            Entry {
                signature,
                hint_text: non_empty(hint.text),
                usage: decl.usage.clone(),
                default: decl.show_default.then(|| decl.default.clone()),
            }
        })
        .collect()
}

fn arg_entries(args: &ArgSet<'_>) -> Vec<Entry> {
    args.declarations()
        .map(|decl| {
            let mut signature = format!("<{}>", decl.name);
            if matches!(decl.kind, ArgKind::Remaining(_)) {
                signature.push_str("...");
            }
            if let Some(kind) = non_empty(decl.hint.kind.clone()) {
                signature.push_str(&format!(" ({kind})"));
            }
            Entry {
                signature,
                hint_text: non_empty(decl.hint.text.clone()),
                usage: decl.usage.clone(),
                default: decl.default.clone(),
            }
        })
        .collect()
}

/// Renders the combined usage block for `options` followed by `args`.
pub fn render(
    options: Option<&OptionSet<'_>>,
    args: Option<&ArgSet<'_>>,
    config: &UsageConfig,
) -> String {
    let mut entries = options.map(option_entries).unwrap_or_default();
    entries.extend(args.map(arg_entries).unwrap_or_default());

    let indent = " ".repeat(config.indent);
    let mut out = String::new();
    let mut after_annotated = false;

    for entry in &entries {
        let mut head = format!("  {}", entry.signature);
        if let Some(text) = &entry.hint_text {
            head.push(' ');
            head.push_str(text);
        }

        if entry.is_compact() {
            if after_annotated {
                out.push('\n');
            }
            out.push_str(&head);
            out.push('\n');
            after_annotated = false;
            continue;
        }

        let mut lines = wrap(&entry.usage, config.width);
        if let Some(default) = &entry.default {
            append_unbroken(&mut lines, &format!("(default: {default})"), config.width);
        }

        let mut lines = lines.into_iter();
        if head.width() <= config.inline_limit {
            if let Some(first) = lines.next() {
                let pad = config.indent.saturating_sub(head.width());
                head.push_str(&" ".repeat(pad));
                head.push_str(&first);
            }
        }
        out.push_str(&head);
        out.push('\n');
        for line in lines {
            out.push_str(&indent);
            out.push_str(&line);
            out.push('\n');
        }
        after_annotated = true;
    }

    out
}

/// Renders a full help page: a `Usage:` synopsis line, a blank line, then the
/// combined option and argument block.
pub fn page(name: &str, options: &OptionSet<'_>, args: &ArgSet<'_>) -> String {
    page_with(name, options, args, &UsageConfig::default())
}

/// [`page`] with explicit layout parameters.
pub fn page_with(
    name: &str,
    options: &OptionSet<'_>,
    args: &ArgSet<'_>,
    config: &UsageConfig,
) -> String {
    let mut synopsis = format!("Usage: {name}");
    if !options.is_empty() {
        synopsis.push_str(" [options]");
    }
    let arg_synopsis = args.synopsis();
    if !arg_synopsis.is_empty() {
        synopsis.push(' ');
        synopsis.push_str(&arg_synopsis);
    }

    let block = render(Some(options), Some(args), config);
    if block.is_empty() {
        format!("{synopsis}\n")
    } else {
        format!("{synopsis}\n\n{block}")
    }
}

/// Greedy word wrap. Explicit newlines in `text` start new lines.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.width() + 1 + word.width() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Appends `note` to the last line if it fits whole, else on its own line.
fn append_unbroken(lines: &mut Vec<String>, note: &str, width: usize) {
    let fits = |last: &&mut String| last.width() + 1 + note.width() <= width;
    if let Some(last) = lines.last_mut().filter(fits) {
        last.push(' ');
        last.push_str(note);
        return;
    }
    lines.push(note.to_string());
}
