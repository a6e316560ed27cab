use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use super::SlashCommand;

/// Greyed-out text after the cursor. Only the rest of the keyword is
/// accepted on right-arrow; the description is display only.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandHint {
    display: String,
    rest: String,
}

impl Hint for CommandHint {
    fn display(&self) -> &str {
        &self.display
    }

    fn completion(&self) -> Option<&str> {
        (!self.rest.is_empty()).then_some(self.rest.as_str())
    }
}

/// Slash-command completion, with each command's description in the hint
/// and the completion list.
#[derive(Clone, Default)]
pub struct ChatHelper;

impl ChatHelper {
    pub fn new() -> Self {
        Self
    }

    fn matching(prefix: &str) -> impl Iterator<Item = SlashCommand> + '_ {
        SlashCommand::ALL
            .into_iter()
            .filter(move |c| c.keyword().starts_with(prefix))
    }

    fn candidates(&self, line: &str) -> Vec<Pair> {
        if !line.starts_with('/') || line.contains(char::is_whitespace) {
            return Vec::new();
        }
        Self::matching(line)
            .map(|c| Pair {
                display: format!("{:<9} {}", c.keyword(), c.description()),
                replacement: c.keyword().to_string(),
            })
            .collect()
    }

    fn command_hint(&self, line: &str) -> Option<CommandHint> {
        let word = line.strip_prefix('/').map(|_| line.trim_end())?;
        if word.contains(char::is_whitespace) {
            return None;
        }

        // A finished keyword (typed out, maybe followed by a space) just gets its description.
        if let Some(command) = SlashCommand::ALL.into_iter().find(|c| c.keyword() == word) {
            let pad = if line.ends_with(' ') { "" } else { " " };
            return Some(CommandHint {
                display: format!("{pad} {}", command.description()),
                rest: String::new(),
            });
        }
        if line.ends_with(' ') {
            return None;
        }

        let mut matches = Self::matching(word);
        let command = matches.next()?;
        let rest = command.keyword()[word.len()..].to_string();
        let display = match matches.next() {
            Some(_) => rest.clone(),
            None => format!("{rest}  {}", command.description()),
        };
        Some(CommandHint { display, rest })
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok((0, self.candidates(&line[..pos])))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        let (word, rest) = line.split_at(line.find(' ').unwrap_or(line.len()));
        let word = if SlashCommand::ALL.iter().any(|c| c.keyword() == word) {
            word.bright_cyan()
        } else {
            word.yellow()
        };
        Owned(format!("{word}{rest}"))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Hinter for ChatHelper {
    type Hint = CommandHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<CommandHint> {
        if pos < line.len() {
            return None;
        }
        self.command_hint(line)
    }
}

impl Validator for ChatHelper {}
