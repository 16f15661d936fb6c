use crate::process::redirect::{self, Redirect};
use psh_types::ParseError;

/// Most tokens one command line may carry.
pub const MAX_ARGS: usize = 512;
pub const BACKGROUND_MARKER: &str = "&";
pub const COMMENT_MARKER: &str = "#";

const TOKEN_DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\x07'];

/// Splits one input line into whitespace separated tokens. No quoting,
/// no expansion.
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let tokens: Vec<String> = line
        .split(TOKEN_DELIMITERS)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tokens.len() > MAX_ARGS {
        return Err(ParseError::TooManyArguments(MAX_ARGS));
    }
    Ok(tokens)
}

/// True for lines the dispatcher skips entirely: no tokens, or a bare `#`
/// as the first token.
pub fn is_blank_or_comment(tokens: &[String]) -> bool {
    match tokens.first() {
        None => true,
        Some(first) => first == COMMENT_MARKER,
    }
}

/// An external command ready to launch, built once from a token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionIntent {
    pub program: String,
    pub arguments: Vec<String>,
    pub background: bool,
    redirects: Vec<Redirect>,
}

impl ExecutionIntent {
    /// Strips a trailing `&`, then resolves redirections in what is left.
    pub fn from_tokens(tokens: &[String]) -> Result<Self, ParseError> {
        let (window, background) = match tokens.split_last() {
            Some((last, rest)) if last == BACKGROUND_MARKER => (rest, true),
            _ => (tokens, false),
        };

        let resolved = redirect::resolve(window)?;
        let mut argv = resolved.argv.into_iter();
        let program = argv.next().ok_or(ParseError::MissingCommand)?;

        Ok(ExecutionIntent {
            program,
            arguments: argv.collect(),
            background,
            redirects: resolved.redirects,
        })
    }

    pub fn input_redirect(&self) -> Option<&str> {
        self.redirects.iter().find_map(|r| match r {
            Redirect::Input(path) => Some(path.as_str()),
            Redirect::Output(_) => None,
        })
    }

    pub fn output_redirect(&self) -> Option<&str> {
        self.redirects.iter().find_map(|r| match r {
            Redirect::Output(path) => Some(path.as_str()),
            Redirect::Input(_) => None,
        })
    }

    /// Redirections in the order they are applied.
    pub fn redirects(&self) -> &[Redirect] {
        &self.redirects
    }

    /// Program name followed by its arguments, as handed to `execvp`.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.arguments.iter().cloned())
            .collect()
    }
}
