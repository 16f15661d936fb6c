use psh_types::ParseError;

pub const INPUT_OPERATOR: &str = "<";
pub const OUTPUT_OPERATOR: &str = ">";

/// One standard-stream rebinding requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Input(String),
    Output(String),
}

impl Redirect {
    pub fn operator(&self) -> &'static str {
        match self {
            Redirect::Input(_) => INPUT_OPERATOR,
            Redirect::Output(_) => OUTPUT_OPERATOR,
        }
    }
}

/// Argument vector with redirection operators and their file names removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolved {
    pub argv: Vec<String>,
    /// In token order; earlier operators are applied first.
    pub redirects: Vec<Redirect>,
}

fn is_operator(token: &str) -> bool {
    token == INPUT_OPERATOR || token == OUTPUT_OPERATOR
}

/// Finds `<` and `>` in `tokens` and pulls them out together with the
/// file name that follows each one.
///
/// An operator with no file name after it (end of input, or another
/// operator) is `MalformedRedirection`; repeating an operator is
/// `DuplicateRedirection`.
pub fn resolve(tokens: &[String]) -> Result<Resolved, ParseError> {
    let mut resolved = Resolved::default();
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        let make: fn(String) -> Redirect = match token.as_str() {
            INPUT_OPERATOR => Redirect::Input,
            OUTPUT_OPERATOR => Redirect::Output,
            _ => {
                resolved.argv.push(token.clone());
                continue;
            }
        };

        let file = match iter.next() {
            Some(file) if !is_operator(file) => file.clone(),
            _ => return Err(ParseError::MalformedRedirection(token.clone())),
        };

        if resolved.redirects.iter().any(|r| r.operator() == token) {
            return Err(ParseError::DuplicateRedirection(token.clone()));
        }
        resolved.redirects.push(make(file));
    }

    Ok(resolved)
}
