//! Shell pipeline splitting
//!
//! Splits a command line on `|` outside quotes. The first segment must be
//! an `aws <service> ...` invocation; the rest are utility segments.
//! Commands reach a shell, so anything else the shell would act on
//! (chaining, background jobs, redirection, command substitution) is
//! rejected here.

use crate::output::ErrorKind;
use crate::rules::Service;

/// The command-family token every primary segment starts with
pub const CLI_TOKEN: &str = "aws";

/// Role of a segment within the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// The AWS CLI invocation
    Primary,
    /// A text filter fed by the previous segment
    Utility,
}

/// One unit of a shell pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSegment {
    text: String,
    tokens: Vec<String>,
    role: SegmentRole,
    position: usize,
}

impl CommandSegment {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        let text = text.into();
        let role = if position == 0 {
            SegmentRole::Primary
        } else {
            SegmentRole::Utility
        };
        Self {
            tokens: tokenize(&text),
            text,
            role,
            position,
        }
    }

    /// Trimmed segment text, quotes intact
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shell words with quotes and escapes removed
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn role(&self) -> SegmentRole {
        self.role
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Shell words joined by single spaces
    pub fn normalized(&self) -> String {
        self.tokens.join(" ")
    }

    /// Second shell word (`iam` in `aws iam list-users`)
    pub fn service_token(&self) -> Option<&str> {
        self.tokens.get(1).map(String::as_str)
    }

    /// The service, if it is one rules can be keyed by
    pub fn service(&self) -> Option<Service> {
        self.service_token().and_then(Service::from_str)
    }
}

/// Split text into shell words. Unbalanced quotes fall back to plain
/// whitespace splitting.
pub fn tokenize(text: &str) -> Vec<String> {
    shlex::split(text).unwrap_or_else(|| text.split_whitespace().map(str::to_string).collect())
}

/// A command line that failed structural validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitError {
    pub kind: ErrorKind,
    pub position: usize,
    pub message: String,
    /// Shell operator that caused a `CommandInjectionRisk`
    pub operator: Option<&'static str>,
}

impl SplitError {
    fn new(kind: ErrorKind, position: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
            operator: None,
        }
    }
}

/// Split on pipes outside single or double quotes. A backslash outside
/// single quotes escapes the next character. Pieces are trimmed; empty
/// pieces are kept so callers can reject them.
pub fn split_pipe_command(command: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;

    for ch in command.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }

        match ch {
            '\\' if !in_single => {
                escaped = true;
                current.push(ch);
            }
            '\'' if !in_double => {
                in_single = !in_single;
                current.push(ch);
            }
            '"' if !in_single => {
                in_double = !in_double;
                current.push(ch);
            }
            '|' if !in_single && !in_double => {
                segments.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    segments.push(current.trim().to_string());
    segments
}

/// Find the first shell operator the shell would act on. Command
/// substitution also expands inside double quotes; single quotes make
/// everything literal.
pub fn find_shell_operator(command: &str) -> Option<&'static str> {
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;
    let mut chars = command.chars().peekable();

    while let Some(ch) = chars.next() {
        if escaped {
            escaped = false;
            continue;
        }
        if in_single {
            in_single = ch != '\'';
            continue;
        }

        match ch {
            '\\' => escaped = true,
            '"' => in_double = !in_double,
            '`' => return Some("`"),
            '$' if chars.peek() == Some(&'(') => return Some("$("),
            _ if in_double => {}
            '\'' => in_single = true,
            ';' => return Some(";"),
            '&' => return Some("&"),
            '<' => return Some("<"),
            '>' => return Some(">"),
            '\n' | '\r' => return Some("newline"),
            _ => {}
        }
    }
    None
}

/// Split a command line into validated segments. The result is never
/// empty and its first element is always the primary segment.
pub fn split_pipeline(command: &str) -> Result<Vec<CommandSegment>, SplitError> {
    let pieces = split_pipe_command(command);

    let primary = tokenize(pieces.first().map(String::as_str).unwrap_or(""));
    if primary.first().map(String::as_str) != Some(CLI_TOKEN) {
        return Err(SplitError::new(
            ErrorKind::NotACloudCommand,
            0,
            format!("Commands must start with '{}'", CLI_TOKEN),
        ));
    }
    match primary.get(1) {
        None => {
            return Err(SplitError::new(
                ErrorKind::NotACloudCommand,
                0,
                "Commands must include an AWS service (e.g., aws s3 ls)",
            ))
        }
        // A global option here hides the service from every service rule
        Some(token) if token.starts_with('-') => {
            return Err(SplitError::new(
                ErrorKind::NotACloudCommand,
                0,
                format!(
                    "Global option '{}' must follow the service and operation (e.g., aws s3 ls --region us-east-1)",
                    token
                ),
            ))
        }
        Some(_) => {}
    }

    for (position, piece) in pieces.iter().enumerate() {
        if let Some(operator) = find_shell_operator(piece) {
            return Err(SplitError {
                operator: Some(operator),
                ..SplitError::new(
                    ErrorKind::CommandInjectionRisk,
                    position,
                    format!(
                        "Shell operator '{}' at position {} in pipeline is not allowed; run one AWS CLI command, optionally piped into text utilities",
                        operator, position
                    ),
                )
            });
        }
    }

    if let Some(position) = pieces.iter().position(String::is_empty) {
        return Err(SplitError::new(
            ErrorKind::EmptyCommand,
            position,
            format!("Empty command at position {} in pipeline", position),
        ));
    }

    Ok(pieces
        .into_iter()
        .enumerate()
        .map(|(position, text)| CommandSegment::new(text, position))
        .collect())
}
