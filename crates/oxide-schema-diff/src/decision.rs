//! Rename decisions.
//!
//! When the differ finds a table or column that could be a rename of
//! something that disappeared, it asks a [`DecisionSource`]. Questions are
//! asked one at a time; the differ blocks on each answer.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::error::{DiffError, Result};

/// What a rename question is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameSubject {
    /// A table, identified by class name.
    Table,
    /// A column of the given table.
    Column {
        /// Class name of the (live) table.
        table_class_name: String,
    },
}

/// A probable rename put to a decision source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameQuestion {
    /// Table or column.
    pub subject: RenameSubject,
    /// Name that appeared.
    pub new_name: String,
    /// Names that disappeared and match the new one structurally.
    pub candidates: Vec<String>,
    /// Other names that appeared and match the same candidates.
    pub rivals: Vec<String>,
}

impl RenameQuestion {
    /// Text shown to a human.
    #[must_use]
    pub fn prompt(&self) -> String {
        let what = match &self.subject {
            RenameSubject::Table => "table".to_string(),
            RenameSubject::Column { table_class_name } => {
                format!("column on {}", table_class_name)
            }
        };

        if let ([single], []) = (self.candidates.as_slice(), self.rivals.as_slice()) {
            return format!(
                "Did you rename the {} '{}' to '{}'? (y/N)",
                what, single, self.new_name
            );
        }

        let listed: Vec<String> = self
            .candidates
            .iter()
            .enumerate()
            .map(|(i, name)| format!("  {}) {}", i + 1, name))
            .collect();
        let mut prompt = format!(
            "Did you rename one of these to the {} '{}'?\n{}",
            what,
            self.new_name,
            listed.join("\n")
        );
        if !self.rivals.is_empty() {
            prompt.push_str(&format!("\n(also matches {})", self.rivals.join(", ")));
        }
        prompt.push_str("\nEnter a number, or N:");
        prompt
    }

    /// Index of the accepted candidate, if the decision accepts one.
    ///
    /// A plain yes only settles a question with a single candidate and no
    /// rivals; anything else needs an explicit selection.
    #[must_use]
    pub fn resolve(&self, decision: Decision) -> Option<usize> {
        match (decision, self.candidates.len()) {
            (Decision::Rename, 1) if self.rivals.is_empty() => Some(0),
            (Decision::Select(idx), len) if idx < len => Some(idx),
            _ => None,
        }
    }
}

/// An answer to a [`RenameQuestion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Treat the single candidate as renamed.
    Rename,
    /// Treat it as an independent create and drop.
    Keep,
    /// Treat the candidate at this index as renamed.
    Select(usize),
}

impl FromStr for Decision {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self> {
        let answer = s.trim().to_ascii_lowercase();
        match answer.as_str() {
            "y" | "yes" => Ok(Self::Rename),
            "" | "n" | "no" => Ok(Self::Keep),
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Self::Select(n - 1)),
                _ => Err(DiffError::InvalidDecision(s.trim().to_string())),
            },
        }
    }
}

/// Something that answers rename questions.
pub trait DecisionSource {
    /// Answers one question.
    fn decide(&mut self, question: &RenameQuestion) -> Decision;
}

impl<F> DecisionSource for F
where
    F: FnMut(&RenameQuestion) -> Decision,
{
    fn decide(&mut self, question: &RenameQuestion) -> Decision {
        self(question)
    }
}

/// Gives the same answer to every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoInput {
    decision: Decision,
}

impl AutoInput {
    /// Creates a source that always answers `decision`.
    #[must_use]
    pub fn new(decision: Decision) -> Self {
        Self { decision }
    }

    /// Parses the fixed answer from text such as `"y"`.
    pub fn parse(answer: &str) -> Result<Self> {
        Ok(Self::new(answer.parse()?))
    }
}

impl DecisionSource for AutoInput {
    fn decide(&mut self, _question: &RenameQuestion) -> Decision {
        self.decision
    }
}

/// Never confirms a rename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDecision;

impl DecisionSource for NoDecision {
    fn decide(&mut self, _question: &RenameQuestion) -> Decision {
        Decision::Keep
    }
}

/// Asks on a writer and reads one answer line per question.
///
/// Unreadable or unparseable answers count as [`Decision::Keep`].
#[derive(Debug)]
pub struct Interactive<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Interactive<R, W> {
    /// Creates a prompt over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &RenameQuestion) -> io::Result<String> {
        writeln!(self.output, "{}", question.prompt())?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line)
    }
}

impl Interactive<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on the terminal. Questions go to stderr so stdout stays
    /// clean for generated output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> DecisionSource for Interactive<R, W> {
    fn decide(&mut self, question: &RenameQuestion) -> Decision {
        match self.ask(question) {
            Ok(line) => match line.parse() {
                Ok(decision) => decision,
                Err(err) => {
                    tracing::warn!(error = %err, "Ignoring answer");
                    Decision::Keep
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "Could not read answer");
                Decision::Keep
            }
        }
    }
}
