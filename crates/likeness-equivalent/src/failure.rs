use std::fmt;

use likeness_value::CompareError;
use thiserror::Error;

/// Which operand graph a circular reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Expected,
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Expected => "expected",
            Side::Actual => "actual",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    MemberValueMismatch,
    MissingCollectionValue,
    ExtraCollectionValue,
    MemberListMismatch,
    CircularReference,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::MemberValueMismatch => "member value mismatch",
            FailureKind::MissingCollectionValue => "missing collection value",
            FailureKind::ExtraCollectionValue => "extra collection value",
            FailureKind::MemberListMismatch => "member list mismatch",
            FailureKind::CircularReference => "circular reference",
        })
    }
}

/// Why two values are not equivalent.
///
/// Every variant carries the dotted member path (`prefix`) at which the
/// difference was found; the path is empty at the top level and inside
/// collection elements. Operands are captured already rendered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EquivalenceFailure {
    #[error("Mismatched value{}\nExpected: {expected}\nActual:   {actual}", on_member(.prefix))]
    MemberValueMismatch {
        prefix: String,
        expected: String,
        actual: String,
        #[source]
        cause: Option<CompareError>,
    },
    #[error(
        "Collection value not found{}\nExpected: {expected}\nIn:       {actual}",
        in_member(.prefix)
    )]
    MissingCollectionValue {
        prefix: String,
        expected: String,
        actual: String,
    },
    #[error(
        "Extra values found{}\nExpected: {expected}\nActual:   {extra} left over from {actual}",
        in_member(.prefix)
    )]
    ExtraCollectionValue {
        prefix: String,
        expected: String,
        actual: String,
        extra: String,
    },
    #[error(
        "Mismatched member list{}\nExpected: {}\nActual:   {}",
        on_member(.prefix),
        names(.expected),
        names(.actual)
    )]
    MemberListMismatch {
        prefix: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    /// `prefix` starts with the side, e.g. `expected.next`.
    #[error("Circular reference found in '{prefix}'")]
    CircularReference { side: Side, prefix: String },
}

impl EquivalenceFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MemberValueMismatch { .. } => FailureKind::MemberValueMismatch,
            Self::MissingCollectionValue { .. } => FailureKind::MissingCollectionValue,
            Self::ExtraCollectionValue { .. } => FailureKind::ExtraCollectionValue,
            Self::MemberListMismatch { .. } => FailureKind::MemberListMismatch,
            Self::CircularReference { .. } => FailureKind::CircularReference,
        }
    }

    pub fn prefix(&self) -> &str {
        match self {
            Self::MemberValueMismatch { prefix, .. }
            | Self::MissingCollectionValue { prefix, .. }
            | Self::ExtraCollectionValue { prefix, .. }
            | Self::MemberListMismatch { prefix, .. }
            | Self::CircularReference { prefix, .. } => prefix,
        }
    }

    /// The ordering error that decided a value mismatch, if any.
    pub fn cause(&self) -> Option<&CompareError> {
        match self {
            Self::MemberValueMismatch { cause, .. } => cause.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn circular(side: Side, prefix: &str) -> Self {
        let prefix = if prefix.is_empty() {
            side.to_string()
        } else {
            format!("{side}.{prefix}")
        };
        Self::CircularReference { side, prefix }
    }
}

fn on_member(prefix: &str) -> String {
    if prefix.is_empty() {
        String::new()
    } else {
        format!(" on member '{prefix}'")
    }
}

fn in_member(prefix: &str) -> String {
    if prefix.is_empty() {
        String::new()
    } else {
        format!(" in member '{prefix}'")
    }
}

fn names(names: &[String]) -> String {
    format!("[{}]", names.join(", "))
}
