use std::fmt;

/// Machine-readable error codes for scripts and the JSON error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    GoalNotFound,
    EntryNotFound,
    AmbiguousId,
    InvalidCategory,
    InvalidYear,
    DocumentUnreadable,
    DocumentWriteFailed,
    LockContention,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::GoalNotFound => "E2001",
            Self::EntryNotFound => "E2002",
            Self::AmbiguousId => "E2003",
            Self::InvalidCategory => "E2004",
            Self::InvalidYear => "E2005",
            Self::DocumentUnreadable => "E3001",
            Self::DocumentWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::GoalNotFound => "Goal not found",
            Self::EntryNotFound => "Entry not found",
            Self::AmbiguousId => "Ambiguous ID prefix",
            Self::InvalidCategory => "Invalid category value",
            Self::InvalidYear => "Year outside the supported calendar range",
            Self::DocumentUnreadable => "Goal document could not be read",
            Self::DocumentWriteFailed => "Goal document write failed",
            Self::LockContention => "Lock contention",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to the user.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in gbit/config.toml and retry."),
            Self::GoalNotFound => Some("Run `gbit list` to see the current goal IDs."),
            Self::EntryNotFound => Some("Run `gbit show <goal>` to see the goal's entries."),
            Self::AmbiguousId => Some("Use a longer ID prefix to disambiguate."),
            Self::InvalidCategory => Some("Use one of: learning, book, money, general."),
            Self::InvalidYear => Some("Pick a year between 1 and 9999."),
            Self::DocumentUnreadable => {
                Some("Starting from an empty document; run `gbit verify` to inspect the file.")
            }
            Self::DocumentWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `gbit` process finishes."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
