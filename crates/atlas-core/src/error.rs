use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidPattern,
    InvalidBudget,
    UnknownProfile,
    DuplicateFileId,
    InvalidFileId,
    FocusNotFound,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidPattern => "E1002",
            Self::InvalidBudget => "E1003",
            Self::UnknownProfile => "E1004",
            Self::DuplicateFileId => "E2001",
            Self::InvalidFileId => "E2002",
            Self::FocusNotFound => "E2003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidPattern => "Invalid glob pattern",
            Self::InvalidBudget => "Invalid budget value",
            Self::UnknownProfile => "Unknown budget profile",
            Self::DuplicateFileId => "Duplicate file id",
            Self::InvalidFileId => "Invalid file id",
            Self::FocusNotFound => "Focus target not found",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .atlas/config.toml and retry."),
            Self::InvalidPattern => {
                Some("Check glob syntax in the [patterns] and [[boundary]] tables.")
            }
            Self::InvalidBudget => {
                Some("Budgets must be at least 1; use --full-signals for unbounded output.")
            }
            Self::UnknownProfile => Some("Use one of: compact, default, wide."),
            Self::DuplicateFileId => Some("Deduplicate the file list produced by the parser."),
            Self::InvalidFileId => {
                Some("File ids must be repo-relative paths without `..` segments.")
            }
            Self::FocusNotFound => Some("Pass a path that exists in the analyzed file set."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Configuration errors. Any of these aborts the run before a report is produced.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("duplicate file id: {0}")]
    DuplicateFileId(String),

    #[error("invalid file id {id:?}: {reason}")]
    InvalidFileId { id: String, reason: &'static str },

    #[error("focus target not found in file set: {0}")]
    FocusNotFound(String),

    #[error("invalid budget `{field}`: {value} (must be >= 1)")]
    InvalidBudget { field: &'static str, value: usize },

    #[error("invalid glob pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("unknown budget profile: {0}")]
    UnknownProfile(String),
}

impl AtlasError {
    /// The stable [`ErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateFileId(_) => ErrorCode::DuplicateFileId,
            Self::InvalidFileId { .. } => ErrorCode::InvalidFileId,
            Self::FocusNotFound(_) => ErrorCode::FocusNotFound,
            Self::InvalidBudget { .. } => ErrorCode::InvalidBudget,
            Self::InvalidPattern { .. } => ErrorCode::InvalidPattern,
            Self::UnknownProfile(_) => ErrorCode::UnknownProfile,
        }
    }
}
