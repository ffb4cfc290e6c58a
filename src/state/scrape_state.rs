/// Scrape state definitions for tracking a single page fetch
///
/// This module defines all possible states a scrape can be in and which transitions
/// between them are legal.
use std::fmt;

/// Classification of a failed scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Input is not a syntactically valid absolute URL
    InvalidUrl,

    /// The target path is disallowed by robots.txt
    PolicyDenied,

    /// Transport failure or timeout during the page fetch
    NetworkError,

    /// The page fetch returned a non-success status
    HttpError,

    /// The page fetch succeeded but the body is empty or not textual
    EmptyContent,

    /// The body could not be parsed into a document
    ParseError,
}

impl FailureKind {
    /// Returns the string representation used in logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::PolicyDenied => "policy_denied",
            Self::NetworkError => "network_error",
            Self::HttpError => "http_error",
            Self::EmptyContent => "empty_content",
            Self::ParseError => "parse_error",
        }
    }

    /// Process exit code used by the command-line wrapper
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidUrl => 2,
            Self::PolicyDenied => 3,
            Self::NetworkError => 4,
            Self::HttpError => 5,
            Self::EmptyContent => 6,
            Self::ParseError => 7,
        }
    }

    /// Returns all failure kinds
    pub fn all_kinds() -> Vec<Self> {
        vec![
            Self::InvalidUrl,
            Self::PolicyDenied,
            Self::NetworkError,
            Self::HttpError,
            Self::EmptyContent,
            Self::ParseError,
        ]
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the current stage of a scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrapeState {
    // ===== Active States =====
    /// Checking that the input is an absolute http(s) URL
    Validating,

    /// Resolving robots.txt for the target
    CheckingPolicy,

    /// Waiting out the courtesy delay
    Delaying,

    /// Requesting the page
    Fetching,

    /// Parsing the body and collecting title and links
    Extracting,

    // ===== Terminal States =====
    /// The scrape produced a result
    Done,

    /// The scrape ended with a classified failure
    Failed(FailureKind),
}

impl ScrapeState {
    /// Returns true if this is a terminal state (no further processing)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the state that follows this one on the success path
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Validating => Some(Self::CheckingPolicy),
            Self::CheckingPolicy => Some(Self::Delaying),
            Self::Delaying => Some(Self::Fetching),
            Self::Fetching => Some(Self::Extracting),
            Self::Extracting => Some(Self::Done),
            Self::Done | Self::Failed(_) => None,
        }
    }

    /// Checks whether moving from this state to `to` is legal
    ///
    /// Each active state may advance to its successor or fail. Failures are only
    /// legal from the states that can produce them: `InvalidUrl` while validating,
    /// `PolicyDenied` while checking policy, and so on. `NetworkError` may also
    /// end the policy check or the delay when an overall deadline expires.
    pub fn can_transition_to(&self, to: ScrapeState) -> bool {
        if let Self::Failed(kind) = to {
            return match self {
                Self::Validating => kind == FailureKind::InvalidUrl,
                Self::CheckingPolicy => {
                    matches!(kind, FailureKind::PolicyDenied | FailureKind::NetworkError)
                }
                Self::Delaying => kind == FailureKind::NetworkError,
                Self::Fetching => matches!(
                    kind,
                    FailureKind::NetworkError | FailureKind::HttpError | FailureKind::EmptyContent
                ),
                Self::Extracting => kind == FailureKind::ParseError,
                Self::Done | Self::Failed(_) => false,
            };
        }

        self.next() == Some(to)
    }

    /// Returns the name of the state for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::CheckingPolicy => "checking_policy",
            Self::Delaying => "delaying",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Done => "done",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for ScrapeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(kind) => write!(f, "failed({})", kind),
            other => write!(f, "{}", other.name()),
        }
    }
}
