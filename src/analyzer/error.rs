use std::fmt;

use thiserror::Error;

/// エンジンが履歴から取得する4つの事実
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFact {
    HeadFiles,
    FirstCommit,
    LastCommit,
    BugFixCommits,
}

impl fmt::Display for HistoryFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HistoryFact::HeadFiles => "head files",
            HistoryFact::FirstCommit => "first commit timestamp",
            HistoryFact::LastCommit => "last commit timestamp",
            HistoryFact::BugFixCommits => "bug-fix commits",
        };
        f.write_str(name)
    }
}

/// 履歴テキストの解析エラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("no commits")]
    NoCommits,

    #[error("invalid timestamp '{0}'")]
    MalformedTimestamp(String),
}

/// 履歴クエリの実行エラー
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("could not read {fact}: {source}")]
    HistoryUnavailable {
        fact: HistoryFact,
        #[source]
        source: ProviderError,
    },

    #[error("could not read {fact}: no commits")]
    NoCommits { fact: HistoryFact },

    #[error("could not read {fact}: invalid timestamp '{value}'")]
    MalformedTimestamp { fact: HistoryFact, value: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

impl AnalyzerError {
    /// 解析エラーに失敗した事実を付与します
    pub(crate) fn parse(fact: HistoryFact, err: ParseError) -> Self {
        match err {
            ParseError::NoCommits => AnalyzerError::NoCommits { fact },
            ParseError::MalformedTimestamp(value) => {
                AnalyzerError::MalformedTimestamp { fact, value }
            }
        }
    }

    /// エラーの原因となった履歴上の事実（設定エラーの場合は`None`）
    pub fn fact(&self) -> Option<HistoryFact> {
        match self {
            AnalyzerError::HistoryUnavailable { fact, .. }
            | AnalyzerError::NoCommits { fact }
            | AnalyzerError::MalformedTimestamp { fact, .. } => Some(*fact),
            AnalyzerError::InvalidConfiguration(_) | AnalyzerError::InvalidPattern(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_keeps_fact() {
        let err = AnalyzerError::parse(
            HistoryFact::LastCommit,
            ParseError::MalformedTimestamp("abc".to_string()),
        );

        assert_eq!(err.fact(), Some(HistoryFact::LastCommit));
        assert_eq!(
            err.to_string(),
            "could not read last commit timestamp: invalid timestamp 'abc'"
        );
    }

    #[test]
    fn test_configuration_error_has_no_fact() {
        let err = AnalyzerError::InvalidConfiguration("percentile".to_string());
        assert_eq!(err.fact(), None);
    }
}
