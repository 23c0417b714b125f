//! 履歴クエリの出力テキストを構造化データに変換するモジュール
//!
//! ここにある関数はすべて副作用を持たず、`HistoryProvider`が返した
//! 生のテキストだけを入力とします。

use super::error::ParseError;
use chrono::{DateTime, Utc};

/// バグ修正コミットの情報を保持する構造体
///
/// # フィールド
///
/// - `timestamp`: コミット日時
/// - `files`: コミットで変更されたファイルのリスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub timestamp: DateTime<Utc>,
    pub files: Vec<String>,
}

/// 改行区切りのファイル一覧を解析します
///
/// 空の入力は空のベクターになります（空文字列1要素ではありません）。
pub fn parse_file_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split('\n').map(str::to_string).collect()
}

/// 空行で区切られたコミットレコードを解析します
///
/// 各レコードの1行目はUnixタイムスタンプ、残りの行は変更されたファイルのパスです。
///
/// # エラー
///
/// いずれかのレコードのタイムスタンプが整数として解釈できない場合、
/// バッチ全体が`ParseError::MalformedTimestamp`で失敗します。
pub fn parse_commit_blocks(raw: &str) -> Result<Vec<Commit>, ParseError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    raw.split("\n\n")
        .map(|block| -> Result<Commit, ParseError> {
            let mut lines = block.split('\n');
            let first = lines.next().unwrap_or_default();
            Ok(Commit {
                timestamp: parse_instant(first)?,
                files: lines.map(str::to_string).collect(),
            })
        })
        .collect()
}

/// `識別子\nタイムスタンプ`形式の2行レコードを解析します
///
/// # エラー
///
/// - 行数が2でない場合は`ParseError::NoCommits`
/// - 2行目が整数でない場合は`ParseError::MalformedTimestamp`
pub fn parse_revision_record(raw: &str) -> Result<i64, ParseError> {
    let lines: Vec<&str> = raw.split('\n').collect();
    if lines.len() != 2 {
        return Err(ParseError::NoCommits);
    }
    parse_seconds(lines[1])
}

fn parse_seconds(field: &str) -> Result<i64, ParseError> {
    field
        .parse::<i64>()
        .map_err(|_| ParseError::MalformedTimestamp(field.to_string()))
}

fn parse_instant(field: &str) -> Result<DateTime<Utc>, ParseError> {
    let seconds = parse_seconds(field)?;
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| ParseError::MalformedTimestamp(field.to_string()))
}
