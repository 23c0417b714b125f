//! ホットスポット分析の中核となるモジュール
//!
//! このモジュールは、リポジトリ履歴からバグの発生しやすいファイルを特定します。
//! 分析プロセスは以下の流れで行われます：
//!
//! 1. 現在のリビジョンのファイル一覧の取得
//! 2. 最初と最後のコミット日時の取得
//! 3. バグ修正コミット（メッセージがパターンに一致するコミット）の取得
//! 4. コミットの新しさで重み付けしたスコアの算出と降順ソート
//!
//! # 主要なコンポーネント
//!
//! - `HotspotAnalyzer`: 分析プロセス全体を制御する構造体
//! - `HistoryProvider`: 履歴クエリを実行するトレイト（`GitCommand`、`Libgit2History`）
//! - `parser`: クエリ出力の解析
//! - `selector`: ランキングから上位を選ぶ処理

mod error;
mod git;
mod history;
mod metrics;
pub mod parser;
pub mod selector;

pub use error::{AnalyzerError, HistoryFact, ParseError, ProviderError};
pub use git::Libgit2History;
pub use history::{GitCommand, HistoryProvider};
pub use metrics::Hotspot;
pub use selector::{select_top, SelectionConfig};

use indexmap::IndexMap;
use log::{debug, info};
use parser::Commit;
use regex::RegexBuilder;
use std::path::Path;

/// バグ修正コミットを判定するデフォルトの正規表現
///
/// "fixes #123" や "closes gh-45" のような記述に一致します。
pub const DEFAULT_COMMIT_PATTERN: &str = r"\b(fix(e[sd])?|close[sd]?) (#|gh-)[1-9][0-9]*\b";

/// ロジスティック減衰の急峻さ
const DECAY_STEEPNESS: f64 = 12.0;

/// ホットスポット分析を実行するメインの構造体
///
/// # フィールド
///
/// - `provider`: 履歴クエリを実行するプロバイダ
/// - `pattern`: バグ修正コミットを判定する正規表現
pub struct HotspotAnalyzer<P> {
    provider: P,
    pattern: String,
}

impl<P: HistoryProvider> HotspotAnalyzer<P> {
    /// 新しいHotspotAnalyzerインスタンスを作成します
    ///
    /// # エラー
    ///
    /// `pattern`が正規表現として解釈できない場合は`AnalyzerError::InvalidPattern`を返します
    pub fn new(provider: P, pattern: impl Into<String>) -> Result<Self, AnalyzerError> {
        let pattern = pattern.into();
        RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AnalyzerError::InvalidPattern(e.to_string()))?;

        Ok(Self { provider, pattern })
    }

    /// リポジトリを分析し、スコアの降順に並んだホットスポットの全リストを返します
    ///
    /// 同じスコアのファイルはファイル一覧に現れた順序を保ちます。
    ///
    /// # エラー
    ///
    /// 4つのクエリのいずれかが失敗した時点で、後続のクエリを実行せずにエラーを返します。
    /// エラーにはどの事実の取得に失敗したかが含まれます。
    pub fn compute_hotspots(&self, repo: &Path) -> Result<Vec<Hotspot>, AnalyzerError> {
        let head_files = self
            .provider
            .head_files(repo)
            .map(|raw| parser::parse_file_list(&raw))
            .map_err(|source| unavailable(HistoryFact::HeadFiles, source))?;
        debug!("{} files at head", head_files.len());

        let first = self.revision_time(HistoryFact::FirstCommit, || {
            self.provider.first_commit_timestamp(repo)
        })?;
        let last = self.revision_time(HistoryFact::LastCommit, || {
            self.provider.last_commit_timestamp(repo)
        })?;
        debug!("history spans {} to {}", first, last);

        let raw = self
            .provider
            .matching_commits(repo, &self.pattern)
            .map_err(|source| unavailable(HistoryFact::BugFixCommits, source))?;
        let commits = parser::parse_commit_blocks(&raw)
            .map_err(|e| AnalyzerError::parse(HistoryFact::BugFixCommits, e))?;
        debug!("{} bug-fix commits match {:?}", commits.len(), self.pattern);

        let hotspots = score_files(&head_files, &commits, first, last);
        info!("found {} hotspots in {}", hotspots.len(), repo.display());
        Ok(hotspots)
    }

    fn revision_time(
        &self,
        fact: HistoryFact,
        query: impl FnOnce() -> Result<String, ProviderError>,
    ) -> Result<i64, AnalyzerError> {
        let raw = query().map_err(|source| unavailable(fact, source))?;
        parser::parse_revision_record(&raw).map_err(|e| AnalyzerError::parse(fact, e))
    }
}

fn unavailable(fact: HistoryFact, source: ProviderError) -> AnalyzerError {
    AnalyzerError::HistoryUnavailable { fact, source }
}

/// `git`コマンドを使って`repo`のホットスポットを計算します
///
/// # エラー
///
/// パターンが無効な場合や、履歴の取得・解析に失敗した場合にエラーを返します
pub fn compute_hotspots(repo: &Path, pattern: &str) -> Result<Vec<Hotspot>, AnalyzerError> {
    HotspotAnalyzer::new(GitCommand::default(), pattern)?.compute_hotspots(repo)
}

/// 時刻`t`を`[lo, hi]`の範囲で0〜1に正規化します
///
/// `lo == hi`の場合は1（最も新しい）として扱います。
pub fn normalize_timestamp(t: i64, lo: i64, hi: i64) -> f64 {
    if hi == lo {
        return 1.0;
    }
    (t - lo) as f64 / (hi - lo) as f64
}

/// 正規化された時刻を新しさの重みに変換します
pub fn recency_weight(x: f64) -> f64 {
    1.0 / (1.0 + (-DECAY_STEEPNESS * x + DECAY_STEEPNESS).exp())
}

/// ファイルごとに重みを合計し、スコアの降順に並べます
///
/// スコアが0のファイルは含めません。
fn score_files(head_files: &[String], commits: &[Commit], first: i64, last: i64) -> Vec<Hotspot> {
    let mut scores: IndexMap<&str, f64> = head_files
        .iter()
        .map(|file| (file.as_str(), 0.0))
        .collect();

    for commit in commits {
        let x = normalize_timestamp(commit.timestamp.timestamp(), first, last);
        let weight = recency_weight(x);
        for file in &commit.files {
            if let Some(score) = scores.get_mut(file.as_str()) {
                *score += weight;
            }
        }
    }

    let mut hotspots: Vec<Hotspot> = scores
        .into_iter()
        .filter(|(_, score)| *score != 0.0)
        .map(|(file, score)| Hotspot {
            file: file.to_string(),
            score,
        })
        .collect();

    // sort_byは安定ソートなので同点はファイル一覧の順序のまま
    hotspots.sort_by(|a, b| b.score.total_cmp(&a.score));
    hotspots
}
