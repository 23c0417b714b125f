//! Gitリポジトリのバグ修正履歴からホットスポットを特定するツール
//!
//! このクレートは、メッセージがバグ修正パターンに一致するコミットを集め、
//! 新しい修正ほど大きく重み付けしてファイルごとのスコアを算出します。
//! スコアの高いファイルはリファクタリングやレビュー強化の候補になります。
//!
//! # 主な機能
//!
//! - 現在のリビジョンのファイル一覧とバグ修正コミットの取得
//! - ロジスティック減衰による新しさの重み付け
//! - スコアの降順ランキング
//! - 件数と割合による上位の選択
//!
//! # 使用例
//!
//! ```no_run
//! use bugspots::{select_top, GitCommand, HotspotAnalyzer, SelectionConfig};
//! use std::path::Path;
//!
//! let analyzer = HotspotAnalyzer::new(
//!     GitCommand::default(),
//!     bugspots::DEFAULT_COMMIT_PATTERN,
//! ).unwrap();
//!
//! let hotspots = analyzer.compute_hotspots(Path::new("path/to/repo")).unwrap();
//! let config = SelectionConfig::new(0, 50, 10.0).unwrap();
//! for hotspot in select_top(&hotspots, &config) {
//!     println!("{:.4} {}", hotspot.score, hotspot.file);
//! }
//! ```

pub mod analyzer;
pub use analyzer::{
    compute_hotspots, select_top, AnalyzerError, GitCommand, HistoryFact, HistoryProvider,
    Hotspot, HotspotAnalyzer, Libgit2History, SelectionConfig, DEFAULT_COMMIT_PATTERN,
};
