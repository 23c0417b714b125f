//! libgit2を使用した履歴プロバイダ
//!
//! `git`コマンドと同じ形式のテキストを生成するため、
//! どちらのプロバイダを使っても解析結果は同じになります。

use super::error::ProviderError;
use super::history::HistoryProvider;
use git2::{Commit, ErrorCode, Repository};
use log::debug;
use regex::RegexBuilder;
use std::path::Path;

/// libgit2でリポジトリを直接読むプロバイダ
///
/// リポジトリは呼び出しごとに`repo`から開き直すため、状態を持ちません。
#[derive(Debug, Clone, Copy, Default)]
pub struct Libgit2History;

impl Libgit2History {
    fn open(repo: &Path) -> Result<Repository, ProviderError> {
        // `git`コマンドと同様に、サブディレクトリからでも上位のリポジトリを探す
        debug!("discovering repository from {} with libgit2", repo.display());
        Ok(Repository::discover(repo)?)
    }

    /// HEADのコミットを返します。HEADが未生成（コミットが1つもない）場合は`None`
    fn head_commit(repo: &Repository) -> Result<Option<Commit<'_>>, ProviderError> {
        match repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn revision_record(commit: &Commit) -> String {
    format!("commit {}\n{}", commit.id(), commit.time().seconds())
}

impl HistoryProvider for Libgit2History {
    fn head_files(&self, repo: &Path) -> Result<String, ProviderError> {
        let repo = Self::open(repo)?;
        let index = repo.index()?;

        let files: Vec<String> = index
            .iter()
            .map(|entry| path_string(&entry.path))
            .collect();

        Ok(files.join("\n"))
    }

    fn first_commit_timestamp(&self, repo: &Path) -> Result<String, ProviderError> {
        let repo = Self::open(repo)?;
        if Self::head_commit(&repo)?.is_none() {
            return Ok(String::new());
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(git2::Sort::TIME)?;

        let mut roots = Vec::new();
        for oid in revwalk {
            let commit = repo.find_commit(oid?)?;
            if commit.parent_count() == 0 {
                roots.push(revision_record(&commit));
            }
        }

        Ok(roots.join("\n"))
    }

    fn last_commit_timestamp(&self, repo: &Path) -> Result<String, ProviderError> {
        let repo = Self::open(repo)?;
        let record = Self::head_commit(&repo)?
            .map(|commit| revision_record(&commit))
            .unwrap_or_default();
        Ok(record)
    }

    fn matching_commits(&self, repo: &Path, pattern: &str) -> Result<String, ProviderError> {
        let matcher = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()?;

        let repo = Self::open(repo)?;
        if Self::head_commit(&repo)?.is_none() {
            return Ok(String::new());
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(git2::Sort::TIME)?;

        let mut blocks = Vec::new();
        for oid in revwalk {
            let commit = repo.find_commit(oid?)?;

            // マージコミットは変更ファイルを持たないものとして扱う
            if commit.parent_count() > 1 {
                continue;
            }

            let message = String::from_utf8_lossy(commit.message_bytes());
            if !matcher.is_match(&message) {
                continue;
            }

            let files = changed_paths(&repo, &commit)?;
            if files.is_empty() {
                continue;
            }

            let mut block = commit.time().seconds().to_string();
            for file in files {
                block.push('\n');
                block.push_str(&file);
            }
            blocks.push(block);
        }

        Ok(blocks.join("\n\n"))
    }
}

/// 最初の親とのdiffに現れたパスを列挙します（ルートコミットは空のツリーと比較）
fn changed_paths(repo: &Repository, commit: &Commit) -> Result<Vec<String>, ProviderError> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parent(0) {
        Ok(parent) => Some(parent.tree()?),
        Err(_) => None,
    };

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    Ok(diff
        .deltas()
        .filter_map(|delta| delta.new_file().path_bytes().map(path_string))
        .collect())
}

/// インデックスとdiffのパスを同じ規則で文字列に変換します
fn path_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
