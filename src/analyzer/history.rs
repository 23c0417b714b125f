//! 履歴クエリを実行するプロバイダ
//!
//! `HistoryProvider`はリポジトリに対する読み取り専用の問い合わせを抽象化します。
//! どの実装もリポジトリのパスを呼び出しごとに明示的に受け取り、
//! プロセスのカレントディレクトリなどのグローバルな状態は変更しません。

use super::error::ProviderError;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// リポジトリ履歴への読み取り専用クエリ
///
/// 各メソッドは生のテキストを返し、解析は`parser`モジュールが担当します。
pub trait HistoryProvider {
    /// 現在のリビジョンに存在するファイルの改行区切り一覧
    fn head_files(&self, repo: &Path) -> Result<String, ProviderError>;

    /// 最初のコミットの`識別子\nタイムスタンプ`レコード
    fn first_commit_timestamp(&self, repo: &Path) -> Result<String, ProviderError>;

    /// 最新のコミットの`識別子\nタイムスタンプ`レコード
    fn last_commit_timestamp(&self, repo: &Path) -> Result<String, ProviderError>;

    /// メッセージが`pattern`に（大文字小文字を区別せず）一致し、
    /// 変更ファイルを1つ以上持つコミットを空行区切りで返します
    fn matching_commits(&self, repo: &Path, pattern: &str) -> Result<String, ProviderError>;
}

/// `git`コマンドを起動して履歴を取得するプロバイダ
#[derive(Debug, Clone)]
pub struct GitCommand {
    program: PathBuf,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCommand {
    /// 指定された実行ファイルを使うプロバイダを作成します
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `repo`をカレントディレクトリとしてgitを実行します
    ///
    /// パスが引用符付きでエスケープされないよう`core.quotePath=false`を常に指定します。
    fn output(&self, repo: &Path, args: &[&str]) -> Result<Output, ProviderError> {
        debug!("running {} {:?} in {}", self.program.display(), args, repo.display());

        Ok(Command::new(&self.program)
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .current_dir(repo)
            .output()?)
    }

    /// gitを実行し、前後の空白を除いた標準出力を返します
    ///
    /// # エラー
    ///
    /// 以下の場合にエラーを返します：
    /// - プロセスの起動に失敗
    /// - 終了ステータスが0以外
    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, ProviderError> {
        let output = self.output(repo, args)?;
        if !output.status.success() {
            return Err(exit_error(&output));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// HEADがコミットを指しているかどうか（コミットが1つもなければ`false`）
    fn has_head(&self, repo: &Path) -> Result<bool, ProviderError> {
        let output = self.output(repo, &["rev-parse", "--verify", "--quiet", "HEAD"])?;
        match output.status.code() {
            Some(0) => Ok(true),
            // --quietの場合、参照が解決できないときだけ1で終了する
            Some(1) => Ok(false),
            _ => Err(exit_error(&output)),
        }
    }

    /// HEADが未生成なら空のテキスト、そうでなければ`args`の出力を返します
    fn run_from_head(&self, repo: &Path, args: &[&str]) -> Result<String, ProviderError> {
        if !self.has_head(repo)? {
            debug!("{} has no commits", repo.display());
            return Ok(String::new());
        }
        self.run(repo, args)
    }
}

fn exit_error(output: &Output) -> ProviderError {
    ProviderError::Exit {
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

impl HistoryProvider for GitCommand {
    fn head_files(&self, repo: &Path) -> Result<String, ProviderError> {
        // サブディレクトリから実行してもワークツリー全体をルートからのパスで列挙する
        self.run(repo, &["ls-files", "--full-name", "--", ":/"])
    }

    fn first_commit_timestamp(&self, repo: &Path) -> Result<String, ProviderError> {
        self.run_from_head(repo, &["rev-list", "--max-parents=0", "--format=%ct", "HEAD"])
    }

    fn last_commit_timestamp(&self, repo: &Path) -> Result<String, ProviderError> {
        self.run_from_head(repo, &["rev-list", "--max-count=1", "--format=%ct", "HEAD"])
    }

    fn matching_commits(&self, repo: &Path, pattern: &str) -> Result<String, ProviderError> {
        let grep = format!("--grep={}", pattern);
        // --diff-filterでファイル変更のないコミット（マージなど）を除外
        self.run_from_head(
            repo,
            &[
                "log",
                "--diff-filter=ACDMRTUXB",
                "-E",
                "-i",
                &grep,
                "--format=format:%ct",
                "--name-only",
            ],
        )
    }
}
