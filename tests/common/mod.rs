use git2::{Commit, Repository, Signature, Time};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// テスト用のリポジトリを作成し、各コミットの日時を固定します
pub struct FixtureRepo {
    pub dir: TempDir,
    repo: Repository,
}

impl FixtureRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let repo = Repository::init(dir.path()).expect("Failed to init test repository");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `files`を書き換えて`seconds`時点のコミットを作成します
    pub fn commit(&self, files: &[&str], message: &str, seconds: i64) {
        let mut index = self.repo.index().unwrap();
        for file in files {
            let path = self.path().join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, format!("{} @ {}\n", message, seconds)).unwrap();
            index.add_path(Path::new(file)).unwrap();
        }
        index.write().unwrap();

        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::new("dev", "dev@example.com", &Time::new(seconds, 0)).unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    /// `file`をインデックスと作業ツリーから削除します（コミットは作成しません）
    #[allow(dead_code)]
    pub fn remove(&self, file: &str) {
        let mut index = self.repo.index().unwrap();
        index.remove_path(Path::new(file)).unwrap();
        index.write().unwrap();
        fs::remove_file(self.path().join(file)).unwrap();
    }
}

/// 3件のバグ修正コミットを含むリポジトリ
///
/// 期待されるランキング: c.rs (0.0474), a.rs (0.0026), b.rs (0.0025)
pub fn bug_fix_history() -> FixtureRepo {
    let fixture = FixtureRepo::new();
    fixture.commit(&["a.rs", "b.rs", "c.rs", "docs/readme.md"], "initial import", 1000);
    fixture.commit(&["a.rs"], "Fixes #1", 2000);
    fixture.commit(&["a.rs", "b.rs"], "fix #2: crash on empty input", 3000);
    fixture.commit(&["c.rs"], "closes gh-3", 4000);
    fixture.commit(&["b.rs"], "refactor", 5000);
    fixture
}

/// 非ASCIIのファイル名とサブディレクトリを含むリポジトリ
///
/// 期待されるランキング: sub/hé.rs (0.5), sub/x.rs (0.0474)
#[allow(dead_code)]
pub fn nested_unicode_history() -> FixtureRepo {
    let fixture = FixtureRepo::new();
    fixture.commit(&["sub/x.rs", "sub/hé.rs", "top.rs"], "initial import", 1000);
    fixture.commit(&["sub/x.rs"], "fixes #4", 4000);
    fixture.commit(&["sub/hé.rs"], "closes #5", 5000);
    fixture
}
