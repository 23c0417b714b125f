//! ランキングから上位の一部を選び出すモジュール

use super::error::AnalyzerError;
use super::metrics::Hotspot;

/// 上位選択の設定
///
/// # フィールド
///
/// - `min_count`: 最低限返す件数
/// - `max_count`: 返す件数の上限（`min_count`より優先）
/// - `percentile`: 全体に対して返す割合（%）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionConfig {
    min_count: usize,
    max_count: usize,
    percentile: f64,
}

impl SelectionConfig {
    /// 設定を検証して作成します
    ///
    /// `min_count > max_count`は拒否しません。その場合は`max_count`が優先されます。
    ///
    /// # エラー
    ///
    /// 以下の場合に`AnalyzerError::InvalidConfiguration`を返します：
    /// - `min_count`が負
    /// - `max_count`が0以下
    /// - `percentile`が(0, 100]の範囲外
    pub fn new(min_count: i64, max_count: i64, percentile: f64) -> Result<Self, AnalyzerError> {
        if max_count <= 0 {
            return Err(AnalyzerError::InvalidConfiguration(format!(
                "max count must be greater than zero, got {}",
                max_count
            )));
        }
        let mut config = Self::unbounded_max(min_count, percentile)?;
        config.max_count = usize::try_from(max_count).unwrap_or(usize::MAX);
        Ok(config)
    }

    /// 上限なしの設定を作成します
    pub fn unbounded_max(min_count: i64, percentile: f64) -> Result<Self, AnalyzerError> {
        let min_count = usize::try_from(min_count).map_err(|_| {
            AnalyzerError::InvalidConfiguration(format!(
                "min count must not be negative, got {}",
                min_count
            ))
        })?;

        if !(percentile > 0.0 && percentile <= 100.0) {
            return Err(AnalyzerError::InvalidConfiguration(format!(
                "percentile must be in range (0, 100], got {}",
                percentile
            )));
        }

        Ok(Self {
            min_count,
            max_count: usize::MAX,
            percentile,
        })
    }

    /// `total`件のランキングから返す件数
    pub fn count(&self, total: usize) -> usize {
        let by_percentile = (self.percentile * total as f64 / 100.0).floor() as usize;
        by_percentile
            .max(self.min_count)
            .min(self.max_count)
            .min(total)
    }
}

/// 降順のランキングから先頭の件数分を返します
pub fn select_top(hotspots: &[Hotspot], config: &SelectionConfig) -> Vec<Hotspot> {
    hotspots[..config.count(hotspots.len())].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(n: usize) -> Vec<Hotspot> {
        (0..n)
            .map(|i| Hotspot {
                file: format!("file{}.rs", i),
                score: (n - i) as f64,
            })
            .collect()
    }

    #[test]
    fn test_percentile_selection() {
        let hotspots = ranking(100);
        let config = SelectionConfig::unbounded_max(0, 10.0).unwrap();

        let top = select_top(&hotspots, &config);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].file, "file0.rs");
        assert_eq!(top[9].file, "file9.rs");
    }

    #[test]
    fn test_min_count_raises_selection() {
        let hotspots = ranking(100);
        let config = SelectionConfig::unbounded_max(20, 10.0).unwrap();
        assert_eq!(select_top(&hotspots, &config).len(), 20);
    }

    #[test]
    fn test_max_count_caps_selection() {
        let hotspots = ranking(100);
        for percentile in [5.0, 10.0, 50.0, 100.0] {
            let config = SelectionConfig::new(0, 5, percentile).unwrap();
            assert_eq!(select_top(&hotspots, &config).len(), 5);
        }
    }

    #[test]
    fn test_max_count_never_raises_selection() {
        let hotspots = ranking(100);

        let config = SelectionConfig::new(0, 5, 1.0).unwrap();
        assert_eq!(select_top(&hotspots, &config).len(), 1);

        let config = SelectionConfig::new(0, 50, 10.0).unwrap();
        assert_eq!(select_top(&hotspots, &config).len(), 10);
    }

    #[test]
    fn test_max_count_wins_over_min_count() {
        let config = SelectionConfig::new(30, 5, 10.0).unwrap();
        assert_eq!(config.count(100), 5);
    }

    #[test]
    fn test_never_reads_past_end() {
        let config = SelectionConfig::unbounded_max(50, 10.0).unwrap();
        assert_eq!(select_top(&ranking(3), &config).len(), 3);
        assert!(select_top(&[], &config).is_empty());
    }

    #[test]
    fn test_full_percentile_returns_everything() {
        let hotspots = ranking(37);
        let config = SelectionConfig::new(0, i64::MAX, 100.0).unwrap();
        assert_eq!(select_top(&hotspots, &config), hotspots);
    }

    #[test]
    fn test_percentile_rounds_down() {
        let config = SelectionConfig::unbounded_max(0, 10.0).unwrap();
        assert_eq!(config.count(9), 0);
        assert_eq!(config.count(19), 1);
    }

    #[test]
    fn test_invalid_configuration() {
        let test_cases = [
            (-1, 10, 10.0),
            (0, 0, 10.0),
            (0, -3, 10.0),
            (0, 10, 0.0),
            (0, 10, -5.0),
            (0, 10, 100.5),
            (0, 10, f64::NAN),
        ];

        for (min_count, max_count, percentile) in test_cases {
            let result = SelectionConfig::new(min_count, max_count, percentile);
            assert!(
                matches!(result, Err(AnalyzerError::InvalidConfiguration(_))),
                "({}, {}, {}) should be rejected",
                min_count,
                max_count,
                percentile
            );
        }
    }
}
