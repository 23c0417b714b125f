//! 分析結果の表現を担当するモジュール
//!
//! このモジュールは、ホットスポットを表すデータ構造と、
//! 分析結果のシリアライズに関する機能を提供します。

use serde::Serialize;

/// バグの発生しやすいファイルを表す構造体
///
/// # フィールド
///
/// - `file`: リポジトリルートからの相対パス
/// - `score`: 新しさで重み付けしたバグ修正スコア（常に正の値）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub file: String,
    #[serde(serialize_with = "round_to_4")]
    pub score: f64,
}

/// 浮動小数点数をテキスト出力と同じ4桁に丸める補助関数
fn round_to_4<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64((*value * 10000.0).round() / 10000.0)
}
