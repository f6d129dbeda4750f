//! モジュールツリー操作のエラー型

use thiserror::Error;

/// モジュールツリーへの登録・参照時のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModuleError {
    /// ローカル名は空でなく、区切り文字 `.` を含まないこと
    #[error("invalid local name {name:?}: names must be non-empty and must not contain '.'")]
    InvalidName { name: String },

    /// 指定パスにサブモジュールが存在しない
    #[error("no submodule at path {path:?}")]
    MissingSubmodule { path: String },

    /// 指定パスにパラメータが存在しない
    #[error("no parameter at path {path:?}")]
    MissingParameter { path: String },

    /// 属性が存在しないか、型が異なる
    #[error("missing attribute {name:?}")]
    MissingAttribute { name: String },

    /// 入力長が層の入力特徴数と一致しない
    #[error("input size mismatch: expected {expected}, got {actual}")]
    InputSize { expected: usize, actual: usize },

    /// 重みの初期化範囲が有限でない、または大きすぎる
    #[error("invalid init range {value}: must be finite with magnitude at most f64::MAX / 2")]
    InvalidInitRange { value: f64 },
}

pub type Result<T> = std::result::Result<T, ModuleError>;
