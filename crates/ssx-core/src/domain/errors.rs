//! Errors - ドメインエラー
//!
//! 未知の handle の参照だけがドメインエラーです。
//! シリアライズ失敗や未知の scenario はエラーにせず、ログに残して処理を続けます。

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulatorError {
    #[error("requested id does not exist: {0}")]
    NotFound(String),
}
