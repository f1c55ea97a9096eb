//! App - アプリケーション層
//!
//! store と scheduler を組み合わせて、外部に公開する操作を実装します。
//!
//! # 主要コンポーネント
//! - **Dispatcher**: scenario の振り分けと status の参照
//! - **CompletionScheduler**: 遅延付きの終端遷移
//! - **ActivityPayload**: 受信リクエストの形

pub mod completion;
pub mod dispatcher;
pub mod payload;

// 主要な型を再エクスポート
pub use self::completion::{COMPLETION_DELAY, Completion, CompletionScheduler};
pub use self::dispatcher::Dispatcher;
pub use self::payload::ActivityPayload;
