//! Ports - 抽象化レイヤー
//!
//! 差し替え可能な外部依存（乱数による handle 生成など）を trait として定義します。

pub mod handle_generator;

pub use self::handle_generator::{
    HandleGenerator, RandomHandleGenerator, SequentialHandleGenerator,
};
