//! HandleGenerator port - job handle 生成の抽象化
//!
//! テスト容易性のために trait として抽象化しています。
//!
//! # 実装
//! - **RandomHandleGenerator**: `[1000, 1999)` の乱数（本番用）
//! - **SequentialHandleGenerator**: 連番（テスト用、決定的）

use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;

/// Lowest handle value (inclusive).
pub const HANDLE_MIN: u32 = 1000;

/// Upper bound of handle values (exclusive).
pub const HANDLE_MAX: u32 = 1999;

/// HandleGenerator は job handle を生成
///
/// 一意性は保証しません。衝突した handle は既存レコードを再利用します。
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数のリクエストから同時に使える）
pub trait HandleGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniform random handles in `[HANDLE_MIN, HANDLE_MAX)`.
///
/// Not suitable for anything security-sensitive.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomHandleGenerator;

impl RandomHandleGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl HandleGenerator for RandomHandleGenerator {
    fn generate(&self) -> String {
        rand::thread_rng()
            .gen_range(HANDLE_MIN..HANDLE_MAX)
            .to_string()
    }
}

/// Deterministic handles counting up from a starting value.
#[derive(Debug)]
pub struct SequentialHandleGenerator {
    next: AtomicU32,
}

impl SequentialHandleGenerator {
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }
}

impl Default for SequentialHandleGenerator {
    fn default() -> Self {
        Self::starting_at(HANDLE_MIN)
    }
}

impl HandleGenerator for SequentialHandleGenerator {
    fn generate(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
