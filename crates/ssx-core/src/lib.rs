//! ssx-core
//!
//! In-memory job/record store behind the provisioning API simulator.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（record, fields, scenario, errors）
//! - **ports**: 抽象化レイヤー（HandleGenerator）
//! - **store**: ジョブとリファレンスのキー空間、レコード単位のロック
//! - **app**: Dispatcher, CompletionScheduler, ActivityPayload
//! - **observability**: status views

pub mod app;
pub mod domain;
pub mod observability;
pub mod ports;
pub mod store;

pub use app::{ActivityPayload, COMPLETION_DELAY, Dispatcher};
pub use domain::{FieldBag, IoEntry, JobRecord, RecordStatus, Scenario, SimulatorError};
