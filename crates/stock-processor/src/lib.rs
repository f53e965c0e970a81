//! 주가 차트 파생 테이블 배치 프로세서.
//!
//! 이 crate는 원시 가격 테이블로부터 다음 테이블을 주기적으로 다시 계산합니다:
//! - 월간 추세 / 계절성 (`trend_table`, `seasonal_table`)
//! - 가격/거래량 분포 (`distribution_table`)
//! - 종목 간 상관행렬 (`correlation_table`)
//! - 다음 기간 가격 예측 (`prediction_table`)
//! - 수익률/변동성 클러스터링 (`clustering_table`)

pub mod config;
pub mod error;
pub mod scheduler;
pub mod stats;
pub mod tasks;

pub use config::{ClusteringCadence, ProcessorConfig};
pub use error::{ProcessorError, Result};
pub use scheduler::{CycleReport, Scheduler, SchedulerState, TaskOutcome};
pub use stats::TaskStats;
pub use tasks::Task;
