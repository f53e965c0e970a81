//! 파생 테이블 작업 모듈.
//!
//! 각 작업은 같은 원시 시계열을 입력으로 받아 테이블을 계산하고 게시합니다.

pub mod clustering;
pub mod correlation;
pub mod distribution;
pub mod prediction;
pub mod publish;
pub mod trend;

use std::fmt;
use std::str::FromStr;
use stock_core::{task_span, RawSeries};
use stock_data::PriceStore;
use tracing::Instrument;

use crate::config::ProcessorConfig;
use crate::error::{ProcessorError, Result};
use crate::stats::TaskStats;

pub use clustering::{clustering_frame, run_clustering};
pub use correlation::{correlation_frame, run_correlation};
pub use distribution::{distribution_frame, run_distribution};
pub use prediction::{prediction_frame, run_prediction};
pub use publish::{publish, PublishOutcome};
pub use trend::{aggregated_frame, run_trend};

pub const TREND_TABLE: &str = "trend_table";
pub const SEASONAL_TABLE: &str = "seasonal_table";
pub const DISTRIBUTION_TABLE: &str = "distribution_table";
pub const CORRELATION_TABLE: &str = "correlation_table";
pub const PREDICTION_TABLE: &str = "prediction_table";
pub const CLUSTERING_TABLE: &str = "clustering_table";

/// 파생 테이블 작업 종류 (사이클 실행 순서).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// 월간 추세 (+ 계절성)
    Trend,
    /// 가격/거래량 분포
    Distribution,
    /// 종목 간 상관행렬
    Correlation,
    /// 다음 기간 가격 예측
    Prediction,
    /// 수익률/변동성 클러스터링
    Clustering,
}

impl Task {
    /// 사이클 실행 순서.
    pub const ALL: [Task; 5] = [
        Self::Trend,
        Self::Distribution,
        Self::Correlation,
        Self::Prediction,
        Self::Clustering,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Trend => "trend",
            Self::Distribution => "distribution",
            Self::Correlation => "correlation",
            Self::Prediction => "prediction",
            Self::Clustering => "clustering",
        }
    }

    /// 작업이 게시하는 테이블 목록.
    pub fn tables(&self) -> &'static [&'static str] {
        match self {
            Self::Trend => &[TREND_TABLE, SEASONAL_TABLE],
            Self::Distribution => &[DISTRIBUTION_TABLE],
            Self::Correlation => &[CORRELATION_TABLE],
            Self::Prediction => &[PREDICTION_TABLE],
            Self::Clustering => &[CLUSTERING_TABLE],
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|task| task.name() == normalized || (*task == Self::Trend && normalized == "seasonal"))
            .ok_or_else(|| ProcessorError::InvalidInput(format!("Unknown task: {}", s)))
    }
}

/// 작업 하나를 실행합니다.
pub async fn run_task<S>(
    task: Task,
    store: &S,
    series: &RawSeries,
    config: &ProcessorConfig,
) -> Result<TaskStats>
where
    S: PriceStore + ?Sized,
{
    let span = task_span!(task.name());
    async {
        match task {
            Task::Trend => run_trend(store, series).await,
            Task::Distribution => run_distribution(store, series).await,
            Task::Correlation => run_correlation(store, series).await,
            Task::Prediction => {
                run_prediction(store, series, config.analytics.prediction_min_points).await
            }
            Task::Clustering => {
                run_clustering(store, series, &config.clustering_params()).await
            }
        }
    }
    .instrument(span)
    .await
}
