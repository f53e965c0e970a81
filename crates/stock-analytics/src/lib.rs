//! # Stock Analytics
//!
//! 원시 가격 시계열에서 파생 테이블을 계산하는 순수 함수 모음입니다.
//!
//! - [`aggregate`]: 일간/주간/월간 리샘플링 및 추세 테이블
//! - [`predictor`]: 선형 추세 기반 다음 기간 가격 예측
//! - [`pivot`]: 시간 × 종목 가격 행렬
//! - [`correlation`]: 종목 간 상관행렬
//! - [`clustering`]: 수익률/변동성 k-means 클러스터링
//!
//! I/O는 하지 않으며, 저장과 스케줄링은 `stock-processor`가 담당합니다.

pub mod aggregate;
pub mod clustering;
pub mod correlation;
pub mod error;
pub mod pivot;
pub mod predictor;

pub use aggregate::{aggregate, build_trend, resample, AggregatedSeries};
pub use clustering::{
    annualized_stats, cluster_tickers, ClusteringParams, KMeans, KMeansResult, TickerStats,
    TRADING_DAYS_PER_YEAR,
};
pub use correlation::{
    calculate_correlation, correlation_matrix, prices_to_returns, CorrelationMatrix,
};
pub use error::{AnalyticsError, AnalyticsResult};
pub use pivot::PriceMatrix;
pub use predictor::{
    fit_linear_trend, predict, predict_all, round_price, LinearFit, PredictionBatch,
    MIN_PREDICTION_POINTS,
};
