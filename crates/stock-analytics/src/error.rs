//! 분석 모듈 에러 타입.

use thiserror::Error;

/// 분석 계산 에러.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// 데이터 부족
    #[error("데이터 부족: 최소 {required}개 필요, {provided}개 제공")]
    InsufficientData { required: usize, provided: usize },

    /// NaN 또는 무한대 값
    #[error("유한하지 않은 값: {0}")]
    NonFinite(String),

    /// 모델 적합 실패 (분산 0 등)
    #[error("모델 적합 실패: {0}")]
    DegenerateFit(String),
}

/// 분석 작업을 위한 Result 타입.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
