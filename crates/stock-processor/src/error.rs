//! 에러 타입 정의.

use stock_analytics::AnalyticsError;
use stock_data::DataError;
use thiserror::Error;

/// Processor 에러 타입
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// 저장소 에러 (읽기/쓰기)
    #[error("Database error: {0}")]
    Database(#[from] DataError),

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 분석 계산 에러
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    /// 알 수 없는 작업 이름 등 잘못된 입력
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, ProcessorError>;
