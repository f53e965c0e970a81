//! # Stock Core
//!
//! 주가 차트 분석 프로세서의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 워크스페이스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 원시 가격 데이터 (PricePoint, RawSeries)
//! - 파생 테이블 행 타입 (AggregatedPoint, Forecast, ClusterAssignment)
//! - 집계 단위 (Granularity)
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
