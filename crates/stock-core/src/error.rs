//! 도메인 타입의 에러 정의.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Parse("hourly".to_string());
        assert_eq!(err.to_string(), "파싱 에러: hourly");
    }
}
