//! 파생 테이블 게시.
//!
//! 테이블 단위로 통째 교체합니다. 빈 결과는 게시하지 않아
//! 이전 사이클의 테이블이 그대로 남습니다.

use std::time::Instant;
use stock_data::{PriceStore, TableFrame};
use tracing::{error, info};

use crate::error::Result;

/// 게시 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// 테이블 교체 완료
    Replaced { rows: u64 },
    /// 빈 결과로 건너뜀
    Skipped,
}

impl PublishOutcome {
    pub fn rows(&self) -> u64 {
        match self {
            Self::Replaced { rows } => *rows,
            Self::Skipped => 0,
        }
    }

    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }
}

/// 테이블을 교체합니다.
///
/// 실패는 호출한 작업으로 반환되며 다른 테이블에는 영향을 주지 않습니다.
pub async fn publish<S>(store: &S, frame: &TableFrame) -> Result<PublishOutcome>
where
    S: PriceStore + ?Sized,
{
    if frame.is_empty() {
        info!(table = frame.name(), "빈 결과, 게시 건너뜀");
        return Ok(PublishOutcome::Skipped);
    }

    let start = Instant::now();
    match store.replace_table(frame).await {
        Ok(rows) => {
            info!(
                table = frame.name(),
                rows,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "테이블 게시 완료"
            );
            Ok(PublishOutcome::Replaced { rows })
        }
        Err(e) => {
            error!(table = frame.name(), error = %e, "테이블 게시 실패");
            Err(e.into())
        }
    }
}
