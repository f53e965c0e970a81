//! 원시 가격 시계열 로딩.

use std::time::Instant;
use stock_core::RawSeries;
use tracing::{info, warn};

use crate::store::{PriceStore, RawFilter};

/// 원시 가격 테이블 전체를 읽어 시간순으로 정렬된 시계열을 반환합니다.
///
/// 읽기 실패는 전파하지 않고 빈 시계열을 반환합니다.
/// 호출 측은 빈 시계열을 "할 일 없음"으로 처리해야 합니다.
pub async fn load_raw<S>(store: &S, filter: &RawFilter) -> RawSeries
where
    S: PriceStore + ?Sized,
{
    let start = Instant::now();

    match store.fetch_raw(filter).await {
        Ok(points) => {
            let series = RawSeries::new(points);
            info!(
                rows = series.len(),
                tickers = series.tickers().len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "원시 가격 로드 완료"
            );
            series
        }
        Err(e) => {
            warn!(error = %e, "원시 가격 로드 실패, 빈 시계열로 진행");
            RawSeries::empty()
        }
    }
}
