//! 추세/계절성 테이블 작업.
//!
//! 종목별 월간 평균을 이어 붙인 같은 결과를 `trend_table`과
//! `seasonal_table` 두 곳에 게시합니다.

use std::time::Instant;
use stock_analytics::build_trend;
use stock_core::{AggregatedPoint, RawSeries};
use stock_data::{CellValue, Column, ColumnType, PriceStore, TableFrame};
use tracing::debug;

use super::publish::publish;
use super::{SEASONAL_TABLE, TREND_TABLE};
use crate::error::Result;
use crate::stats::TaskStats;

/// 집계 포인트를 테이블로 변환합니다.
pub fn aggregated_frame(table: &str, points: &[AggregatedPoint]) -> Result<TableFrame> {
    let mut frame = TableFrame::new(
        table,
        vec![
            Column::new("time", ColumnType::Timestamp),
            Column::new("ticker", ColumnType::Text),
            Column::new("close", ColumnType::Float),
            Column::new("granularity", ColumnType::Text),
        ],
    );

    for point in points {
        frame.push_row(vec![
            CellValue::Timestamp(point.time),
            CellValue::Text(point.ticker.clone()),
            CellValue::Float(point.close),
            CellValue::Text(point.granularity.as_str().to_string()),
        ])?;
    }

    Ok(frame)
}

/// 추세/계절성 테이블 계산 및 게시.
///
/// 두 테이블은 각각 독립적으로 게시되며, 하나가 실패해도 다른 하나는 시도합니다.
pub async fn run_trend<S>(store: &S, series: &RawSeries) -> Result<TaskStats>
where
    S: PriceStore + ?Sized,
{
    let start = Instant::now();
    let mut stats = TaskStats::new();

    let points = build_trend(series);
    let tickers = series.tickers();
    stats.total = tickers.len();
    stats.success = tickers
        .iter()
        .filter(|t| points.iter().any(|p| &p.ticker == *t))
        .count();
    debug!(points = points.len(), "월간 추세 계산 완료");

    let trend = aggregated_frame(TREND_TABLE, &points)?;
    let seasonal = trend.renamed(SEASONAL_TABLE);

    let mut first_error = None;
    for frame in [&trend, &seasonal] {
        match publish(store, frame).await {
            Ok(outcome) => {
                if outcome.is_replaced() {
                    stats.tables_published += 1;
                }
                stats.rows_written += outcome.rows();
            }
            Err(e) => {
                stats.errors += 1;
                first_error.get_or_insert(e);
            }
        }
    }

    stats.elapsed = start.elapsed();
    match first_error {
        Some(e) => Err(e),
        None => Ok(stats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use stock_core::PricePoint;
    use stock_data::MemoryPriceStore;

    fn series() -> RawSeries {
        RawSeries::new(vec![
            PricePoint::new(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(), "HPG", dec!(10), None),
            PricePoint::new(Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap(), "HPG", dec!(20), None),
            PricePoint::new(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(), "FPT", dec!(7), None),
        ])
    }

    #[tokio::test]
    async fn test_trend_and_seasonal_are_identical() {
        let store = MemoryPriceStore::new();
        let stats = run_trend(&store, &series()).await.unwrap();

        assert_eq!(stats.tables_published, 2);
        assert_eq!(stats.rows_written, 4);

        let trend = store.table(TREND_TABLE).unwrap();
        let seasonal = store.table(SEASONAL_TABLE).unwrap();
        assert_eq!(trend.rows(), seasonal.rows());
        assert_eq!(trend.cell(0, "ticker").and_then(|c| c.as_text()), Some("FPT"));
        assert_eq!(trend.cell(1, "close").and_then(|c| c.as_float()), Some(15.0));
        assert_eq!(
            trend.cell(1, "granularity").and_then(|c| c.as_text()),
            Some("monthly")
        );
    }

    #[tokio::test]
    async fn test_seasonal_published_when_trend_fails() {
        let store = MemoryPriceStore::new();
        store.fail_writes_for(TREND_TABLE);

        let result = run_trend(&store, &series()).await;
        assert!(result.is_err());
        assert!(store.table(TREND_TABLE).is_none());
        assert_eq!(store.table(SEASONAL_TABLE).unwrap().len(), 2);
    }
}
