//! 가격/거래량 분포 테이블 작업.
//!
//! 원시 시계열 (time, ticker, close, volume)을 그대로 게시합니다.

use std::time::Instant;
use stock_core::RawSeries;
use stock_data::{CellValue, Column, ColumnType, PriceStore, TableFrame};

use super::publish::publish;
use super::DISTRIBUTION_TABLE;
use crate::error::Result;
use crate::stats::TaskStats;

/// 원시 시계열을 분포 테이블로 변환합니다.
pub fn distribution_frame(series: &RawSeries) -> Result<TableFrame> {
    let mut frame = TableFrame::new(
        DISTRIBUTION_TABLE,
        vec![
            Column::new("time", ColumnType::Timestamp),
            Column::new("ticker", ColumnType::Text),
            Column::new("close", ColumnType::Float),
            Column::new("volume", ColumnType::Integer),
        ],
    );

    for point in series.points() {
        frame.push_row(vec![
            CellValue::Timestamp(point.time),
            CellValue::Text(point.ticker.clone()),
            CellValue::Float(point.close_f64()),
            CellValue::from(point.volume),
        ])?;
    }

    Ok(frame)
}

/// 분포 테이블 계산 및 게시.
pub async fn run_distribution<S>(store: &S, series: &RawSeries) -> Result<TaskStats>
where
    S: PriceStore + ?Sized,
{
    let start = Instant::now();
    let frame = distribution_frame(series)?;
    let outcome = publish(store, &frame).await?;

    let tickers = series.tickers().len();
    Ok(TaskStats {
        total: tickers,
        success: tickers,
        tables_published: usize::from(outcome.is_replaced()),
        rows_written: outcome.rows(),
        elapsed: start.elapsed(),
        ..Default::default()
    })
}
