//! 상관행렬 테이블 작업.

use std::time::Instant;
use stock_analytics::{correlation_matrix, CorrelationMatrix, PriceMatrix};
use stock_core::RawSeries;
use stock_data::{CellValue, Column, ColumnType, PriceStore, TableFrame};
use tracing::debug;

use super::publish::publish;
use super::CORRELATION_TABLE;
use crate::error::Result;
use crate::stats::TaskStats;

/// 상관행렬을 테이블로 변환합니다.
///
/// 첫 컬럼은 `ticker`, 이후 종목마다 하나의 실수 컬럼입니다.
pub fn correlation_frame(matrix: &CorrelationMatrix) -> Result<TableFrame> {
    let mut columns = vec![Column::new("ticker", ColumnType::Text)];
    columns.extend(
        matrix
            .symbols
            .iter()
            .map(|s| Column::new(s.as_str(), ColumnType::Float)),
    );

    let mut frame = TableFrame::new(CORRELATION_TABLE, columns);
    for (symbol, row) in matrix.symbols.iter().zip(&matrix.matrix) {
        let mut cells = Vec::with_capacity(row.len() + 1);
        cells.push(CellValue::Text(symbol.clone()));
        cells.extend(row.iter().map(|v| CellValue::Float(*v)));
        frame.push_row(cells)?;
    }

    Ok(frame)
}

/// 상관행렬 계산 및 게시.
pub async fn run_correlation<S>(store: &S, series: &RawSeries) -> Result<TaskStats>
where
    S: PriceStore + ?Sized,
{
    let start = Instant::now();

    let prices = PriceMatrix::from_series(series);
    let matrix = correlation_matrix(&prices);
    debug!(
        tickers = matrix.len(),
        period = matrix.period,
        "상관행렬 계산 완료"
    );

    let frame = correlation_frame(&matrix)?;
    let outcome = publish(store, &frame).await?;

    Ok(TaskStats {
        total: matrix.len(),
        success: matrix.len(),
        tables_published: usize::from(outcome.is_replaced()),
        rows_written: outcome.rows(),
        elapsed: start.elapsed(),
        ..Default::default()
    })
}
