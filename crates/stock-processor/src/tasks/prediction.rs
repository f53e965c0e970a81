//! 다음 기간 가격 예측 테이블 작업.

use std::time::Instant;
use stock_analytics::predict_all;
use stock_core::{Forecast, RawSeries};
use stock_data::{CellValue, Column, ColumnType, PriceStore, TableFrame};
use tracing::info;

use super::publish::publish;
use super::PREDICTION_TABLE;
use crate::error::Result;
use crate::stats::TaskStats;

/// 예측 결과를 테이블로 변환합니다.
pub fn prediction_frame(forecasts: &[Forecast]) -> Result<TableFrame> {
    let mut frame = TableFrame::new(
        PREDICTION_TABLE,
        vec![
            Column::new("ticker", ColumnType::Text),
            Column::new("today_price", ColumnType::Numeric),
            Column::new("next_price", ColumnType::Numeric),
            Column::new("trend", ColumnType::Text),
        ],
    );

    for forecast in forecasts {
        frame.push_row(vec![
            CellValue::Text(forecast.ticker.clone()),
            CellValue::Numeric(forecast.today_price),
            CellValue::Numeric(forecast.next_price),
            CellValue::Text(forecast.trend.as_str().to_string()),
        ])?;
    }

    Ok(frame)
}

/// 전체 종목 예측 및 게시.
///
/// 관측이 `min_points`개 미만인 종목과 적합에 실패한 종목은 제외됩니다.
pub async fn run_prediction<S>(store: &S, series: &RawSeries, min_points: usize) -> Result<TaskStats>
where
    S: PriceStore + ?Sized,
{
    let start = Instant::now();

    let batch = predict_all(series, min_points);
    if !batch.insufficient.is_empty() {
        info!(
            count = batch.insufficient.len(),
            tickers = ?batch.insufficient,
            required = min_points,
            "데이터 부족 종목 제외"
        );
    }

    let frame = prediction_frame(&batch.forecasts)?;
    let outcome = publish(store, &frame).await?;

    Ok(TaskStats {
        total: batch.forecasts.len() + batch.insufficient.len() + batch.failed.len(),
        success: batch.forecasts.len(),
        errors: batch.failed.len(),
        skipped: batch.insufficient.len(),
        tables_published: usize::from(outcome.is_replaced()),
        rows_written: outcome.rows(),
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stock_core::Trend;

    #[test]
    fn test_prediction_frame() {
        let frame = prediction_frame(&[
            Forecast::new("HPG", dec!(27), dec!(28)),
            Forecast::new("VCB", dec!(90), dec!(90)),
        ])
        .unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.cell(0, "next_price"), Some(&CellValue::Numeric(dec!(28))));
        assert_eq!(
            frame.cell(0, "trend").and_then(|c| c.as_text()),
            Some(Trend::Up.as_str())
        );
        assert_eq!(frame.cell(1, "trend").and_then(|c| c.as_text()), Some("Down"));
    }
}
