//! 수익률/변동성 클러스터링 테이블 작업.

use std::time::Instant;
use stock_analytics::{cluster_tickers, ClusteringParams, PriceMatrix};
use stock_core::{ClusterAssignment, RawSeries};
use stock_data::{CellValue, Column, ColumnType, PriceStore, TableFrame};
use tracing::debug;

use super::publish::publish;
use super::CLUSTERING_TABLE;
use crate::error::Result;
use crate::stats::TaskStats;

/// 클러스터 결과를 테이블로 변환합니다.
pub fn clustering_frame(assignments: &[ClusterAssignment]) -> Result<TableFrame> {
    let mut frame = TableFrame::new(
        CLUSTERING_TABLE,
        vec![
            Column::new("ticker", ColumnType::Text),
            Column::new("returns", ColumnType::Float),
            Column::new("volatility", ColumnType::Float),
            Column::new("cluster", ColumnType::Integer),
        ],
    );

    for assignment in assignments {
        frame.push_row(vec![
            CellValue::Text(assignment.ticker.clone()),
            CellValue::Float(assignment.returns),
            CellValue::Float(assignment.volatility),
            CellValue::Integer(assignment.cluster as i64),
        ])?;
    }

    Ok(frame)
}

/// 클러스터링 계산 및 게시.
pub async fn run_clustering<S>(
    store: &S,
    series: &RawSeries,
    params: &ClusteringParams,
) -> Result<TaskStats>
where
    S: PriceStore + ?Sized,
{
    let start = Instant::now();

    let prices = PriceMatrix::from_series(series);
    let assignments = cluster_tickers(&prices, params);
    debug!(
        tickers = assignments.len(),
        clusters = assignments
            .iter()
            .map(|a| a.cluster)
            .max()
            .map_or(0, |m| m + 1),
        "클러스터링 계산 완료"
    );

    let frame = clustering_frame(&assignments)?;
    let outcome = publish(store, &frame).await?;

    Ok(TaskStats {
        total: assignments.len(),
        success: assignments.len(),
        tables_published: usize::from(outcome.is_replaced()),
        rows_written: outcome.rows(),
        elapsed: start.elapsed(),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clustering_frame() {
        let frame = clustering_frame(&[ClusterAssignment {
            ticker: "FPT".to_string(),
            returns: 0.25,
            volatility: 0.3,
            cluster: 2,
        }])
        .unwrap();

        assert_eq!(frame.len(), 1);
        assert_eq!(frame.cell(0, "cluster"), Some(&CellValue::Integer(2)));
        assert_eq!(frame.cell(0, "returns").and_then(|c| c.as_float()), Some(0.25));
    }
}
