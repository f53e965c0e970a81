//! 시간 × 종목 가격 행렬.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use stock_core::RawSeries;

/// 시간(행) × 종목(열) 종가 행렬.
///
/// 종목이 관측되지 않은 시각은 `None`입니다.
/// 같은 (종목, 시각)에 여러 행이 있으면 평균을 사용합니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceMatrix {
    tickers: Vec<String>,
    times: Vec<DateTime<Utc>>,
    cells: Vec<Vec<Option<f64>>>,
}

impl PriceMatrix {
    /// 원시 시계열로부터 행렬 생성. 행은 시간, 열은 종목 코드 오름차순.
    pub fn from_series(series: &RawSeries) -> Self {
        // 정렬된 종목 목록 (열 순서)
        let tickers = series.tickers();
        let n_cols = tickers.len();

        // 시각별 (합, 개수)
        let mut rows: BTreeMap<DateTime<Utc>, Vec<(f64, u32)>> = BTreeMap::new();
        for point in series.points() {
            let Ok(col) = tickers.binary_search(&point.ticker) else {
                continue;
            };
            let close = point.close_f64();
            if !close.is_finite() {
                continue;
            }
            let row = rows
                .entry(point.time)
                .or_insert_with(|| vec![(0.0, 0); n_cols]);
            row[col].0 += close;
            row[col].1 += 1;
        }

        let mut times = Vec::with_capacity(rows.len());
        let mut cells = Vec::with_capacity(rows.len());
        for (time, row) in rows {
            times.push(time);
            cells.push(
                row.into_iter()
                    .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
                    .collect(),
            );
        }

        Self {
            tickers,
            times,
            cells,
        }
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn n_rows(&self) -> usize {
        self.times.len()
    }

    pub fn n_cols(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty() || self.times.is_empty()
    }

    /// (행, 열) 셀 값.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// 한 열에서 관측된 값만 시간순으로.
    pub fn observed(&self, col: usize) -> Vec<f64> {
        self.cells
            .iter()
            .filter_map(|row| row.get(col).copied().flatten())
            .collect()
    }

    /// 한 열을 첫 관측 행부터 끝까지, 빈 셀은 직전 관측값으로 채워서.
    ///
    /// 첫 관측 이전 행은 포함하지 않습니다.
    pub fn forward_filled(&self, col: usize) -> Vec<f64> {
        let mut last = None;
        self.cells
            .iter()
            .filter_map(|row| {
                if let Some(value) = row.get(col).copied().flatten() {
                    last = Some(value);
                }
                last
            })
            .collect()
    }

    /// 두 열이 모두 관측된 행의 값 쌍.
    pub fn pairwise_complete(&self, a: usize, b: usize) -> (Vec<f64>, Vec<f64>) {
        self.cells
            .iter()
            .filter_map(|row| match (row.get(a).copied().flatten(), row.get(b).copied().flatten()) {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            })
            .unzip()
    }
}
