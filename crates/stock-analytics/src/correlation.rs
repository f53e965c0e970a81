//! 상관계수 계산 모듈.
//!
//! 종목 간 종가의 Pearson 상관계수 행렬을 계산합니다.
//! 각 종목 쌍은 두 종목이 모두 관측된 시각만 사용합니다.

use serde::{Deserialize, Serialize};

use crate::pivot::PriceMatrix;

/// 상관행렬 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// 종목 목록 (행/열 순서)
    pub symbols: Vec<String>,
    /// 상관계수 행렬 (N×N, -1.0 ~ 1.0)
    pub matrix: Vec<Vec<f64>>,
    /// 분석 기간 (행렬의 시각 수)
    pub period: usize,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// 두 종목 간 상관계수.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.matrix[i][j])
    }

    /// 대칭 여부 (허용 오차 1e-12).
    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| (0..n).all(|j| (self.matrix[i][j] - self.matrix[j][i]).abs() < 1e-12))
    }
}

/// Pearson 상관계수 계산.
///
/// # 반환
///
/// 상관계수 (-1.0 ~ 1.0), 데이터 부족 또는 분산 0이면 None
pub fn calculate_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;

    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // 표준편차가 0인 경우 (변동 없음)
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let corr = cov / (var_x.sqrt() * var_y.sqrt());
    // 부동소수 오차로 범위를 살짝 넘는 경우 보정
    corr.is_finite().then(|| corr.clamp(-1.0, 1.0))
}

/// 가격 시계열을 수익률로 변환.
///
/// 이전 가격이 0이면 해당 수익률은 0.0입니다.
///
/// # 반환
///
/// 기간 수익률 벡터 (길이: prices.len() - 1)
pub fn prices_to_returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < 2 {
        return Vec::new();
    }

    prices
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                0.0
            } else {
                (w[1] - w[0]) / w[0]
            }
        })
        .collect()
}

/// 가격 행렬로부터 종목 간 상관행렬 계산.
///
/// - 대각 원소는 항상 1.0
/// - 공통 관측이 2개 미만이거나 한쪽 분산이 0이면 0.0
pub fn correlation_matrix(prices: &PriceMatrix) -> CorrelationMatrix {
    let n = prices.n_cols();
    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let (x, y) = prices.pairwise_complete(i, j);
            let corr = calculate_correlation(&x, &y).unwrap_or(0.0);
            matrix[i][j] = corr;
            matrix[j][i] = corr;
        }
    }

    CorrelationMatrix {
        symbols: prices.tickers().to_vec(),
        matrix,
        period: prices.n_rows(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use stock_core::{PricePoint, RawSeries};

    fn series(columns: &[(&str, &[f64])]) -> RawSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut points = Vec::new();
        for (ticker, closes) in columns {
            for (i, close) in closes.iter().enumerate() {
                points.push(PricePoint::new(
                    base + Duration::days(i as i64),
                    *ticker,
                    Decimal::from_f64(*close).unwrap(),
                    None,
                ));
            }
        }
        RawSeries::new(points)
    }

    #[test]
    fn test_correlation_perfect_positive() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        let corr = calculate_correlation(&x, &y).unwrap();
        assert!((corr - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_correlation_perfect_negative() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![10.0, 8.0, 6.0, 4.0, 2.0];
        let corr = calculate_correlation(&x, &y).unwrap();
        assert!((corr + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_correlation_insufficient_or_flat() {
        assert!(calculate_correlation(&[1.0], &[2.0]).is_none());
        assert!(calculate_correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn test_prices_to_returns() {
        let returns = prices_to_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 0.1).abs() < 1e-12);

        // 이전 가격 0
        assert_eq!(prices_to_returns(&[0.0, 5.0]), vec![0.0]);
        assert!(prices_to_returns(&[1.0]).is_empty());
    }

    #[test]
    fn test_identical_tickers_correlate_fully() {
        let closes = [10.0, 12.0, 11.0, 15.0];
        let matrix = correlation_matrix(&PriceMatrix::from_series(&series(&[
            ("A", &closes),
            ("B", &closes),
        ])));

        assert_eq!(matrix.symbols, vec!["A", "B"]);
        assert!((matrix.get("A", "B").unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(matrix.get("A", "A"), Some(1.0));
        assert!(matrix.is_symmetric());
    }

    #[test]
    fn test_flat_ticker_yields_zero_off_diagonal() {
        let matrix = correlation_matrix(&PriceMatrix::from_series(&series(&[
            ("FLAT", &[5.0, 5.0, 5.0]),
            ("MOVE", &[1.0, 2.0, 3.0]),
        ])));

        assert_eq!(matrix.get("FLAT", "MOVE"), Some(0.0));
        assert_eq!(matrix.get("FLAT", "FLAT"), Some(1.0));
    }

    #[test]
    fn test_single_ticker() {
        let matrix =
            correlation_matrix(&PriceMatrix::from_series(&series(&[("ONLY", &[1.0, 2.0])])));
        assert_eq!(matrix.matrix, vec![vec![1.0]]);
        assert_eq!(matrix.period, 2);
    }
}
