//! 원시 가격 데이터 타입.
//!
//! `raw_stock_prices` 테이블의 한 행이 [`PricePoint`]이며,
//! 한 사이클 동안 읽어 들인 전체 행 집합이 [`RawSeries`]입니다.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 일별 종가 한 건.
///
/// (ticker, time) 유일성은 보장되지 않습니다. 중복 행이 있을 수 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 시각
    pub time: DateTime<Utc>,
    /// 종목 코드
    pub ticker: String,
    /// 종가
    pub close: Decimal,
    /// 거래량 (원본에 없으면 None)
    pub volume: Option<i64>,
}

impl PricePoint {
    /// 새 가격 포인트 생성.
    pub fn new(
        time: DateTime<Utc>,
        ticker: impl Into<String>,
        close: Decimal,
        volume: Option<i64>,
    ) -> Self {
        Self {
            time,
            ticker: ticker.into(),
            close,
            volume,
        }
    }

    /// 종가를 f64로 반환 (분석 계산용).
    pub fn close_f64(&self) -> f64 {
        self.close.to_f64().unwrap_or(f64::NAN)
    }
}

/// 시간 오름차순으로 정렬된 전체 원시 시계열.
///
/// 생성 시 안정 정렬하므로 같은 시각의 중복 행은 입력 순서를 유지합니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeries {
    points: Vec<PricePoint>,
}

impl RawSeries {
    /// 가격 포인트를 시간순으로 정렬하여 시계열 생성.
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.time);
        Self { points }
    }

    /// 빈 시계열.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 전체 포인트 (시간 오름차순).
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 시계열에 존재하는 종목 코드 (오름차순, 중복 없음).
    pub fn tickers(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.ticker.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// 특정 종목의 포인트 (시간 오름차순).
    pub fn for_ticker<'a>(&'a self, ticker: &'a str) -> impl Iterator<Item = &'a PricePoint> + 'a {
        self.points.iter().filter(move |p| p.ticker == ticker)
    }

}

impl From<Vec<PricePoint>> for RawSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn point(day: u32, ticker: &str, close: Decimal) -> PricePoint {
        let time = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        PricePoint::new(time, ticker, close, Some(1000))
    }

    #[test]
    fn test_raw_series_sorted_by_time() {
        let series = RawSeries::new(vec![
            point(3, "HPG", dec!(30)),
            point(1, "FPT", dec!(10)),
            point(2, "HPG", dec!(20)),
        ]);

        let days: Vec<u32> = series
            .points()
            .iter()
            .map(|p| chrono::Datelike::day(&p.time))
            .collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[test]
    fn test_tickers_distinct_and_sorted() {
        let series = RawSeries::new(vec![
            point(1, "VCB", dec!(1)),
            point(2, "FPT", dec!(1)),
            point(3, "VCB", dec!(1)),
        ]);
        assert_eq!(series.tickers(), vec!["FPT", "VCB"]);
        assert_eq!(series.for_ticker("VCB").count(), 2);
        assert_eq!(series.for_ticker("HPG").count(), 0);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let series = RawSeries::new(vec![point(1, "HPG", dec!(10)), point(1, "HPG", dec!(12))]);
        let closes: Vec<Decimal> = series.for_ticker("HPG").map(|p| p.close).collect();
        assert_eq!(closes, vec![dec!(10), dec!(12)]);
    }

    #[test]
    fn test_empty_series() {
        let series = RawSeries::empty();
        assert!(series.is_empty());
        assert!(series.tickers().is_empty());
    }
}
