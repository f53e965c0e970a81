//! 가격 저장소 추상화.
//!
//! 분석 코어는 원시 테이블 읽기와 파생 테이블 교체 두 가지 연산만 사용합니다.

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use stock_core::{parse_ticker_list, PricePoint};

use crate::error::Result;
use crate::table::TableFrame;

/// 원시 시계열 조회 필터.
///
/// 모든 조건은 바인딩 파라미터로 전달됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFilter {
    /// 대상 종목 (비어 있으면 전체)
    pub tickers: Vec<String>,
    /// 시작일 (포함)
    pub start: Option<NaiveDate>,
    /// 종료일 (해당 일 전체 포함)
    pub end: Option<NaiveDate>,
}

impl RawFilter {
    /// 전체 조회.
    pub fn all() -> Self {
        Self::default()
    }

    /// 쉼표로 구분된 종목 목록으로 필터 생성.
    pub fn with_symbols(mut self, symbols: &str) -> Self {
        self.tickers = parse_ticker_list(symbols);
        self
    }

    /// 날짜 범위 설정.
    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.tickers.is_empty() && self.start.is_none() && self.end.is_none()
    }

    /// 시작 시각 하한 (포함).
    pub fn lower_bound(&self) -> Option<DateTime<Utc>> {
        self.start.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// 종료 시각 상한 (미포함, 종료일 다음 날 00:00).
    pub fn upper_bound(&self) -> Option<DateTime<Utc>> {
        self.end
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// 메모리 상의 포인트가 필터를 통과하는지 확인합니다.
    pub fn matches(&self, point: &PricePoint) -> bool {
        if !self.tickers.is_empty() && !self.tickers.iter().any(|t| *t == point.ticker) {
            return false;
        }
        if let Some(lower) = self.lower_bound() {
            if point.time < lower {
                return false;
            }
        }
        if let Some(upper) = self.upper_bound() {
            if point.time >= upper {
                return false;
            }
        }
        true
    }
}

/// 가격 저장소.
///
/// 테이블 교체는 읽는 쪽에서 볼 때 원자적이어야 합니다.
/// 여러 테이블에 걸친 원자성은 요구하지 않습니다.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// 원시 가격 행 조회 (순서 보장 없음).
    async fn fetch_raw(&self, filter: &RawFilter) -> Result<Vec<PricePoint>>;

    /// 테이블 전체를 `frame` 내용으로 교체하고 기록된 행 수를 반환합니다.
    async fn replace_table(&self, frame: &TableFrame) -> Result<u64>;

    /// 저장소 응답 확인.
    async fn health_check(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn point(ticker: &str, day: u32, hour: u32) -> PricePoint {
        let time = Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap();
        PricePoint::new(time, ticker, dec!(100), None)
    }

    #[test]
    fn test_filter_by_symbols() {
        let filter = RawFilter::all().with_symbols("hpg, fpt");
        assert_eq!(filter.tickers, vec!["HPG", "FPT"]);
        assert!(filter.matches(&point("HPG", 1, 0)));
        assert!(!filter.matches(&point("VCB", 1, 0)));
    }

    #[test]
    fn test_filter_end_date_includes_whole_day() {
        let filter = RawFilter::all().with_range(
            NaiveDate::from_ymd_opt(2024, 5, 2),
            NaiveDate::from_ymd_opt(2024, 5, 3),
        );
        assert!(!filter.matches(&point("HPG", 1, 23)));
        assert!(filter.matches(&point("HPG", 2, 0)));
        assert!(filter.matches(&point("HPG", 3, 15)));
        assert!(!filter.matches(&point("HPG", 4, 0)));
    }

    #[test]
    fn test_unbounded_filter() {
        assert!(RawFilter::all().is_unbounded());
        assert!(!RawFilter::all().with_symbols("HPG").is_unbounded());
        assert!(RawFilter::all().matches(&point("ANY", 9, 9)));
    }
}
