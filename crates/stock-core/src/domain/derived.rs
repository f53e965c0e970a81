//! 파생 테이블 행 타입.
//!
//! 매 사이클마다 원시 시계열에서 새로 계산되며, 이전 사이클 결과를 통째로 대체합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Granularity;

/// 기간별 평균 종가.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPoint {
    /// 기간 라벨 (기간 마지막 날 00:00 UTC)
    pub time: DateTime<Utc>,
    pub ticker: String,
    /// 기간 내 종가 산술 평균
    pub close: f64,
    pub granularity: Granularity,
}

/// 예측 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    /// 상승
    Up,
    /// 하락 (보합 포함)
    Down,
}

impl Trend {
    /// 예측 가격에서 방향을 도출합니다. 예측가가 현재가보다 클 때만 상승입니다.
    pub fn from_prices(today_price: Decimal, next_price: Decimal) -> Self {
        if next_price > today_price {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 종목별 다음 기간 가격 예측.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub ticker: String,
    /// 마지막 관측 종가 (정수 반올림)
    pub today_price: Decimal,
    /// 선형 추세 외삽 가격 (정수 반올림)
    pub next_price: Decimal,
    /// `next_price`와 `today_price`에서 도출된 방향
    pub trend: Trend,
}

impl Forecast {
    /// 가격으로부터 예측을 생성합니다. 방향은 항상 가격에서 도출됩니다.
    pub fn new(ticker: impl Into<String>, today_price: Decimal, next_price: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            today_price,
            next_price,
            trend: Trend::from_prices(today_price, next_price),
        }
    }
}

/// 수익률/변동성 군집 결과.
///
/// 군집 라벨은 한 번의 계산 안에서만 의미가 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub ticker: String,
    /// 연율화 평균 수익률
    pub returns: f64,
    /// 연율화 변동성
    pub volatility: f64,
    /// 군집 라벨 (0, 1, 2)
    pub cluster: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trend_derived_from_prices() {
        assert_eq!(Trend::from_prices(dec!(139), dec!(140)), Trend::Up);
        assert_eq!(Trend::from_prices(dec!(140), dec!(140)), Trend::Down);
        assert_eq!(Trend::from_prices(dec!(141), dec!(140)), Trend::Down);
    }

    #[test]
    fn test_forecast_new_couples_trend() {
        let forecast = Forecast::new("HPG", dec!(25000), dec!(24800));
        assert_eq!(forecast.trend, Trend::Down);
        assert_eq!(forecast.ticker, "HPG");
    }

    #[test]
    fn test_trend_display() {
        assert_eq!(Trend::Up.to_string(), "Up");
        assert_eq!(Trend::Down.to_string(), "Down");
    }
}
