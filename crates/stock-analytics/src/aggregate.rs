//! 종목별 리샘플링 및 추세 테이블 생성.
//!
//! 일간/주간/월간 기간별로 종가의 산술 평균을 계산합니다.
//! 같은 시각의 중복 행도 각각 하나의 관측으로 평균에 포함됩니다.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use stock_core::{AggregatedPoint, Granularity, PricePoint, RawSeries};

/// 한 종목의 집계 결과.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedSeries {
    pub daily: Vec<AggregatedPoint>,
    pub weekly: Vec<AggregatedPoint>,
    pub monthly: Vec<AggregatedPoint>,
}

impl AggregatedSeries {
    /// 집계 단위별 결과.
    pub fn get(&self, granularity: Granularity) -> &[AggregatedPoint] {
        match granularity {
            Granularity::Daily => &self.daily,
            Granularity::Weekly => &self.weekly,
            Granularity::Monthly => &self.monthly,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty() && self.weekly.is_empty() && self.monthly.is_empty()
    }
}

/// 포인트를 기간별로 묶어 평균 종가를 계산합니다.
///
/// 관측이 없는 기간은 결과에 포함되지 않습니다.
pub fn resample<'a, I>(points: I, ticker: &str, granularity: Granularity) -> Vec<AggregatedPoint>
where
    I: IntoIterator<Item = &'a PricePoint>,
{
    let mut buckets: BTreeMap<DateTime<Utc>, (Decimal, u32)> = BTreeMap::new();

    for point in points {
        let label = granularity.period_label(point.time);
        let bucket = buckets.entry(label).or_insert((Decimal::ZERO, 0));
        bucket.0 += point.close;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .filter_map(|(time, (sum, count))| {
            let mean = (sum / Decimal::from(count)).to_f64()?;
            Some(AggregatedPoint {
                time,
                ticker: ticker.to_string(),
                close: mean,
                granularity,
            })
        })
        .collect()
}

/// 한 종목의 일간/주간/월간 집계.
///
/// 관측이 없는 종목은 세 개의 빈 시퀀스를 반환합니다.
pub fn aggregate(series: &RawSeries, ticker: &str) -> AggregatedSeries {
    let points: Vec<&PricePoint> = series.for_ticker(ticker).collect();

    AggregatedSeries {
        daily: resample(points.iter().copied(), ticker, Granularity::Daily),
        weekly: resample(points.iter().copied(), ticker, Granularity::Weekly),
        monthly: resample(points.iter().copied(), ticker, Granularity::Monthly),
    }
}

/// 전체 종목의 월간 집계를 이어 붙인 추세 테이블.
///
/// 종목 코드 오름차순, 종목 내에서는 시간 오름차순입니다.
pub fn build_trend(series: &RawSeries) -> Vec<AggregatedPoint> {
    series
        .tickers()
        .iter()
        .flat_map(|ticker| aggregate(series, ticker).monthly)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn point(month: u32, day: u32, ticker: &str, close: Decimal) -> PricePoint {
        let time = Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap();
        PricePoint::new(time, ticker, close, Some(100))
    }

    #[test]
    fn test_monthly_mean_and_month_end_label() {
        let series = RawSeries::new(vec![
            point(1, 10, "HPG", dec!(10)),
            point(1, 20, "HPG", dec!(20)),
            point(2, 5, "HPG", dec!(40)),
        ]);

        let result = aggregate(&series, "HPG");
        assert_eq!(result.monthly.len(), 2);
        assert_eq!(result.monthly[0].close, 15.0);
        assert_eq!(
            result.monthly[0].time,
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()
        );
        assert_eq!(result.monthly[1].close, 40.0);
        assert_eq!(
            result.monthly[1].time,
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
        assert!(result
            .monthly
            .iter()
            .all(|p| p.granularity == Granularity::Monthly));
    }

    #[test]
    fn test_weekly_groups_by_sunday() {
        // 2024-01-01 월 ~ 2024-01-07 일 → 한 주, 2024-01-08 월 → 다음 주
        let series = RawSeries::new(vec![
            point(1, 1, "FPT", dec!(1)),
            point(1, 7, "FPT", dec!(3)),
            point(1, 8, "FPT", dec!(10)),
        ]);

        let weekly = aggregate(&series, "FPT").weekly;
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].close, 2.0);
        assert_eq!(weekly[0].time, Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap());
        assert_eq!(weekly[1].close, 10.0);
        assert_eq!(weekly[1].time, Utc.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_duplicates_are_averaged() {
        let series = RawSeries::new(vec![
            point(3, 4, "VCB", dec!(90)),
            point(3, 4, "VCB", dec!(110)),
        ]);

        let daily = aggregate(&series, "VCB").daily;
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].close, 100.0);
    }

    #[test]
    fn test_unknown_ticker_yields_empty() {
        let series = RawSeries::new(vec![point(1, 1, "HPG", dec!(1))]);
        let result = aggregate(&series, "XYZ");
        assert!(result.is_empty());
        assert!(result.get(Granularity::Weekly).is_empty());
    }

    #[test]
    fn test_build_trend_concatenates_monthly_per_ticker() {
        let series = RawSeries::new(vec![
            point(1, 2, "VCB", dec!(5)),
            point(1, 3, "HPG", dec!(1)),
            point(2, 3, "HPG", dec!(3)),
        ]);

        let trend = build_trend(&series);
        let tickers: Vec<&str> = trend.iter().map(|p| p.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["HPG", "HPG", "VCB"]);
        assert!(build_trend(&RawSeries::empty()).is_empty());
    }
}
