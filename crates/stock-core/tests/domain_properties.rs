//! 도메인 타입 속성 테스트.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use rust_decimal::Decimal;
use stock_core::{Forecast, Granularity, RawSeries, PricePoint, Trend};

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #[test]
    fn forecast_trend_is_up_only_when_next_exceeds_today(
        today in arb_price(),
        next in arb_price(),
    ) {
        let forecast = Forecast::new("X", today, next);
        prop_assert_eq!(forecast.trend == Trend::Up, next > today);
        prop_assert_eq!(forecast.trend, Trend::from_prices(today, next));
    }

    #[test]
    fn weekly_period_ends_on_following_sunday(date in arb_date()) {
        let end = Granularity::Weekly.period_end(date);
        prop_assert_eq!(end.weekday(), Weekday::Sun);
        prop_assert!(end >= date);
        prop_assert!(end - date < Duration::days(7));
    }

    #[test]
    fn monthly_period_ends_on_last_day_of_month(date in arb_date()) {
        let end = Granularity::Monthly.period_end(date);
        prop_assert_eq!((end.year(), end.month()), (date.year(), date.month()));
        prop_assert_eq!(end.succ_opt().unwrap().day(), 1);
    }

    #[test]
    fn raw_series_is_sorted_by_time(offsets in prop::collection::vec(0i64..500, 0..50)) {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc();
        let points: Vec<PricePoint> = offsets
            .iter()
            .map(|d| PricePoint::new(base + Duration::days(*d), "X", Decimal::ONE, None))
            .collect();

        let series = RawSeries::new(points);
        prop_assert_eq!(series.len(), offsets.len());
        prop_assert!(series.points().windows(2).all(|w| w[0].time <= w[1].time));
    }
}
