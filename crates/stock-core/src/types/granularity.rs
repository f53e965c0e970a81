//! 리샘플링 집계 단위 정의.
//!
//! 각 집계 단위는 날짜를 해당 기간의 마지막 날로 매핑합니다.
//! 주간은 일요일 마감, 월간은 월말 마감 기준입니다.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 리샘플링 집계 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// 일간
    Daily,
    /// 주간 (일요일 마감)
    Weekly,
    /// 월간 (월말 마감)
    Monthly,
}

impl Granularity {
    /// 테이블에 저장되는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// 주어진 날짜가 속한 기간의 마지막 날을 반환합니다.
    pub fn period_end(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date,
            Self::Weekly => {
                let days_to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
                date + chrono::Duration::days(days_to_sunday as i64)
            }
            Self::Monthly => {
                let (year, month) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                NaiveDate::from_ymd_opt(year, month, 1)
                    .and_then(|first_of_next| first_of_next.pred_opt())
                    .unwrap_or(date)
            }
        }
    }

    /// 시각이 속한 기간의 라벨 (기간 마지막 날 00:00 UTC).
    pub fn period_label(&self, time: DateTime<Utc>) -> DateTime<Utc> {
        self.period_end(time.date_naive())
            .and_time(NaiveTime::MIN)
            .and_utc()
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_period_end_is_sunday() {
        // 2024-01-03 수요일 → 2024-01-07 일요일
        assert_eq!(Granularity::Weekly.period_end(date(2024, 1, 3)), date(2024, 1, 7));
        // 일요일은 그대로
        assert_eq!(Granularity::Weekly.period_end(date(2024, 1, 7)), date(2024, 1, 7));
        // 월요일은 다음 일요일
        assert_eq!(Granularity::Weekly.period_end(date(2024, 1, 8)), date(2024, 1, 14));
    }

    #[test]
    fn test_monthly_period_end() {
        assert_eq!(Granularity::Monthly.period_end(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(Granularity::Monthly.period_end(date(2023, 12, 1)), date(2023, 12, 31));
        assert_eq!(Granularity::Monthly.period_end(date(2023, 4, 30)), date(2023, 4, 30));
    }

    #[test]
    fn test_period_label_is_midnight() {
        let time = date(2024, 3, 5).and_hms_opt(15, 30, 0).unwrap().and_utc();
        let label = Granularity::Daily.period_label(time);
        assert_eq!(label, date(2024, 3, 5).and_hms_opt(0, 0, 0).unwrap().and_utc());
    }

    #[test]
    fn test_granularity_display() {
        assert_eq!(Granularity::Daily.to_string(), "daily");
        assert_eq!(Granularity::Monthly.as_str(), "monthly");
    }
}
