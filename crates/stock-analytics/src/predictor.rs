//! 선형 추세 기반 다음 기간 가격 예측.
//!
//! 관측마다 0부터 n-1까지 일자 인덱스를 부여하고 `close ~ day_index`를
//! 최소제곱으로 적합한 뒤, 인덱스 n에서의 값을 다음 가격으로 사용합니다.
//! 방향은 예측 가격과 현재 가격에서만 도출되므로 둘이 어긋나는 일은 없습니다.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use stock_core::{Forecast, RawSeries};
use tracing::{debug, warn};

use crate::error::{AnalyticsError, AnalyticsResult};

/// 예측에 필요한 최소 관측 수.
pub const MIN_PREDICTION_POINTS: usize = 30;

/// 최소제곱 직선 `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// 일자 인덱스(0..n-1)에 대한 최소제곱 직선 적합.
pub fn fit_linear_trend(values: &[f64]) -> AnalyticsResult<LinearFit> {
    if values.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            provided: values.len(),
        });
    }
    if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
        return Err(AnalyticsError::NonFinite(format!("close at index {}", idx)));
    }

    // b = Σ[(x - x̄)(y - ȳ)] / Σ[(x - x̄)²]
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x_diff = i as f64 - x_mean;
        numerator += x_diff * (y - y_mean);
        denominator += x_diff * x_diff;
    }

    if denominator == 0.0 {
        return Err(AnalyticsError::DegenerateFit("zero variance in day index".to_string()));
    }

    let slope = numerator / denominator;
    let intercept = y_mean - slope * x_mean;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(AnalyticsError::NonFinite("fitted coefficients".to_string()));
    }

    Ok(LinearFit { intercept, slope })
}

/// 정수 통화 단위로 반올림 (중간값은 짝수 쪽).
pub fn round_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

/// 한 종목의 다음 기간 가격 예측.
///
/// - 관측이 `min_points`개 미만이면 `Ok(None)` (에러 아님)
/// - 적합 실패는 `Err`
pub fn predict(
    series: &RawSeries,
    ticker: &str,
    min_points: usize,
) -> AnalyticsResult<Option<Forecast>> {
    let closes: Vec<Decimal> = series.for_ticker(ticker).map(|p| p.close).collect();
    if closes.len() < min_points.max(2) {
        debug!(
            ticker = %ticker,
            count = closes.len(),
            required = min_points,
            "데이터 부족으로 예측 생략"
        );
        return Ok(None);
    }

    let values: Vec<f64> = series.for_ticker(ticker).map(|p| p.close_f64()).collect();
    let fit = fit_linear_trend(&values)?;

    let raw_next = fit.predict(values.len() as f64);
    let next_price = Decimal::from_f64(raw_next)
        .ok_or_else(|| AnalyticsError::NonFinite(format!("predicted price {}", raw_next)))?;

    let today_price = match closes.last() {
        Some(last) => *last,
        None => return Ok(None),
    };

    Ok(Some(Forecast::new(
        ticker,
        round_price(today_price),
        round_price(next_price),
    )))
}

/// 전체 종목 예측 결과.
#[derive(Debug, Default)]
pub struct PredictionBatch {
    /// 예측 성공 종목
    pub forecasts: Vec<Forecast>,
    /// 데이터 부족으로 제외된 종목
    pub insufficient: Vec<String>,
    /// 적합 실패로 제외된 종목
    pub failed: Vec<(String, AnalyticsError)>,
}

/// 모든 종목에 대해 예측을 실행합니다.
///
/// 한 종목의 실패는 나머지 종목 처리에 영향을 주지 않습니다.
pub fn predict_all(series: &RawSeries, min_points: usize) -> PredictionBatch {
    let mut batch = PredictionBatch::default();

    for ticker in series.tickers() {
        match predict(series, &ticker, min_points) {
            Ok(Some(forecast)) => batch.forecasts.push(forecast),
            Ok(None) => batch.insufficient.push(ticker),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "예측 실패, 종목 제외");
                batch.failed.push((ticker, e));
            }
        }
    }

    batch
}
