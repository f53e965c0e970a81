//! 환경변수 기반 설정 모듈.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use stock_analytics::{ClusteringParams, MIN_PREDICTION_POINTS};
use stock_data::{DatabaseConfig, RawFilter, DEFAULT_RAW_TABLE};

use crate::error::{ProcessorError, Result};

/// Processor 전체 설정
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// 데이터베이스 설정
    pub database: DatabaseSettings,
    /// 스케줄 설정
    pub schedule: ScheduleConfig,
    /// 분석 파라미터
    pub analytics: AnalyticsConfig,
    /// 원시 데이터 조회 범위
    pub filter: FilterConfig,
}

/// 데이터베이스 설정
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// 데이터베이스 URL
    pub url: String,
    /// 풀 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
    /// 시작 시 DB 대기 최대 시간 (초)
    pub wait_timeout_secs: u64,
    /// 원시 가격 테이블 이름
    pub raw_table: String,
}

/// 클러스터링 실행 주기
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClusteringCadence {
    /// 매 사이클
    #[default]
    EveryCycle,
    /// 마지막 성공 후 24시간 경과 시
    Daily,
}

impl ClusteringCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EveryCycle => "every_cycle",
            Self::Daily => "daily",
        }
    }
}

impl fmt::Display for ClusteringCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusteringCadence {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "every_cycle" | "cycle" => Ok(Self::EveryCycle),
            "daily" => Ok(Self::Daily),
            _ => Err(ProcessorError::Config(format!(
                "Invalid clustering cadence: {}",
                s
            ))),
        }
    }
}

/// 스케줄 설정
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// 사이클 실행 주기 (초 단위)
    pub interval_secs: u64,
    /// 클러스터링 실행 주기
    pub clustering_cadence: ClusteringCadence,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            clustering_cadence: ClusteringCadence::EveryCycle,
        }
    }
}

/// 분석 파라미터
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// 예측 최소 관측 수
    pub prediction_min_points: usize,
    /// k-means 시드
    pub clustering_seed: u64,
    /// k-means 재시작 횟수
    pub clustering_restarts: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        let params = ClusteringParams::default();
        Self {
            prediction_min_points: MIN_PREDICTION_POINTS,
            clustering_seed: params.seed,
            clustering_restarts: params.restarts,
        }
    }
}

/// 원시 데이터 조회 범위
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// 대상 종목 (쉼표로 구분)
    pub symbols: Option<String>,
    /// 시작일
    pub start_date: Option<NaiveDate>,
    /// 종료일
    pub end_date: Option<NaiveDate>,
}

impl ProcessorConfig {
    /// 기본값으로 설정 생성
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database: DatabaseSettings {
                url: database_url.into(),
                max_connections: 5,
                connect_timeout_secs: 30,
                wait_timeout_secs: 60,
                raw_table: DEFAULT_RAW_TABLE.to_string(),
            },
            schedule: ScheduleConfig::default(),
            analytics: AnalyticsConfig::default(),
            filter: FilterConfig::default(),
        }
    }

    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            ProcessorError::Config("DATABASE_URL 환경변수가 설정되지 않았습니다".to_string())
        })?;

        let defaults = Self::new(database_url);

        Ok(Self {
            database: DatabaseSettings {
                max_connections: env_var_parse(
                    "DATABASE_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                ),
                connect_timeout_secs: env_var_parse(
                    "DATABASE_CONNECT_TIMEOUT_SECS",
                    defaults.database.connect_timeout_secs,
                ),
                wait_timeout_secs: env_var_parse(
                    "DATABASE_WAIT_TIMEOUT_SECS",
                    defaults.database.wait_timeout_secs,
                ),
                raw_table: env_var_parse("RAW_TABLE", defaults.database.raw_table.clone()),
                ..defaults.database
            },
            schedule: ScheduleConfig {
                interval_secs: env_var_parse(
                    "PROCESSOR_INTERVAL_SECS",
                    defaults.schedule.interval_secs,
                ),
                clustering_cadence: env_var_parse(
                    "CLUSTERING_CADENCE",
                    defaults.schedule.clustering_cadence,
                ),
            },
            analytics: AnalyticsConfig {
                prediction_min_points: env_var_parse(
                    "PREDICTION_MIN_POINTS",
                    defaults.analytics.prediction_min_points,
                ),
                clustering_seed: env_var_parse(
                    "CLUSTERING_SEED",
                    defaults.analytics.clustering_seed,
                ),
                clustering_restarts: env_var_parse(
                    "CLUSTERING_RESTARTS",
                    defaults.analytics.clustering_restarts,
                ),
            },
            filter: FilterConfig {
                symbols: std::env::var("PROCESSOR_SYMBOLS")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                start_date: env_var_opt("PROCESSOR_START_DATE"),
                end_date: env_var_opt("PROCESSOR_END_DATE"),
            },
        })
    }

    /// 저장소 연결 설정
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
        }
    }

    /// 원시 데이터 조회 필터.
    ///
    /// CLI에서 지정한 종목이 있으면 환경변수 설정보다 우선합니다.
    pub fn raw_filter(&self, symbols_override: Option<&str>) -> RawFilter {
        let filter = RawFilter::all().with_range(self.filter.start_date, self.filter.end_date);
        match symbols_override.or(self.filter.symbols.as_deref()) {
            Some(symbols) => filter.with_symbols(symbols),
            None => filter,
        }
    }

    /// k-means 파라미터
    pub fn clustering_params(&self) -> ClusteringParams {
        ClusteringParams {
            seed: self.analytics.clustering_seed,
            restarts: self.analytics.clustering_restarts.max(1),
            ..ClusteringParams::default()
        }
    }
}

impl DatabaseSettings {
    /// DB 대기 최대 시간을 Duration으로 반환
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

impl ScheduleConfig {
    /// 사이클 실행 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 선택적 환경변수 파싱 (없거나 잘못된 값이면 None)
fn env_var_opt<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProcessorConfig::new("postgres://localhost/stockdb");
        assert_eq!(config.schedule.interval(), Duration::from_secs(300));
        assert_eq!(config.schedule.clustering_cadence, ClusteringCadence::EveryCycle);
        assert_eq!(config.analytics.prediction_min_points, 30);
        assert_eq!(config.database.wait_timeout(), Duration::from_secs(60));
        assert_eq!(config.database.raw_table, "raw_stock_prices");

        let params = config.clustering_params();
        assert_eq!(params.k, 3);
        assert_eq!(params.seed, 42);
        assert_eq!(params.restarts, 10);
    }

    #[test]
    fn test_cadence_parse() {
        assert_eq!(
            "daily".parse::<ClusteringCadence>().unwrap(),
            ClusteringCadence::Daily
        );
        assert_eq!(
            " Every_Cycle ".parse::<ClusteringCadence>().unwrap(),
            ClusteringCadence::EveryCycle
        );
        assert!("hourly".parse::<ClusteringCadence>().is_err());
    }

    #[test]
    fn test_env_var_parse_falls_back_on_bad_value() {
        std::env::set_var("STOCK_PROCESSOR_TEST_BAD_NUMBER", "abc");
        assert_eq!(env_var_parse("STOCK_PROCESSOR_TEST_BAD_NUMBER", 7u64), 7);

        std::env::set_var("STOCK_PROCESSOR_TEST_GOOD_NUMBER", " 15 ");
        assert_eq!(env_var_parse("STOCK_PROCESSOR_TEST_GOOD_NUMBER", 7u64), 15);

        assert_eq!(env_var_parse("STOCK_PROCESSOR_TEST_MISSING", 3usize), 3);
    }

    #[test]
    fn test_env_var_opt_date() {
        std::env::set_var("STOCK_PROCESSOR_TEST_DATE", "2024-02-29");
        assert_eq!(
            env_var_opt::<NaiveDate>("STOCK_PROCESSOR_TEST_DATE"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );

        std::env::set_var("STOCK_PROCESSOR_TEST_BAD_DATE", "20240229");
        assert_eq!(env_var_opt::<NaiveDate>("STOCK_PROCESSOR_TEST_BAD_DATE"), None);
    }

    #[test]
    fn test_raw_filter_override() {
        let mut config = ProcessorConfig::new("postgres://localhost/stockdb");
        config.filter.symbols = Some("hpg,fpt".to_string());
        config.filter.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);

        let from_env = config.raw_filter(None);
        assert_eq!(from_env.tickers, vec!["HPG", "FPT"]);
        assert_eq!(from_env.start, NaiveDate::from_ymd_opt(2024, 1, 1));

        let from_cli = config.raw_filter(Some("vcb"));
        assert_eq!(from_cli.tickers, vec!["VCB"]);
    }
}
