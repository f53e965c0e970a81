//! 사이클 스케줄러.
//!
//! 사이클마다 원시 시계열을 한 번 읽고 모든 작업을 순서대로 실행합니다.
//! 작업 하나의 실패는 로그만 남기고 다음 작업으로 넘어갑니다.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use stock_core::RawSeries;
use stock_data::{load_raw, PriceStore, RawFilter};
use tracing::{error, info, warn};

use crate::config::{ClusteringCadence, ProcessorConfig};
use crate::error::Result;
use crate::stats::TaskStats;
use crate::tasks::{run_task, Task};

/// 작업 실행 결과
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    /// 하나 이상의 테이블 게시
    Published(TaskStats),
    /// 게시할 결과 없음 (기존 테이블 유지)
    Skipped(TaskStats),
    /// 실패 (기존 테이블 유지)
    Failed(String),
    /// 실행 주기가 아님
    NotDue,
}

impl TaskOutcome {
    fn from_result(result: Result<TaskStats>) -> Self {
        match result {
            Ok(stats) if stats.published() => Self::Published(stats),
            Ok(stats) => Self::Skipped(stats),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Published(_) => "published",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
            Self::NotDue => "not_due",
        }
    }
}

/// 한 사이클의 결과
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 읽어 온 원시 행 수
    pub raw_rows: usize,
    /// 실행 순서대로의 작업 결과 (원시 데이터가 없으면 비어 있음)
    pub tasks: Vec<(Task, TaskOutcome)>,
    /// 소요 시간
    pub elapsed: Duration,
}

impl CycleReport {
    /// 원시 데이터가 없어 사이클을 건너뛰었는지
    pub fn is_idle(&self) -> bool {
        self.raw_rows == 0
    }

    pub fn outcome(&self, task: Task) -> Option<&TaskOutcome> {
        self.tasks.iter().find(|(t, _)| *t == task).map(|(_, o)| o)
    }

    pub fn failed_count(&self) -> usize {
        self.tasks.iter().filter(|(_, o)| o.is_failed()).count()
    }

    /// 사이클 요약 로그 출력
    pub fn log_summary(&self) {
        let summary: Vec<String> = self
            .tasks
            .iter()
            .map(|(task, outcome)| format!("{}={}", task, outcome.label()))
            .collect();
        info!(
            raw_rows = self.raw_rows,
            failed = self.failed_count(),
            tasks = %summary.join(","),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "사이클 완료"
        );
    }
}

/// 사이클 간 유지되는 상태
#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    /// 마지막으로 성공한 클러스터링 시각
    pub last_clustering: Option<DateTime<Utc>>,
}

/// 파생 테이블 스케줄러
pub struct Scheduler<S: PriceStore + ?Sized> {
    store: Arc<S>,
    config: ProcessorConfig,
    filter: RawFilter,
    state: SchedulerState,
}

impl<S: PriceStore + ?Sized> Scheduler<S> {
    pub fn new(store: Arc<S>, config: ProcessorConfig) -> Self {
        let filter = config.raw_filter(None);
        Self {
            store,
            config,
            filter,
            state: SchedulerState::default(),
        }
    }

    /// 대상 종목 지정 (설정값보다 우선)
    pub fn with_symbols(mut self, symbols: Option<&str>) -> Self {
        if symbols.is_some() {
            self.filter = self.config.raw_filter(symbols);
        }
        self
    }

    pub fn filter(&self) -> &RawFilter {
        &self.filter
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    fn clustering_due(&self, now: DateTime<Utc>) -> bool {
        match self.config.schedule.clustering_cadence {
            ClusteringCadence::EveryCycle => true,
            ClusteringCadence::Daily => self
                .state
                .last_clustering
                .map_or(true, |last| now - last >= ChronoDuration::hours(24)),
        }
    }

    async fn load(&self) -> RawSeries {
        load_raw(self.store.as_ref(), &self.filter).await
    }

    /// 전체 사이클 1회 실행
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.run_cycle_at(Utc::now()).await
    }

    /// 지정한 시각 기준으로 전체 사이클 1회 실행
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> CycleReport {
        let start = Instant::now();
        let series = self.load().await;

        if series.is_empty() {
            info!("원시 데이터 없음, 사이클 건너뜀");
            return CycleReport {
                raw_rows: 0,
                tasks: Vec::new(),
                elapsed: start.elapsed(),
            };
        }

        let mut tasks = Vec::with_capacity(Task::ALL.len());
        for task in Task::ALL {
            if task == Task::Clustering && !self.clustering_due(now) {
                info!(
                    cadence = %self.config.schedule.clustering_cadence,
                    "클러스터링 주기 아님, 건너뜀"
                );
                tasks.push((task, TaskOutcome::NotDue));
                continue;
            }

            let result = run_task(task, self.store.as_ref(), &series, &self.config).await;
            match &result {
                Ok(stats) => stats.log_summary(task.name()),
                Err(e) => error!(task = %task, error = %e, "작업 실패"),
            }
            if task == Task::Clustering && result.is_ok() {
                self.state.last_clustering = Some(now);
            }
            tasks.push((task, TaskOutcome::from_result(result)));
        }

        CycleReport {
            raw_rows: series.len(),
            tasks,
            elapsed: start.elapsed(),
        }
    }

    /// 작업 하나만 실행 (클러스터링 주기 무시)
    pub async fn run_single(&mut self, task: Task) -> Result<TaskStats> {
        let series = self.load().await;
        if series.is_empty() {
            warn!(task = %task, "원시 데이터 없음, 작업 건너뜀");
            return Ok(TaskStats::new());
        }

        let stats = run_task(task, self.store.as_ref(), &series, &self.config).await?;
        if task == Task::Clustering {
            self.state.last_clustering = Some(Utc::now());
        }
        stats.log_summary(task.name());
        Ok(stats)
    }

    /// 종료 신호가 올 때까지 주기적으로 사이클을 실행합니다.
    ///
    /// 종료 신호는 사이클 사이에서만 처리됩니다.
    pub async fn run_daemon<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let interval_secs = self.config.schedule.interval_secs;
        info!("=== 데몬 모드 시작 (주기: {}초) ===", interval_secs);

        let interval = self.config.schedule.interval();
        tokio::pin!(shutdown);

        loop {
            info!("=== 사이클 실행 시작 ===");
            let report = self.run_cycle().await;
            report.log_summary();
            info!("=== 사이클 완료, 다음 실행: {}초 후 ===", interval_secs);

            // 사이클이 끝난 뒤부터 주기만큼 대기
            tokio::select! {
                _ = &mut shutdown => {
                    info!("종료 신호 수신, 데몬 종료 중...");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_outcome_from_result() {
        let published = TaskOutcome::from_result(Ok(TaskStats {
            tables_published: 1,
            ..Default::default()
        }));
        assert_eq!(published.label(), "published");

        let skipped = TaskOutcome::from_result(Ok(TaskStats::new()));
        assert_eq!(skipped.label(), "skipped");

        let failed = TaskOutcome::from_result(Err(crate::ProcessorError::Config("x".into())));
        assert!(failed.is_failed());
    }

    #[test]
    fn test_daily_cadence_due() {
        let mut config = ProcessorConfig::new("postgres://localhost/stockdb");
        config.schedule.clustering_cadence = ClusteringCadence::Daily;
        let mut scheduler = Scheduler::new(Arc::new(stock_data::MemoryPriceStore::new()), config);

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert!(scheduler.clustering_due(now));

        scheduler.state.last_clustering = Some(now);
        assert!(!scheduler.clustering_due(now + ChronoDuration::hours(23)));
        assert!(scheduler.clustering_due(now + ChronoDuration::hours(24)));
    }
}
