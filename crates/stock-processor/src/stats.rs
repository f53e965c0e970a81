//! 작업 통계.

use std::time::Duration;

/// 파생 테이블 작업 통계
#[derive(Debug, Clone, Default)]
pub struct TaskStats {
    /// 대상 종목 수
    pub total: usize,
    /// 결과에 포함된 종목 수
    pub success: usize,
    /// 계산 실패로 제외된 종목 수
    pub errors: usize,
    /// 데이터 부족으로 제외된 종목 수
    pub skipped: usize,
    /// 게시된 테이블 수
    pub tables_published: usize,
    /// 게시된 총 행 수
    pub rows_written: u64,
    pub elapsed: Duration,
}

impl TaskStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 테이블이 하나라도 교체되었는지.
    pub fn published(&self) -> bool {
        self.tables_published > 0
    }

    /// 결과에서 빠진 종목 수 (실패 + 데이터 부족).
    pub fn excluded(&self) -> usize {
        self.errors + self.skipped
    }

    pub fn log_summary(&self, task: &str) {
        tracing::info!(
            task,
            total = self.total,
            success = self.success,
            excluded = self.excluded(),
            tables = self.tables_published,
            rows = self.rows_written,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "작업 완료"
        );
    }
}
