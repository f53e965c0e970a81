//! 메모리 기반 가격 저장소.
//!
//! DB 없이 전체 사이클을 돌려 볼 때와 테스트에서 사용합니다.
//! 읽기/쓰기 실패를 주입할 수 있습니다.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use stock_core::PricePoint;

use crate::error::{DataError, Result};
use crate::store::{PriceStore, RawFilter};
use crate::table::TableFrame;

#[derive(Default)]
struct MemoryState {
    raw: Vec<PricePoint>,
    tables: HashMap<String, TableFrame>,
    write_log: Vec<String>,
    fail_reads: bool,
    read_latency: Duration,
    read_count: usize,
    failing_tables: HashSet<String>,
}

/// 메모리 기반 가격 저장소.
#[derive(Default)]
pub struct MemoryPriceStore {
    state: Mutex<MemoryState>,
}

impl MemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 원시 가격으로 초기화된 저장소.
    pub fn with_raw(points: Vec<PricePoint>) -> Self {
        let store = Self::new();
        store.set_raw(points);
        store
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // 패닉으로 오염된 락이어도 내부 데이터는 그대로 사용합니다.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 원시 테이블 전체 교체 (수집 작업 역할).
    pub fn set_raw(&self, points: Vec<PricePoint>) {
        self.lock().raw = points;
    }

    /// 파생 테이블을 직접 넣습니다 (이전 사이클 결과 재현용).
    pub fn insert_table(&self, frame: TableFrame) {
        self.lock().tables.insert(frame.name().to_string(), frame);
    }

    /// 저장된 테이블 조회.
    pub fn table(&self, name: &str) -> Option<TableFrame> {
        self.lock().tables.get(name).cloned()
    }

    /// 저장된 테이블 이름 목록 (오름차순).
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// 성공한 교체 연산 순서대로의 테이블 이름.
    pub fn write_log(&self) -> Vec<String> {
        self.lock().write_log.clone()
    }

    /// 원시 테이블 읽기 실패 주입.
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// 원시 테이블 읽기마다 지연을 줍니다 (느린 DB 재현용).
    pub fn set_read_latency(&self, latency: Duration) {
        self.lock().read_latency = latency;
    }

    /// 원시 테이블 읽기 호출 횟수.
    pub fn read_count(&self) -> usize {
        self.lock().read_count
    }

    /// 특정 테이블 쓰기 실패 주입.
    pub fn fail_writes_for(&self, table: &str) {
        self.lock().failing_tables.insert(table.to_string());
    }
}

#[async_trait]
impl PriceStore for MemoryPriceStore {
    async fn fetch_raw(&self, filter: &RawFilter) -> Result<Vec<PricePoint>> {
        let latency = {
            let mut state = self.lock();
            state.read_count += 1;
            state.read_latency
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let state = self.lock();
        if state.fail_reads {
            return Err(DataError::ConnectionError("injected read failure".to_string()));
        }
        Ok(state
            .raw
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn replace_table(&self, frame: &TableFrame) -> Result<u64> {
        let mut state = self.lock();
        if state.failing_tables.contains(frame.name()) {
            return Err(DataError::WriteError(format!(
                "injected write failure: {}",
                frame.name()
            )));
        }
        state
            .tables
            .insert(frame.name().to_string(), frame.clone());
        state.write_log.push(frame.name().to_string());
        Ok(frame.len() as u64)
    }

    async fn health_check(&self) -> Result<()> {
        if self.lock().fail_reads {
            return Err(DataError::ConnectionError("injected read failure".to_string()));
        }
        Ok(())
    }
}
