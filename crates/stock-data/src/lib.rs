//! 가격 저장소 접근.
//!
//! 이 crate는 다음을 제공합니다:
//! - 저장소 추상화 ([`PriceStore`])와 PostgreSQL / 메모리 구현
//! - 원시 가격 시계열 로딩 (실패 시 빈 시계열)
//! - 파생 테이블 표현 ([`TableFrame`])

pub mod error;
pub mod loader;
pub mod storage;
pub mod store;
pub mod table;

pub use error::{DataError, Result};
pub use loader::load_raw;
pub use storage::memory::MemoryPriceStore;
pub use storage::postgres::{Database, DatabaseConfig, PgPriceStore, DEFAULT_RAW_TABLE};
pub use store::{PriceStore, RawFilter};
pub use table::{CellValue, Column, ColumnType, TableFrame};
