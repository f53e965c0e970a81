//! 파생 테이블의 메모리 표현.
//!
//! 게시 단계는 테이블 전체를 교체하므로, 컬럼 스키마와 모든 행을
//! 하나의 [`TableFrame`]으로 넘깁니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{DataError, Result};

/// 컬럼 타입.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Timestamp,
    Text,
    Float,
    Integer,
    Numeric,
}

impl ColumnType {
    /// PostgreSQL 컬럼 타입.
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Timestamp => "TIMESTAMPTZ",
            Self::Text => "TEXT",
            Self::Float => "DOUBLE PRECISION",
            Self::Integer => "BIGINT",
            Self::Numeric => "NUMERIC",
        }
    }
}

/// 컬럼 정의.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// 셀 값.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Timestamp(DateTime<Utc>),
    Text(String),
    Float(f64),
    Integer(i64),
    Numeric(Decimal),
    Null,
}

impl CellValue {
    /// 컬럼 타입과 호환되는지 확인합니다. NULL은 모든 타입과 호환됩니다.
    pub fn matches(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (Self::Null, _)
                | (Self::Timestamp(_), ColumnType::Timestamp)
                | (Self::Text(_), ColumnType::Text)
                | (Self::Float(_), ColumnType::Float)
                | (Self::Integer(_), ColumnType::Integer)
                | (Self::Numeric(_), ColumnType::Numeric)
        )
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<Option<i64>> for CellValue {
    fn from(value: Option<i64>) -> Self {
        value.map(CellValue::Integer).unwrap_or(CellValue::Null)
    }
}

/// 이름, 스키마, 행으로 구성된 테이블.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFrame {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
}

impl TableFrame {
    /// 빈 테이블 생성.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// 행 추가. 컬럼 수와 타입이 스키마와 맞지 않으면 에러를 반환합니다.
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(DataError::InvalidData(format!(
                "{}: expected {} cells, got {}",
                self.name,
                self.columns.len(),
                row.len()
            )));
        }

        for (cell, column) in row.iter().zip(&self.columns) {
            if !cell.matches(column.column_type) {
                return Err(DataError::InvalidData(format!(
                    "{}.{}: {:?} does not fit {:?}",
                    self.name, column.name, cell, column.column_type
                )));
            }
        }

        self.rows.push(row);
        Ok(())
    }

    /// 같은 스키마의 다른 이름 테이블로 복제합니다.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: self.columns.clone(),
            rows: self.rows.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 컬럼 이름으로 인덱스 조회.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// 특정 컬럼 값 조회.
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }
}
