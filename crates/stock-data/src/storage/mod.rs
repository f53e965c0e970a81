//! 저장소 구현체.

pub mod memory;
pub mod postgres;
