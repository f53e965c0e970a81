//! 도메인 모델.

pub mod derived;
pub mod price_series;

pub use derived::*;
pub use price_series::*;
