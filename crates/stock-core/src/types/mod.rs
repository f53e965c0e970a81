//! 워크스페이스 전반에서 사용되는 공통 타입.

mod granularity;
mod ticker;

pub use granularity::*;
pub use ticker::*;
