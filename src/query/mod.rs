//! 只读查询层
//!
//! 账户存储之上的只读投影，不持有任何写路径。

/// 排行榜
pub mod leaderboard;

pub use leaderboard::Leaderboard;
