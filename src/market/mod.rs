//! 行情模块
//!
//! 行情注册表维护每个货币对的当前报价快照，由外部行情源整体替换式更新；
//! 账本引擎开仓时从这里读取 mid 价。注册表与账本之间刻意不做事务耦合：
//! 行情推送是异步尽力而为的，价格变化对交易创建是最终可见而非线性化的。

/// 行情注册表
pub mod registry;

/// 模拟行情源（外部协作者）
pub mod feed;

pub use feed::MockPriceFeed;
pub use registry::{MarketQuote, MarketRegistry, PriceType};
