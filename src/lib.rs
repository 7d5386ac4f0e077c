//! # FXSIM-RS
//!
//! 模拟外汇交易所 - 账本与预留引擎
//!
//! ## 核心能力
//!
//! - **行情注册表**: 每个货币对一条报价快照 (bid/mid/ask)，整体替换式更新
//! - **账户管理**: 开户/查询/重置，默认购买力由配置注入
//! - **账本引擎**: 开仓扣款、订单预留、撤单释放，三个存储的唯一写入者
//! - **NAV 重算**: 行情推送后对全部账户做一次净值重算
//! - **排行榜**: 按 NAV 降序的只读分页投影
//!
//! ## 架构设计
//!
//! ```text
//! 外部请求层 (不在本 crate 范围内)
//!     ↓
//! Ledger Engine (exchange/ledger)
//!     ↓                    ↓
//! Account/Position/Order  Market Registry (market/)
//!     存储 (exchange/)         ↑
//!                          Price Feed (market/feed, 外部协作者)
//! ```
//!
//! ## 一致性保证
//!
//! - 开仓扣款与持仓创建在账户写锁内完成，要么都发生要么都不发生
//! - 同一持仓上的预留/释放在该持仓的写锁内串行化
//! - 任意时刻 `0 <= reserved_units <= units`，且等于该持仓上存活订单的单位之和

// ============================================================================
// 外部依赖
// ============================================================================

// 并发工具
pub use dashmap;
pub use parking_lot;

// 序列化
pub use serde;
pub use serde_json;

// 时间
pub use chrono;

// 日志
pub use log;

// 错误处理
pub use thiserror;

// UUID
pub use uuid;

// ============================================================================
// 内部模块
// ============================================================================

/// 行情注册表与模拟行情源
pub mod market;

/// 交易所核心业务逻辑（账户/持仓/订单/账本）
pub mod exchange;

/// 只读查询层（排行榜）
pub mod query;

/// 工具模块（配置）
pub mod utils;

// ============================================================================
// 重导出常用类型
// ============================================================================

pub use exchange::{AccountManager, LedgerEngine, OrderBook, PositionStore};
pub use market::{MarketQuote, MarketRegistry, PriceType};
pub use query::Leaderboard;
pub use utils::config::ExchangeConfig;

// ============================================================================
// 全局错误类型
// ============================================================================

/// 交易所错误类型
///
/// 每个边界错误一个变体，外部请求层按变体映射响应；
/// 引擎内部绝不吞错，也没有重试逻辑。
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Trade not found: {0}")]
    TradeNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid market: {0}")]
    InvalidMarket(String),

    #[error("Invalid side: {0}")]
    InvalidSide(String),

    #[error("Invalid units: {0}")]
    InvalidUnits(String),

    #[error("Invalid order type: {0}")]
    InvalidOrderType(String),

    #[error("Invalid price type: {0}")]
    InvalidPriceType(String),

    #[error("Insufficient buying power: {0}")]
    InsufficientFunds(String),

    #[error("Insufficient available units: {0}")]
    InsufficientAvailableUnits(String),

    #[error("Order cannot be canceled: {0}")]
    CannotCancel(String),

    /// 订单引用的持仓不存在等引用完整性破坏，属于程序缺陷而非用户错误
    #[error("Integrity error: {0}")]
    IntegrityError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IOError(String),
}
