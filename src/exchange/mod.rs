//! 交易所核心业务模块
//!
//! 账户/持仓/订单三个存储加上唯一的写入者——账本引擎。

/// 账户管理中心
pub mod account_mgr;

/// 持仓存储（含预留计数）
pub mod position;

/// 订单簿（订单存在性的唯一所有者）
pub mod order_book;

/// 账本引擎（开仓/预留/释放/NAV 重算）
pub mod ledger;

/// 交易所边界类型定义
pub mod exchange_types;

// 重导出核心类型
pub use account_mgr::{Account, AccountManager};
pub use exchange_types::{
    AccountSnapshot, LeaderboardEntry, OrderSnapshot, QuoteUpdate, TradeSnapshot,
};
pub use ledger::LedgerEngine;
pub use order_book::{Order, OrderBook, OrderType};
pub use position::{PositionStore, Side, Trade};
