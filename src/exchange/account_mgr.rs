//! 账户管理中心
//!
//! 负责账户的开户、查询、重置。余额字段只有账本引擎和 reset 会改写；
//! 默认购买力在构造时注入，测试可以用不同默认值实例化隔离的管理器。

use std::sync::Arc;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::exchange::exchange_types::AccountSnapshot;
use crate::ExchangeError;

/// 账户
#[derive(Debug, Clone)]
pub struct Account {
    /// 用户名（不可变主键）
    pub username: String,

    /// 购买力（未占用现金）
    pub buying_power: f64,

    /// 净值 = 购买力 + 持仓名义价值，由 NAV 重算维护
    pub nav: f64,

    /// 创建时间
    pub created_at: String,
}

impl Account {
    fn new(username: &str, buying_power: f64) -> Self {
        Self {
            username: username.to_string(),
            buying_power,
            nav: buying_power,
            created_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            username: self.username.clone(),
            buying_power: self.buying_power,
            nav: self.nav,
            created_at: self.created_at.clone(),
        }
    }
}

/// 账户管理器
pub struct AccountManager {
    /// 账户映射 (username -> Account)
    accounts: DashMap<String, Arc<RwLock<Account>>>,

    /// 新账户与重置使用的默认购买力
    default_buying_power: f64,
}

impl AccountManager {
    pub fn new(default_buying_power: f64) -> Self {
        Self {
            accounts: DashMap::new(),
            default_buying_power,
        }
    }

    /// 开户，用户名已存在时拒绝
    pub fn open_account(&self, username: &str) -> Result<String, ExchangeError> {
        // entry API 保证存在性检查与插入原子完成
        match self.accounts.entry(username.to_string()) {
            Entry::Occupied(_) => Err(ExchangeError::AccountAlreadyExists(username.to_string())),
            Entry::Vacant(e) => {
                let account = Account::new(username, self.default_buying_power);
                e.insert(Arc::new(RwLock::new(account)));

                log::info!(
                    "Account opened: {} (buying_power: {})",
                    username,
                    self.default_buying_power
                );

                Ok(username.to_string())
            }
        }
    }

    /// 查询账户（共享句柄，调用方自行加锁）
    pub fn get_account(&self, username: &str) -> Result<Arc<RwLock<Account>>, ExchangeError> {
        self.accounts
            .get(username)
            .map(|r| r.value().clone())
            .ok_or_else(|| ExchangeError::AccountNotFound(username.to_string()))
    }

    /// 查询账户快照
    pub fn get_snapshot(&self, username: &str) -> Result<AccountSnapshot, ExchangeError> {
        let account = self.get_account(username)?;
        let snap = account.read().snapshot();
        Ok(snap)
    }

    /// 重置账户：购买力与净值回到默认值
    ///
    /// 刻意不触碰该账户的持仓和订单（与原始行为一致）；
    /// 残留持仓会在下一次 NAV 重算时重新计入净值。
    pub fn reset_account(&self, username: &str) -> Result<(), ExchangeError> {
        let account = self.get_account(username)?;

        let mut acc = account.write();
        acc.buying_power = self.default_buying_power;
        acc.nav = self.default_buying_power;

        log::info!("Account reset: {}", username);
        Ok(())
    }

    /// 获取所有账户
    pub fn get_all_accounts(&self) -> Vec<Arc<RwLock<Account>>> {
        self.accounts.iter().map(|r| r.value().clone()).collect()
    }

    /// 获取账户数量
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// 构造时注入的默认购买力
    pub fn default_buying_power(&self) -> f64 {
        self.default_buying_power
    }
}
