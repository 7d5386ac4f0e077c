//! 排行榜
//!
//! 账户按 NAV 降序的分页投影。NAV 相同者按用户名升序排列，
//! 保证分页结果确定（原始设计未规定并列次序，这里固定下来）。

use std::sync::Arc;

use crate::exchange::exchange_types::LeaderboardEntry;
use crate::exchange::AccountManager;
use crate::ExchangeError;

/// 排行榜查询
pub struct Leaderboard {
    account_mgr: Arc<AccountManager>,
}

impl Leaderboard {
    pub fn new(account_mgr: Arc<AccountManager>) -> Self {
        Self { account_mgr }
    }

    /// 第 page 页（从 1 起），每页 page_size 条
    pub fn rank(&self, page: usize, page_size: usize) -> Result<Vec<LeaderboardEntry>, ExchangeError> {
        if page < 1 || page_size < 1 {
            return Err(ExchangeError::InvalidParameter(format!(
                "page and page_size must be >= 1, got page={} page_size={}",
                page, page_size
            )));
        }

        let mut entries: Vec<LeaderboardEntry> = self
            .account_mgr
            .get_all_accounts()
            .iter()
            .map(|account| {
                let acc = account.read();
                LeaderboardEntry {
                    username: acc.username.clone(),
                    nav: acc.nav,
                }
            })
            .collect();

        // NAV 降序，并列按用户名升序
        entries.sort_by(|a, b| {
            b.nav
                .partial_cmp(&a.nav)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.username.cmp(&b.username))
        });

        let offset = (page - 1) * page_size;
        Ok(entries.into_iter().skip(offset).take(page_size).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mgr_with_navs(navs: &[(&str, f64)]) -> Arc<AccountManager> {
        let mgr = Arc::new(AccountManager::new(100.0));
        for (name, nav) in navs {
            mgr.open_account(name).unwrap();
            let account = mgr.get_account(name).unwrap();
            account.write().nav = *nav;
        }
        mgr
    }

    // ==================== 排序测试 ====================

    /// NAV 降序
    #[test]
    fn test_rank_orders_by_nav_desc() {
        let mgr = mgr_with_navs(&[("alice", 100.0), ("bob", 43.825)]);
        let board = Leaderboard::new(mgr);

        let entries = board.rank(1, 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].username, "alice");
        assert_eq!(entries[0].nav, 100.0);
        assert_eq!(entries[1].username, "bob");
    }

    /// 并列 NAV 按用户名升序
    #[test]
    fn test_rank_ties_broken_by_username() {
        let mgr = mgr_with_navs(&[("carol", 50.0), ("alice", 50.0), ("bob", 50.0)]);
        let board = Leaderboard::new(mgr);

        let entries = board.rank(1, 10).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    // ==================== 分页测试 ====================

    /// 分页偏移 = (page-1) × page_size
    #[test]
    fn test_rank_pagination() {
        let mgr = mgr_with_navs(&[
            ("u1", 500.0),
            ("u2", 400.0),
            ("u3", 300.0),
            ("u4", 200.0),
            ("u5", 100.0),
        ]);
        let board = Leaderboard::new(mgr);

        let page1 = board.rank(1, 2).unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].username, "u1");
        assert_eq!(page1[1].username, "u2");

        let page2 = board.rank(2, 2).unwrap();
        assert_eq!(page2[0].username, "u3");
        assert_eq!(page2[1].username, "u4");

        let page3 = board.rank(3, 2).unwrap();
        assert_eq!(page3.len(), 1);
        assert_eq!(page3[0].username, "u5");

        // 越界页是空列表而非错误
        let page4 = board.rank(4, 2).unwrap();
        assert!(page4.is_empty());
    }

    /// 入参校验
    #[test]
    fn test_rank_validates_parameters() {
        let mgr = mgr_with_navs(&[("alice", 100.0)]);
        let board = Leaderboard::new(mgr);

        assert!(matches!(
            board.rank(0, 10),
            Err(ExchangeError::InvalidParameter(_))
        ));
        assert!(matches!(
            board.rank(1, 0),
            Err(ExchangeError::InvalidParameter(_))
        ));
    }

    /// 空账户集
    #[test]
    fn test_rank_empty() {
        let mgr = Arc::new(AccountManager::new(100.0));
        let board = Leaderboard::new(mgr);

        assert!(board.rank(1, 10).unwrap().is_empty());
    }
}
