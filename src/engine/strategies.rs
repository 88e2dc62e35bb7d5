// ==========================================
// 灌装线排产引擎 - 排序策略族
// ==========================================
// 职责: 可插拔的批次排序策略,产出未定时的批次总排列,
//       再交由时间线推演器统一展开
// 红线: 策略集合封闭,match 分发; 等分候选保持输入相对顺序 (可复现)
// ==========================================

mod cfs;
mod hybrid;
mod lpt;
mod smart;
mod spt;


pub use cfs::CfsPack;
pub use hybrid::HybridPack;
pub use lpt::LptPack;
pub use smart::SmartPack;
pub use spt::SptPack;

use crate::config::ScheduleConfig;
use crate::domain::lot::Lot;
use crate::domain::types::{SolveStatus, StrategyKind};
use crate::engine::error::ScheduleError;
use crate::engine::exact::ExactPack;
use chrono::{DateTime, Utc};

// ==========================================
// OrderingResult - 策略排序结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingResult {
    /// 批次总排列 (含推演时可能被跳过的批次)
    pub lots: Vec<Lot>,
    /// 精确求解的状态标记 (启发式策略为 None)
    pub solve_status: Option<SolveStatus>,
}

/// 按策略产出批次总排列 (封闭集合分发)
///
/// 启发式策略不会失败; 精确求解可能因规模超限或无可行解而失败,
/// 调用方据此回退到启发式策略
pub fn order_lots(
    strategy: StrategyKind,
    lots: &[Lot],
    start_time: DateTime<Utc>,
    cfg: &ScheduleConfig,
) -> Result<OrderingResult, ScheduleError> {
    let ordered = match strategy {
        StrategyKind::SptPack => SptPack::new().order(lots, cfg),
        StrategyKind::LptPack => LptPack::new().order(lots, cfg),
        StrategyKind::CfsPack => CfsPack::new().order(lots, cfg),
        StrategyKind::HybridPack => HybridPack::new().order(lots, cfg),
        StrategyKind::SmartPack => SmartPack::new().order(lots, start_time, cfg),
        StrategyKind::ExactOpt => {
            let (lots, status) = ExactPack::new().order(lots, start_time, cfg)?;
            return Ok(OrderingResult {
                lots,
                solve_status: Some(status),
            });
        }
    };

    Ok(OrderingResult {
        lots: ordered,
        solve_status: None,
    })
}
