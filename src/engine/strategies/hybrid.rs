// ==========================================
// 灌装线排产引擎 - 混合贪心策略 (Hybrid)
// ==========================================
// 逐步贪心: 每步在剩余批次中选取加权成本最小者,不做全局排序
// 成本为二级字典序:
// - 主成本: 换型小时数, 切换类型乘 switch_penalty_mult,
//   同型续跑减 same_type_bonus;
// - 次成本: SPT 偏好 (spt_weight * 灌装时长), 仅在同型连跑内生效,
//   不参与 续跑/切换 之间的取舍
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::lot::Lot;
use crate::engine::rules::changeover_hours;
use std::cmp::Ordering;

// ==========================================
// HybridPack - 混合贪心
// ==========================================
pub struct HybridPack {
    // 无状态策略,不需要注入依赖
}

impl HybridPack {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 逐步贪心构造总排列
    ///
    /// 平局取输入顺序靠前者 (严格小于才替换),保证可复现
    pub fn order(&self, lots: &[Lot], cfg: &ScheduleConfig) -> Vec<Lot> {
        let mut remaining: Vec<Lot> = lots.to_vec();
        let mut ordered: Vec<Lot> = Vec::with_capacity(remaining.len());
        let mut last_type: Option<String> = None;

        while !remaining.is_empty() {
            let mut best_idx = 0usize;
            let mut best_cost = self.step_cost(last_type.as_deref(), &remaining[0], cfg);
            for (i, cand) in remaining.iter().enumerate().skip(1) {
                let cost = self.step_cost(last_type.as_deref(), cand, cfg);
                if compare_cost(cost, best_cost) == Ordering::Less {
                    best_cost = cost;
                    best_idx = i;
                }
            }
            let lot = remaining.remove(best_idx);
            last_type = Some(lot.lot_type.clone());
            ordered.push(lot);
        }
        ordered
    }

    /// 单步成本 (主成本, 次成本), 越小越优
    fn step_cost(&self, prev_type: Option<&str>, lot: &Lot, cfg: &ScheduleConfig) -> (f64, f64) {
        let chg = changeover_hours(prev_type, &lot.lot_type, cfg);
        // 无类型记忆时视为续跑 (无切换惩罚, SPT 偏好生效)
        let same_run = prev_type.map_or(true, |p| p == lot.lot_type);

        if same_run {
            (
                chg - cfg.hybrid.same_type_bonus,
                cfg.hybrid.spt_weight * lot.fill_hours(cfg.fill_rate_vph),
            )
        } else {
            (chg * cfg.hybrid.switch_penalty_mult, 0.0)
        }
    }
}

impl Default for HybridPack {
    fn default() -> Self {
        Self::new()
    }
}

/// 二级字典序比较
fn compare_cost(a: (f64, f64), b: (f64, f64)) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1))
}
