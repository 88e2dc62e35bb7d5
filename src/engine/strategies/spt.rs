// ==========================================
// 灌装线排产引擎 - 短单优先策略 (SPT)
// ==========================================
// 排序键: 灌装时长升序, 平局按 priority 再按批次号
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::lot::Lot;

// ==========================================
// SptPack - 短单优先
// ==========================================
pub struct SptPack {
    // 无状态策略,不需要注入依赖
}

impl SptPack {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 按灌装时长升序排列
    pub fn order(&self, lots: &[Lot], cfg: &ScheduleConfig) -> Vec<Lot> {
        let mut ordered = lots.to_vec();
        ordered.sort_by(|a, b| {
            a.fill_hours(cfg.fill_rate_vph)
                .total_cmp(&b.fill_hours(cfg.fill_rate_vph))
                .then_with(|| a.priority.cmp(&b.priority))
                .then_with(|| a.lot_id.cmp(&b.lot_id))
        });
        ordered
    }
}

impl Default for SptPack {
    fn default() -> Self {
        Self::new()
    }
}
