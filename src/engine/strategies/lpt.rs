// ==========================================
// 灌装线排产引擎 - 长单优先策略 (LPT)
// ==========================================
// 排序键: 灌装时长降序, 平局按 priority 再按批次号
// 倾向提升窗口利用率,可能增加换型次数
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::lot::Lot;

// ==========================================
// LptPack - 长单优先
// ==========================================
pub struct LptPack {
    // 无状态策略,不需要注入依赖
}

impl LptPack {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 按灌装时长降序排列
    pub fn order(&self, lots: &[Lot], cfg: &ScheduleConfig) -> Vec<Lot> {
        let mut ordered = lots.to_vec();
        ordered.sort_by(|a, b| {
            b.fill_hours(cfg.fill_rate_vph)
                .total_cmp(&a.fill_hours(cfg.fill_rate_vph))
                .then_with(|| a.priority.cmp(&b.priority))
                .then_with(|| a.lot_id.cmp(&b.lot_id))
        });
        ordered
    }
}

impl Default for LptPack {
    fn default() -> Self {
        Self::new()
    }
}
