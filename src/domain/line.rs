// ==========================================
// 灌装线排产引擎 - 产线状态
// ==========================================
// 职责: 时间线推演过程中的可变产线状态
// 生命周期: 推演开始时创建,逐步推进,排程完成后丢弃
// ==========================================

use chrono::{DateTime, Utc};

// ==========================================
// LineState - 产线推演状态
// ==========================================
// elapsed_since_clean 自上次清洁起单调累加 (换型时间计入),
// 清洁活动将其归零; last_lot_type 跨清洁保留 (类型记忆)
#[derive(Debug, Clone, PartialEq)]
pub struct LineState {
    pub clock: DateTime<Utc>,          // 当前时刻
    pub elapsed_since_clean: f64,      // 自上次清洁起累计运行小时
    pub last_lot_type: Option<String>, // 上一灌装批次类型 (首灌前为空)
}

impl LineState {
    /// 推演起点: 窗口全新,无类型记忆
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            clock: start_time,
            elapsed_since_clean: 0.0,
            last_lot_type: None,
        }
    }
}
