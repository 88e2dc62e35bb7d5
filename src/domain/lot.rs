// ==========================================
// 灌装线排产引擎 - 批次领域模型
// ==========================================
// 职责: 批次 (Lot) 实体定义,输入数据只读
// 红线: 灌装时长是派生值 (瓶数 / 灌装速率),不落字段
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Lot - 生产批次
// ==========================================
// 引擎输入,调度过程中不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub lot_id: String,   // 批次号 (全局唯一)
    pub lot_type: String, // 产品类型 (换型判定依据)
    pub quantity: u32,    // 瓶数 (> 0)

    /// 排序提示,数值越小越紧急
    #[serde(default)]
    pub priority: i32,

    /// 交付窗口起点 (可选)。引擎不插入等待,早于窗口起点到达的批次会被跳过
    #[serde(default)]
    pub window_start: Option<DateTime<Utc>>,

    /// 交付窗口终点 (可选)。灌装开始时刻晚于终点的批次会被跳过
    #[serde(default)]
    pub window_end: Option<DateTime<Utc>>,
}

impl Lot {
    /// 创建无交付窗口的批次 (默认优先级)
    pub fn new(lot_id: impl Into<String>, lot_type: impl Into<String>, quantity: u32) -> Self {
        Self {
            lot_id: lot_id.into(),
            lot_type: lot_type.into(),
            quantity,
            priority: 0,
            window_start: None,
            window_end: None,
        }
    }

    /// 灌装时长 (小时) = 瓶数 / 灌装速率
    pub fn fill_hours(&self, fill_rate_vph: f64) -> f64 {
        f64::from(self.quantity) / fill_rate_vph
    }

    /// 是否带交付窗口约束
    pub fn has_window(&self) -> bool {
        self.window_start.is_some() || self.window_end.is_some()
    }
}
