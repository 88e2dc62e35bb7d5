// ==========================================
// 灌装线排产引擎 - 排程结果领域模型
// ==========================================
// 职责: 单次策略运行的终态输出 (不可变) + KPI 汇总记录
// 红线: 只是结果快照,无行为,可直接交给外部报表/传输层序列化
// ==========================================

use crate::domain::activity::Activity;
use crate::domain::types::ActivityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// SkippedLot - 被跳过的批次
// ==========================================
// 记录型结果,不是错误: 交付窗口在推演序列下无法满足
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedLot {
    pub lot_id: String,   // 批次号
    pub lot_type: String, // 产品类型
    pub reason: String,   // 跳过原因 (可解释性)
}

// ==========================================
// ScheduleKpi - KPI 汇总记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    pub lots_scheduled: usize,         // 已排批次数
    pub lots_skipped: usize,           // 跳过批次数
    pub changeover_count: usize,       // 换型次数
    pub clean_count: usize,            // 清洁次数
    pub total_fill_hours: f64,         // 灌装总时长
    pub total_changeover_hours: f64,   // 换型总时长
    pub total_clean_hours: f64,        // 清洁总时长
    pub makespan_hours: f64,           // 总工期 (末活动结束 - 首活动开始)
    pub utilization: f64,              // 利用率 = 灌装总时长 / 总工期
    pub skipped_lot_ids: Vec<String>,  // 跳过批次号列表
}

impl ScheduleKpi {
    /// 空排程的 KPI (全零)
    pub fn empty() -> Self {
        Self {
            lots_scheduled: 0,
            lots_skipped: 0,
            changeover_count: 0,
            clean_count: 0,
            total_fill_hours: 0.0,
            total_changeover_hours: 0.0,
            total_clean_hours: 0.0,
            makespan_hours: 0.0,
            utilization: 0.0,
            skipped_lot_ids: Vec::new(),
        }
    }
}

// ==========================================
// Schedule - 排程结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub line_id: String,              // 产线代码
    pub start_time: DateTime<Utc>,    // 推演起始时刻
    pub activities: Vec<Activity>,    // 有序活动链 (无空隙)
    pub skipped: Vec<SkippedLot>,     // 跳过批次
    pub makespan_hours: f64,          // 总工期
    pub kpi: ScheduleKpi,             // KPI 汇总
}

impl Schedule {
    /// 无任何活动的空排程
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// 已排灌装活动数
    pub fn fill_count(&self) -> usize {
        self.activities
            .iter()
            .filter(|a| a.kind() == ActivityKind::Fill)
            .count()
    }
}
