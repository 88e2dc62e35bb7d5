// ==========================================
// 灌装线排产引擎 - 活动领域模型
// ==========================================
// 职责: 时间线上的具体活动 (灌装/换型/清洁)
// 红线: 同一产线的活动链严格有序、无重叠、无空隙:
//       activities[i].end == activities[i+1].start
// ==========================================

use crate::domain::types::ActivityKind;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 小时数 -> chrono 时长 (毫秒精度)
pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

/// 两个时刻的间隔 (小时)
pub fn span_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

// ==========================================
// ActivityDetail - 活动载荷
// ==========================================
// FILL 引用批次, CHANGEOVER 记录前后类型, CLEAN 无引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityDetail {
    Fill {
        lot_id: String,
        lot_type: String,
        quantity: u32,
    },
    Changeover {
        from_type: String,
        to_type: String,
    },
    Clean,
}

impl ActivityDetail {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityDetail::Fill { .. } => ActivityKind::Fill,
            ActivityDetail::Changeover { .. } => ActivityKind::Changeover,
            ActivityDetail::Clean => ActivityKind::Clean,
        }
    }
}

// ==========================================
// Activity - 时间线活动
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub line_id: String,          // 产线代码
    pub start: DateTime<Utc>,     // 开始时刻
    pub end: DateTime<Utc>,       // 结束时刻 (end > start)
    #[serde(flatten)]
    pub detail: ActivityDetail,   // 活动载荷
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        self.detail.kind()
    }

    /// 活动时长 (小时)
    pub fn duration_hours(&self) -> f64 {
        span_hours(self.start, self.end)
    }

    /// FILL 活动引用的批次号
    pub fn lot_id(&self) -> Option<&str> {
        match &self.detail {
            ActivityDetail::Fill { lot_id, .. } => Some(lot_id),
            _ => None,
        }
    }
}
