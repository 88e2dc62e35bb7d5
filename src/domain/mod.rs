// ==========================================
// 灌装线排产引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型与派生值规则
// 红线: 不含引擎逻辑,不含 I/O; 实体除校验外无行为
// ==========================================

pub mod activity;
pub mod line;
pub mod lot;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use activity::{hours_to_duration, span_hours, Activity, ActivityDetail};
pub use line::LineState;
pub use lot::Lot;
pub use schedule::{Schedule, ScheduleKpi, SkippedLot};
pub use types::{
    ActivityKind, ClusterOrder, ComparisonSort, SolveStatus, StrategyKind, WithinOrder,
};
