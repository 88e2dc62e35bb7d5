// ==========================================
// 灌装线排产引擎 - 引擎层
// ==========================================
// 职责: 排序策略、时间线推演、KPI 汇总、精确求解、对比与校验
// 红线: 引擎纯计算、无 I/O; 所有策略共用同一推演器保证横向可比;
//       规则必须输出 reason (跳过原因/错误上下文可解释)
// ==========================================

pub mod compare;
pub mod error;
pub mod exact;
pub mod kpi;
pub mod rules;
pub mod sequence;
pub mod simulator;
pub mod strategies;
pub mod verify;

// 重导出核心引擎
pub use compare::{
    compare_strategies, plan_schedule, run_strategy, ComparisonReport, StrategyFailure,
    StrategyRun,
};
pub use error::ScheduleError;
pub use exact::{BranchBoundSolver, ExactPack, SequenceSolver, SequencingModel, SolveOutcome};
pub use kpi::KpiAggregator;
pub use rules::changeover_hours;
pub use sequence::{order_lots_by_sequence, SequenceOrdering};
pub use simulator::TimelineSimulator;
pub use strategies::{
    order_lots, CfsPack, HybridPack, LptPack, OrderingResult, SmartPack, SptPack,
};
pub use verify::{ScheduleVerifier, VerifyReport};
