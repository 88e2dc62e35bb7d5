// ==========================================
// 灌装线排产引擎 - 核心库
// ==========================================
// 系统定位: 纯计算引擎 (上层传输/持久化/报表由外部协作方适配)
// 核心流程: 批次 + 配置 -> 策略排序 -> 时间线推演 -> KPI 对比
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排序策略/推演/求解/校验
pub mod engine;

// 配置层 - 工艺常量与策略参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ActivityKind, ClusterOrder, ComparisonSort, SolveStatus, StrategyKind, WithinOrder,
};

// 领域实体
pub use domain::{Activity, ActivityDetail, LineState, Lot, Schedule, ScheduleKpi, SkippedLot};

// 配置
pub use config::{CfsPackConfig, ExactConfig, HybridPackConfig, ScheduleConfig, SmartPackConfig};

// 引擎
pub use engine::{
    compare_strategies, order_lots, plan_schedule, run_strategy, BranchBoundSolver,
    ComparisonReport, ExactPack, KpiAggregator, ScheduleError, ScheduleVerifier, SequenceSolver,
    StrategyFailure, StrategyRun, TimelineSimulator, VerifyReport,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "灌装线排产引擎";

// ==========================================
// 预编译检查
// ==========================================
