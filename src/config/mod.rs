// ==========================================
// 灌装线排产引擎 - 配置层
// ==========================================
// 职责: 工艺常量与策略参数管理
// 红线: 所有配置在进入推演前一次性校验,绝不部分生效
// ==========================================

pub mod schedule_config;

// 重导出核心配置类型
pub use schedule_config::{
    CfsPackConfig, ExactConfig, HybridPackConfig, ScheduleConfig, SmartPackConfig,
};
