// ==========================================
// 灌装线排产引擎 - 引擎错误类型
// ==========================================
// 职责: 定义引擎层错误,所有错误信息包含显式上下文 (可解释性)
// 工具: thiserror 派生宏
// ==========================================
// 注: 跳过批次 (SkippedLot) 是记录型结果,不在错误分类内;
//     求解时限截断 (TIME_LIMITED) 是告警级结果,同样不在此处
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    // ===== 配置错误 =====
    /// 配置项越界或无法解析,推演开始前即拒绝
    #[error("配置无效 ({field}): {reason}")]
    InvalidConfiguration { field: String, reason: String },

    // ===== 精确求解错误 =====
    /// 实例规模超过求解上限,拒绝求解 (调用方应回退到启发式策略)
    #[error("精确求解规模超限: {what} {actual} 超过上限 {limit}, 请改用启发式策略")]
    CapacityExceeded {
        what: String, // 超限维度: 批次数 / 清洁块数
        actual: usize,
        limit: usize,
    },

    /// 时限耗尽且未找到任何可行排列
    #[error("精确求解无可行解: {time_limit_secs}s 时限内未找到满足约束的完整排列")]
    NoFeasibleSolution { time_limit_secs: u64 },
}
