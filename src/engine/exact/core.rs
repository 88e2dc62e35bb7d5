// ==========================================
// 精确求解 - 策略入口与求解器接口
// ==========================================
// 职责: 规模前置检查 -> 编译模型 -> 调用注入的求解后端 -> 还原批次排列
// 接口: SequenceSolver::solve(model, time_limit) -> SolveOutcome
//       后端可替换,默认链接内置分支定界
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::lot::Lot;
use crate::domain::types::SolveStatus;
use crate::engine::error::ScheduleError;
use crate::engine::exact::branch_bound::BranchBoundSolver;
use crate::engine::exact::model::SequencingModel;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{info, instrument, warn};

// ==========================================
// SolveOutcome - 求解结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// 最优/最好可行排列 (模型内批次下标)
    pub order: Vec<usize>,
    /// 对应总工期 (小时)
    pub makespan_hours: f64,
    /// 对应换型总时长 (目标函数平局项)
    pub total_changeover_hours: f64,
    /// OPTIMAL: 已证明最优; TIME_LIMITED: 时限截断的可行解
    pub status: SolveStatus,
}

// ==========================================
// SequenceSolver - 求解器接口 (注入能力)
// ==========================================
pub trait SequenceSolver: Send + Sync {
    /// 在墙钟时限内求解定序模型
    ///
    /// 约定: 必须支持协作式取消 —— 时限耗尽时返回已找到的最好可行解
    /// (TIME_LIMITED), 而不是让调用方无限阻塞; 无可行解则返回
    /// NoFeasibleSolution 错误
    fn solve(
        &self,
        model: &SequencingModel,
        time_limit: Duration,
    ) -> Result<SolveOutcome, ScheduleError>;
}

// ==========================================
// ExactPack - 精确求解策略
// ==========================================
pub struct ExactPack {
    solver: Box<dyn SequenceSolver>,
}

impl ExactPack {
    /// 默认后端: 内置分支定界
    pub fn new() -> Self {
        Self {
            solver: Box::new(BranchBoundSolver::new()),
        }
    }

    /// 注入自定义求解后端
    pub fn with_solver(solver: Box<dyn SequenceSolver>) -> Self {
        Self { solver }
    }

    /// 求精确总排列
    ///
    /// # 前置 (硬约束, 违反即拒绝)
    /// - 批次数 <= exact.max_lots
    /// - 按灌装时长估计的清洁块数下界 <= exact.max_blocks
    ///
    /// # 返回
    /// - Ok((排列, OPTIMAL)): 已证明最优
    /// - Ok((排列, TIME_LIMITED)): 时限截断,可行但未证最优 (告警级)
    /// - Err(CapacityExceeded / NoFeasibleSolution)
    #[instrument(skip(self, lots, cfg), fields(lots_count = lots.len()))]
    pub fn order(
        &self,
        lots: &[Lot],
        start_time: DateTime<Utc>,
        cfg: &ScheduleConfig,
    ) -> Result<(Vec<Lot>, SolveStatus), ScheduleError> {
        if lots.len() > cfg.exact.max_lots {
            return Err(ScheduleError::CapacityExceeded {
                what: "批次数".to_string(),
                actual: lots.len(),
                limit: cfg.exact.max_lots,
            });
        }
        if lots.is_empty() {
            return Ok((Vec::new(), SolveStatus::Optimal));
        }

        let model = SequencingModel::build(lots, start_time, cfg);
        let min_blocks = model.min_blocks_lower_bound();
        if min_blocks > cfg.exact.max_blocks {
            return Err(ScheduleError::CapacityExceeded {
                what: "清洁块数".to_string(),
                actual: min_blocks,
                limit: cfg.exact.max_blocks,
            });
        }

        let time_limit = Duration::from_secs(cfg.exact.time_limit_secs);
        let outcome = self.solver.solve(&model, time_limit)?;

        match outcome.status {
            SolveStatus::Optimal => info!(
                makespan_hours = outcome.makespan_hours,
                changeover_hours = outcome.total_changeover_hours,
                "精确求解完成, 已证明最优"
            ),
            SolveStatus::TimeLimited => warn!(
                makespan_hours = outcome.makespan_hours,
                time_limit_secs = cfg.exact.time_limit_secs,
                "精确求解时限截断, 返回最好可行解 (未证最优)"
            ),
        }

        let ordered = outcome.order.iter().map(|&i| lots[i].clone()).collect();
        Ok((ordered, outcome.status))
    }
}

impl Default for ExactPack {
    fn default() -> Self {
        Self::new()
    }
}
