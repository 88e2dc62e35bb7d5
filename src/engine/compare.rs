// ==========================================
// 灌装线排产引擎 - 策略运行与多策略对比
// ==========================================
// 职责: 协调 策略排序 -> 时间线推演 -> KPI 的完整单次运行,
//       以及多策略并行试算与对比汇总
// 红线: 每次策略运行持有独立工作集,任务间无共享可变状态;
//       单个策略失败只影响自身行,不污染其他策略的结果
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::lot::Lot;
use crate::domain::schedule::Schedule;
use crate::domain::types::{ComparisonSort, SolveStatus, StrategyKind};
use crate::engine::error::ScheduleError;
use crate::engine::simulator::TimelineSimulator;
use crate::engine::strategies::order_lots;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

// ==========================================
// StrategyRun - 单次策略运行结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRun {
    pub strategy: StrategyKind,
    /// 精确求解状态标记 (启发式为 None)
    pub solve_status: Option<SolveStatus>,
    pub schedule: Schedule,
}

// ==========================================
// StrategyFailure - 策略级失败 (只中止该策略的运行)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyFailure {
    pub strategy: StrategyKind,
    pub error: String,
}

// ==========================================
// ComparisonReport - 多策略对比报表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub sort: ComparisonSort,
    /// 成功运行的策略行,按 sort 维度排好序
    pub runs: Vec<StrategyRun>,
    /// 失败的策略行 (例如精确求解规模超限)
    pub failures: Vec<StrategyFailure>,
}

/// 运行单个策略: 排序 -> 推演 -> KPI
///
/// 配置在进入任何推演前全量校验
#[instrument(skip(lots, cfg), fields(strategy = %strategy, lots_count = lots.len()))]
pub fn run_strategy(
    strategy: StrategyKind,
    lots: &[Lot],
    start_time: DateTime<Utc>,
    cfg: &ScheduleConfig,
) -> Result<StrategyRun, ScheduleError> {
    cfg.validate()?;

    let ordering = order_lots(strategy, lots, start_time, cfg)?;
    let schedule = TimelineSimulator::new().expand(&ordering.lots, start_time, cfg);

    info!(
        scheduled = schedule.kpi.lots_scheduled,
        skipped = schedule.kpi.lots_skipped,
        makespan_hours = schedule.kpi.makespan_hours,
        "策略运行完成"
    );

    Ok(StrategyRun {
        strategy,
        solve_status: ordering.solve_status,
        schedule,
    })
}

/// 按配置中的默认策略运行一次排产
pub fn plan_schedule(
    lots: &[Lot],
    start_time: DateTime<Utc>,
    cfg: &ScheduleConfig,
) -> Result<StrategyRun, ScheduleError> {
    run_strategy(cfg.strategy, lots, start_time, cfg)
}

/// 多策略并行试算与对比
///
/// 各策略在 spawn_blocking 上独立运行 (计算密集),仅共享只读输入;
/// 汇总是简单 join,任务间无顺序依赖
#[instrument(skip(lots, cfg, strategies), fields(lots_count = lots.len(), strategies_count = strategies.len()))]
pub async fn compare_strategies(
    lots: Vec<Lot>,
    start_time: DateTime<Utc>,
    cfg: ScheduleConfig,
    strategies: Vec<StrategyKind>,
    sort: ComparisonSort,
) -> Result<ComparisonReport, ScheduleError> {
    // 配置错误在派发任何任务前一次性拒绝
    cfg.validate()?;

    let mut handles = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let task_lots = lots.clone();
        let task_cfg = cfg.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            (strategy, run_strategy(strategy, &task_lots, start_time, &task_cfg))
        }));
    }

    let mut runs: Vec<StrategyRun> = Vec::new();
    let mut failures: Vec<StrategyFailure> = Vec::new();
    for joined in futures::future::join_all(handles).await {
        match joined {
            Ok((_, Ok(run))) => runs.push(run),
            Ok((strategy, Err(e))) => {
                warn!(strategy = %strategy, error = %e, "策略运行失败, 不影响其他策略");
                failures.push(StrategyFailure {
                    strategy,
                    error: e.to_string(),
                });
            }
            Err(join_err) => {
                // spawn_blocking 任务本身异常 (不可恢复的任务级失败)
                warn!(error = %join_err, "策略任务异常终止");
            }
        }
    }

    sort_runs(&mut runs, sort);
    debug!(
        runs = runs.len(),
        failures = failures.len(),
        "多策略对比完成"
    );

    Ok(ComparisonReport {
        sort,
        runs,
        failures,
    })
}

/// 对比行排序: 平局按策略名,保证报表顺序确定
fn sort_runs(runs: &mut [StrategyRun], sort: ComparisonSort) {
    match sort {
        ComparisonSort::ByMakespan => runs.sort_by(|a, b| {
            a.schedule
                .kpi
                .makespan_hours
                .total_cmp(&b.schedule.kpi.makespan_hours)
                .then_with(|| a.strategy.as_str().cmp(b.strategy.as_str()))
        }),
        ComparisonSort::ByUtilization => runs.sort_by(|a, b| {
            b.schedule
                .kpi
                .utilization
                .total_cmp(&a.schedule.kpi.utilization)
                .then_with(|| a.strategy.as_str().cmp(b.strategy.as_str()))
        }),
    }
}
