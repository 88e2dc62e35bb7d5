// ==========================================
// 精确求解 - 内置分支定界后端
// ==========================================
// 职责: SequenceSolver 的默认实现
// 算法: 深度优先分支定界
// - 分支: 在部分排列尾部追加任一未排批次,块容量/交付窗口不满足即剪;
// - 定界: 下界 = 当前时钟 + 剩余灌装总时长, 超过在位解即剪;
// - 目标: 总工期最小,平局取换型总时长最小;
// - 取消: 逐批节点检查墙钟时限,超时返回在位最好可行解
// ==========================================

use crate::domain::types::SolveStatus;
use crate::engine::error::ScheduleError;
use crate::engine::exact::core::{SequenceSolver, SolveOutcome};
use crate::engine::exact::model::SequencingModel;
use crate::engine::rules::EPS_HOURS;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

// 每隔多少节点检查一次时限
const DEADLINE_CHECK_MASK: u64 = 0xFF;

// ==========================================
// BranchBoundSolver - 分支定界求解器
// ==========================================
pub struct BranchBoundSolver {
    // 无状态求解器,不需要注入依赖
}

impl BranchBoundSolver {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for BranchBoundSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// 在位最好可行解
struct Incumbent {
    order: Vec<usize>,
    makespan_hours: f64,
    changeover_hours: f64,
}

/// 部分排列的推演量
#[derive(Clone)]
struct Partial {
    order: Vec<usize>,
    used: Vec<bool>,
    clock_hours: f64,          // 距起点小时数
    elapsed_since_clean: f64,  // 当前块已用容量
    blocks: usize,             // 已开块数 (含当前块)
    last: Option<usize>,       // 尾批次下标
    changeover_hours: f64,     // 累计换型
}

struct SearchCtx<'a> {
    model: &'a SequencingModel,
    deadline: Instant,
    nodes: u64,
    timed_out: bool,
    best: Option<Incumbent>,
}

impl SequenceSolver for BranchBoundSolver {
    #[instrument(skip(self, model), fields(lots_count = model.lot_count()))]
    fn solve(
        &self,
        model: &SequencingModel,
        time_limit: Duration,
    ) -> Result<SolveOutcome, ScheduleError> {
        let n = model.lot_count();
        if n == 0 {
            return Ok(SolveOutcome {
                order: Vec::new(),
                makespan_hours: 0.0,
                total_changeover_hours: 0.0,
                status: SolveStatus::Optimal,
            });
        }

        let mut ctx = SearchCtx {
            model,
            deadline: Instant::now() + time_limit,
            nodes: 0,
            timed_out: false,
            best: None,
        };
        let root = Partial {
            order: Vec::with_capacity(n),
            used: vec![false; n],
            clock_hours: 0.0,
            elapsed_since_clean: 0.0,
            blocks: 1,
            last: None,
            changeover_hours: 0.0,
        };
        dfs(&mut ctx, root);

        debug!(
            nodes = ctx.nodes,
            timed_out = ctx.timed_out,
            found = ctx.best.is_some(),
            "分支定界搜索结束"
        );

        match ctx.best {
            Some(incumbent) => Ok(SolveOutcome {
                order: incumbent.order,
                makespan_hours: incumbent.makespan_hours,
                total_changeover_hours: incumbent.changeover_hours,
                status: if ctx.timed_out {
                    SolveStatus::TimeLimited
                } else {
                    SolveStatus::Optimal
                },
            }),
            None => Err(ScheduleError::NoFeasibleSolution {
                time_limit_secs: time_limit.as_secs(),
            }),
        }
    }
}

fn dfs(ctx: &mut SearchCtx<'_>, partial: Partial) {
    if ctx.timed_out {
        return;
    }
    ctx.nodes += 1;
    if ctx.nodes & DEADLINE_CHECK_MASK == 0 && Instant::now() >= ctx.deadline {
        ctx.timed_out = true;
        return;
    }

    let model = ctx.model;
    let n = model.lot_count();

    // 完整排列: 尝试更新在位解 (总工期优先,换型平局)
    if partial.order.len() == n {
        let better = match &ctx.best {
            None => true,
            Some(best) => {
                partial.clock_hours < best.makespan_hours - EPS_HOURS
                    || ((partial.clock_hours - best.makespan_hours).abs() <= EPS_HOURS
                        && partial.changeover_hours < best.changeover_hours - EPS_HOURS)
            }
        };
        if better {
            ctx.best = Some(Incumbent {
                order: partial.order,
                makespan_hours: partial.clock_hours,
                changeover_hours: partial.changeover_hours,
            });
        }
        return;
    }

    // 定界: 剩余批次至少还需其灌装总时长
    let remaining_fill: f64 = (0..n)
        .filter(|&j| !partial.used[j])
        .map(|j| model.fill_hours[j])
        .sum();
    if let Some(best) = &ctx.best {
        if partial.clock_hours + remaining_fill > best.makespan_hours + EPS_HOURS {
            return;
        }
    }

    // 分支: 可行子节点按落位后时钟升序展开 (先探有希望的分支)
    let mut children: Vec<(f64, usize, Partial)> = Vec::new();
    for j in 0..n {
        if partial.used[j] {
            continue;
        }
        if let Some(child) = try_place(model, &partial, j) {
            children.push((child.clock_hours, j, child));
        }
    }
    children.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    for (_, _, child) in children {
        dfs(ctx, child);
        if ctx.timed_out {
            return;
        }
    }
}

/// 尝试在部分排列尾部落位批次 j; 违反块容量/块数上限/交付窗口返回 None
fn try_place(model: &SequencingModel, partial: &Partial, j: usize) -> Option<Partial> {
    let chg = match partial.last {
        None => 0.0,
        Some(last) => model.setup[last][j],
    };
    let need = chg + model.fill_hours[j];

    let needs_clean = partial.elapsed_since_clean + need > model.window_hours + EPS_HOURS;
    if needs_clean && need > model.window_hours + EPS_HOURS {
        return None; // 换型+灌装整窗装不下,此落位不可行
    }
    let blocks = partial.blocks + usize::from(needs_clean);
    if blocks > model.max_blocks {
        return None;
    }

    let mut fill_start = partial.clock_hours + chg;
    if needs_clean {
        fill_start += model.clean_hours;
    }
    if let Some(ws) = model.window_start_hours[j] {
        if fill_start < ws - EPS_HOURS {
            return None; // 不插入等待,窗口起点不可达
        }
    }
    if let Some(we) = model.window_end_hours[j] {
        if fill_start > we + EPS_HOURS {
            return None;
        }
    }

    let mut child = partial.clone();
    child.order.push(j);
    child.used[j] = true;
    child.clock_hours = fill_start + model.fill_hours[j];
    child.elapsed_since_clean = if needs_clean { 0.0 } else { partial.elapsed_since_clean };
    child.elapsed_since_clean += need;
    child.blocks = blocks;
    child.last = Some(j);
    child.changeover_hours += chg;
    Some(child)
}
