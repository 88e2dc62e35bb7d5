// ==========================================
// 灌装线排产引擎 - 智能束搜索策略 (Smart)
// ==========================================
// 有界束搜索:
// - 束状态 = (部分排列, 对应产线状态), 值语义持有,避免共享可变图;
// - 每层用所有仍可排批次扩展每个存活状态,按累计得分保留前 beam_width;
// - 剪枝用有界 top-k (部分选择), 不做全量排序;
// - 终态束 (全部排完或无可排批次) 按最终推演总工期对比取胜者;
// - 束宽 1 退化为纯贪心
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::line::LineState;
use crate::domain::lot::Lot;
use crate::engine::simulator::{apply_step, plan_step, StepOutcome, StepPlan, TimelineSimulator};
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

// ==========================================
// BeamState - 束状态 (值语义)
// ==========================================
#[derive(Debug, Clone)]
struct BeamState {
    order: Vec<usize>, // 已排批次下标 (输入序)
    used: Vec<bool>,   // 已排标记
    line: LineState,   // 推演至当前深度的产线状态
    score: f64,        // 累计得分
    seq: usize,        // 生成序号 (平局时保持生成顺序,可复现)
}

// ==========================================
// SmartPack - 智能束搜索
// ==========================================
pub struct SmartPack {
    // 无状态策略,不需要注入依赖
}

impl SmartPack {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 束搜索构造总排列
    ///
    /// 无法排入的批次按输入顺序追加在尾部,保证返回总排列
    #[instrument(skip(self, lots, cfg), fields(lots_count = lots.len(), beam_width = cfg.smart.beam_width))]
    pub fn order(&self, lots: &[Lot], start_time: DateTime<Utc>, cfg: &ScheduleConfig) -> Vec<Lot> {
        if lots.is_empty() {
            return Vec::new();
        }
        let beam_width = cfg.smart.beam_width.clamp(1, 10);

        let mut live = vec![BeamState {
            order: Vec::new(),
            used: vec![false; lots.len()],
            line: LineState::new(start_time),
            score: 0.0,
            seq: 0,
        }];
        let mut terminals: Vec<BeamState> = Vec::new();

        while !live.is_empty() {
            let mut candidates: Vec<BeamState> = Vec::new();
            for state in &live {
                let mut expanded = false;
                for (i, lot) in lots.iter().enumerate() {
                    if state.used[i] {
                        continue;
                    }
                    let plan = match plan_step(&state.line, lot, cfg) {
                        StepOutcome::Feasible(plan) => plan,
                        StepOutcome::Skip(_) => continue,
                    };
                    expanded = true;

                    let step_score = self.score_step(&state.line, &plan, lot, cfg);
                    let mut next = state.clone();
                    apply_step(&mut next.line, &plan, lot, cfg);
                    next.used[i] = true;
                    next.order.push(i);
                    next.score += step_score;
                    next.seq = candidates.len();
                    candidates.push(next);
                }
                if !expanded {
                    // 全部排完或余下批次均不可排 => 终态
                    terminals.push(state.clone());
                }
            }
            if candidates.is_empty() {
                break;
            }
            live = prune_to_width(candidates, beam_width);
        }

        debug!(terminals = terminals.len(), "束搜索终态收集完成");
        self.pick_best_terminal(lots, terminals, start_time, cfg)
    }

    /// 单步得分 (越大越优)
    ///
    /// -(异型 alpha / 同型 beta 惩罚)
    /// - slack_waste_weight * 被放弃的窗口剩余容量 (本步强制清洁时)
    /// + streak_bonus (类型续跑时)
    fn score_step(
        &self,
        line: &LineState,
        plan: &StepPlan,
        lot: &Lot,
        cfg: &ScheduleConfig,
    ) -> f64 {
        let mut score = 0.0;
        match line.last_lot_type.as_deref() {
            None => {}
            Some(prev) if prev == lot.lot_type => {
                score -= cfg.smart.score_beta;
                score += cfg.smart.streak_bonus;
            }
            Some(_) => {
                score -= cfg.smart.score_alpha;
            }
        }
        if plan.needs_clean {
            let wasted = (cfg.window_hours - line.elapsed_since_clean).max(0.0);
            score -= cfg.smart.slack_waste_weight * wasted;
        }
        score
    }

    /// 终态对比: 补全排列后按最终推演总工期取最小者 (平局取先生成者)
    fn pick_best_terminal(
        &self,
        lots: &[Lot],
        terminals: Vec<BeamState>,
        start_time: DateTime<Utc>,
        cfg: &ScheduleConfig,
    ) -> Vec<Lot> {
        let simulator = TimelineSimulator::new();
        let mut best: Option<(f64, Vec<Lot>)> = None;

        for terminal in &terminals {
            let full = complete_order(lots, terminal);
            let makespan = simulator.expand(&full, start_time, cfg).makespan_hours;
            let better = match &best {
                None => true,
                Some((best_makespan, _)) => makespan < *best_makespan,
            };
            if better {
                best = Some((makespan, full));
            }
        }

        match best {
            Some((_, order)) => order,
            // 理论上不可达: 根状态必然进入终态
            None => lots.to_vec(),
        }
    }
}

impl Default for SmartPack {
    fn default() -> Self {
        Self::new()
    }
}

/// 部分排列补全为总排列: 未排批次按输入顺序追加在尾部
fn complete_order(lots: &[Lot], terminal: &BeamState) -> Vec<Lot> {
    let mut full: Vec<Lot> = terminal.order.iter().map(|&i| lots[i].clone()).collect();
    for (i, lot) in lots.iter().enumerate() {
        if !terminal.used[i] {
            full.push(lot.clone());
        }
    }
    full
}

/// 有界 top-k 剪枝: 部分选择到第 k 位后截断,再对保留段稳定定序
fn prune_to_width(mut candidates: Vec<BeamState>, width: usize) -> Vec<BeamState> {
    let cmp = |a: &BeamState, b: &BeamState| {
        b.score.total_cmp(&a.score).then_with(|| a.seq.cmp(&b.seq))
    };
    if candidates.len() > width {
        candidates.select_nth_unstable_by(width - 1, cmp);
        candidates.truncate(width);
    }
    candidates.sort_by(cmp);
    candidates
}
