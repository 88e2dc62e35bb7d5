// ==========================================
// 灌装线排产引擎 - 时间线推演器
// ==========================================
// 职责: 把有序批次序列确定性展开为具体活动链 (灌装/换型/清洁)
// 输入: 有序批次 + 起始时刻 + 配置
// 输出: Schedule (活动链 + 跳过批次 + KPI)
// ==========================================
// 红线: 所有策略共用同一推演器,保证横向可比
// 红线: 跳过即继续,绝不中断; 跳过批次不推进时钟
// 红线: 不插入等待时间 —— 早于交付窗口起点到达的批次按跳过处理,
//       因此 elapsed_since_clean 永不包含等待时间
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::activity::{hours_to_duration, Activity, ActivityDetail};
use crate::domain::line::LineState;
use crate::domain::lot::Lot;
use crate::domain::schedule::{Schedule, SkippedLot};
use crate::engine::kpi::KpiAggregator;
use crate::engine::rules::{changeover_hours, step_fits_window};
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

// ==========================================
// StepPlan - 单步推演计划
// ==========================================
// 束搜索与推演器共用的单步物理规则
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StepPlan {
    pub needs_clean: bool,      // 本步前是否必须插入清洁
    pub changeover_hours: f64,  // 换型时长 (0 表示不发生换型)
    pub fill_hours: f64,        // 灌装时长
}

impl StepPlan {
    /// 计入清洁窗口的小时数 (换型 + 灌装,清洁本身不计入)
    pub fn window_hours(&self) -> f64 {
        self.changeover_hours + self.fill_hours
    }
}

/// 单步推演结果: 可行计划或跳过原因
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StepOutcome {
    Feasible(StepPlan),
    Skip(String),
}

/// 评估在当前产线状态下排入一个批次
///
/// 判定顺序:
/// 1. 计算换型时长 (类型记忆跨清洁保留);
/// 2. 窗口剩余容量不足则要求先清洁; 整窗都装不下则跳过;
/// 3. 推算灌装开始时刻 (含强制清洁),越出交付窗口则跳过
///    (跳过判定先于清洁落位,被跳过的批次不会留下清洁活动)
pub(crate) fn plan_step(state: &LineState, lot: &Lot, cfg: &ScheduleConfig) -> StepOutcome {
    let fill_hours = lot.fill_hours(cfg.fill_rate_vph);
    let chg_hours = changeover_hours(state.last_lot_type.as_deref(), &lot.lot_type, cfg);
    let step_hours = chg_hours + fill_hours;

    let needs_clean = !step_fits_window(state.elapsed_since_clean, step_hours, cfg);
    if needs_clean && !step_fits_window(0.0, step_hours, cfg) {
        return StepOutcome::Skip(format!(
            "换型+灌装共 {:.2}h 超过清洁窗口 {:.0}h, 任何窗口都无法容纳",
            step_hours, cfg.window_hours
        ));
    }

    let mut lead_hours = chg_hours;
    if needs_clean {
        lead_hours += cfg.clean_hours;
    }
    let fill_start = state.clock + hours_to_duration(lead_hours);

    if let Some(ws) = lot.window_start {
        if fill_start < ws {
            return StepOutcome::Skip(format!(
                "预计灌装开始 {} 早于交付窗口起点 {} (不插入等待)",
                fill_start.format("%Y-%m-%d %H:%M"),
                ws.format("%Y-%m-%d %H:%M")
            ));
        }
    }
    if let Some(we) = lot.window_end {
        if fill_start > we {
            return StepOutcome::Skip(format!(
                "预计灌装开始 {} 晚于交付窗口终点 {}",
                fill_start.format("%Y-%m-%d %H:%M"),
                we.format("%Y-%m-%d %H:%M")
            ));
        }
    }

    StepOutcome::Feasible(StepPlan {
        needs_clean,
        changeover_hours: chg_hours,
        fill_hours,
    })
}

/// 按单步计划推进产线状态 (不产生活动,束搜索用)
pub(crate) fn apply_step(state: &mut LineState, plan: &StepPlan, lot: &Lot, cfg: &ScheduleConfig) {
    let mut lead_hours = plan.window_hours();
    if plan.needs_clean {
        state.elapsed_since_clean = 0.0;
        lead_hours += cfg.clean_hours;
    }
    state.clock += hours_to_duration(lead_hours);
    state.elapsed_since_clean += plan.window_hours();
    state.last_lot_type = Some(lot.lot_type.clone());
}

// ==========================================
// TimelineSimulator - 时间线推演器
// ==========================================
pub struct TimelineSimulator {
    // 无状态引擎,不需要注入依赖
}

impl TimelineSimulator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 展开有序批次序列为具体排程
    ///
    /// 纯函数: 相同 (序列, 起始时刻, 配置) 必然产生逐位相同的排程
    ///
    /// # 参数
    /// - `lots_in_order`: 策略产出的批次总排列
    /// - `start_time`: 推演起始时刻 (窗口全新,无前置清洁)
    /// - `cfg`: 排产配置 (调用方保证已校验)
    ///
    /// # 返回
    /// Schedule: 活动链 + 跳过批次 + KPI
    #[instrument(skip(self, lots_in_order, cfg), fields(
        line_id = %cfg.line_id,
        lots_count = lots_in_order.len()
    ))]
    pub fn expand(
        &self,
        lots_in_order: &[Lot],
        start_time: DateTime<Utc>,
        cfg: &ScheduleConfig,
    ) -> Schedule {
        let mut state = LineState::new(start_time);
        let mut activities: Vec<Activity> = Vec::new();
        let mut skipped: Vec<SkippedLot> = Vec::new();

        for lot in lots_in_order {
            let plan = match plan_step(&state, lot, cfg) {
                StepOutcome::Feasible(plan) => plan,
                StepOutcome::Skip(reason) => {
                    debug!(lot_id = %lot.lot_id, %reason, "批次跳过");
                    skipped.push(SkippedLot {
                        lot_id: lot.lot_id.clone(),
                        lot_type: lot.lot_type.clone(),
                        reason,
                    });
                    continue;
                }
            };

            if plan.needs_clean {
                // 零时长活动不入链 (end > start 不变量); 窗口仍然归零
                if cfg.clean_hours > 0.0 {
                    let clean_end = state.clock + hours_to_duration(cfg.clean_hours);
                    activities.push(Activity {
                        line_id: cfg.line_id.clone(),
                        start: state.clock,
                        end: clean_end,
                        detail: ActivityDetail::Clean,
                    });
                    state.clock = clean_end;
                }
                state.elapsed_since_clean = 0.0;
            }

            if plan.changeover_hours > 0.0 {
                // 换型仅在存在类型记忆时发生,from_type 必然可得
                let from_type = state
                    .last_lot_type
                    .clone()
                    .unwrap_or_else(|| lot.lot_type.clone());
                let chg_end = state.clock + hours_to_duration(plan.changeover_hours);
                activities.push(Activity {
                    line_id: cfg.line_id.clone(),
                    start: state.clock,
                    end: chg_end,
                    detail: ActivityDetail::Changeover {
                        from_type,
                        to_type: lot.lot_type.clone(),
                    },
                });
                state.clock = chg_end;
            }

            let fill_end = state.clock + hours_to_duration(plan.fill_hours);
            activities.push(Activity {
                line_id: cfg.line_id.clone(),
                start: state.clock,
                end: fill_end,
                detail: ActivityDetail::Fill {
                    lot_id: lot.lot_id.clone(),
                    lot_type: lot.lot_type.clone(),
                    quantity: lot.quantity,
                },
            });
            state.clock = fill_end;
            state.elapsed_since_clean += plan.window_hours();
            state.last_lot_type = Some(lot.lot_type.clone());
        }

        let kpi = KpiAggregator::new().aggregate(&activities, &skipped);
        debug!(
            scheduled = kpi.lots_scheduled,
            skipped = kpi.lots_skipped,
            makespan_hours = kpi.makespan_hours,
            "推演完成"
        );

        Schedule {
            line_id: cfg.line_id.clone(),
            start_time,
            activities,
            skipped,
            makespan_hours: kpi.makespan_hours,
            kpi,
        }
    }
}

impl Default for TimelineSimulator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ActivityKind;
    use chrono::TimeZone;

    fn cfg_for_test() -> ScheduleConfig {
        ScheduleConfig {
            fill_rate_vph: 1000.0,
            clean_hours: 5.0,
            window_hours: 100.0,
            chg_same_hours: 0.0,
            chg_diff_hours: 2.0,
            ..ScheduleConfig::default()
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_expand_empty_order() {
        let schedule = TimelineSimulator::new().expand(&[], start(), &cfg_for_test());
        assert!(schedule.is_empty());
        assert_eq!(schedule.makespan_hours, 0.0);
        assert_eq!(schedule.kpi.utilization, 0.0);
    }

    #[test]
    fn test_expand_no_initial_clean() {
        let lots = vec![Lot::new("L-001", "A", 10_000)];
        let schedule = TimelineSimulator::new().expand(&lots, start(), &cfg_for_test());

        assert_eq!(schedule.activities.len(), 1);
        assert_eq!(schedule.activities[0].kind(), ActivityKind::Fill);
        assert_eq!(schedule.activities[0].start, start());
        assert_eq!(schedule.makespan_hours, 10.0);
    }

    #[test]
    fn test_type_memory_survives_clean() {
        // 窗口 15h: 首灌 10h 后,下一步 (换型2h + 灌装10h) 触发清洁,
        // 清洁后仍按 A->B 计换型
        let cfg = ScheduleConfig {
            window_hours: 15.0,
            ..cfg_for_test()
        };
        let lots = vec![Lot::new("L-001", "A", 10_000), Lot::new("L-002", "B", 10_000)];
        let schedule = TimelineSimulator::new().expand(&lots, start(), &cfg);

        let kinds: Vec<ActivityKind> = schedule.activities.iter().map(|a| a.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::Fill,
                ActivityKind::Clean,
                ActivityKind::Changeover,
                ActivityKind::Fill
            ]
        );
        assert_eq!(schedule.makespan_hours, 10.0 + 5.0 + 2.0 + 10.0);
    }

    #[test]
    fn test_skipped_lot_leaves_no_clean_and_no_clock_advance() {
        // 第二批换型+灌装会触发清洁,但其交付窗口已过 => 跳过且不留下清洁
        let cfg = ScheduleConfig {
            window_hours: 15.0,
            ..cfg_for_test()
        };
        let expired = start(); // 窗口终点 = 推演起点,首灌结束后必然超窗
        let mut late_lot = Lot::new("L-002", "B", 10_000);
        late_lot.window_end = Some(expired);

        let lots = vec![
            Lot::new("L-001", "A", 10_000),
            late_lot,
            Lot::new("L-003", "A", 5_000),
        ];
        let schedule = TimelineSimulator::new().expand(&lots, start(), &cfg);

        // L-002 跳过; L-003 同型无换型, 10+5=15h 恰好贴满窗口,无清洁
        let kinds: Vec<ActivityKind> = schedule.activities.iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, vec![ActivityKind::Fill, ActivityKind::Fill]);
        assert_eq!(schedule.skipped.len(), 1);
        assert_eq!(schedule.skipped[0].lot_id, "L-002");
        assert_eq!(schedule.makespan_hours, 15.0);
    }

    #[test]
    fn test_lot_larger_than_window_skipped() {
        let cfg = ScheduleConfig {
            window_hours: 8.0,
            ..cfg_for_test()
        };
        let lots = vec![Lot::new("L-001", "A", 10_000)]; // 10h > 8h 窗口
        let schedule = TimelineSimulator::new().expand(&lots, start(), &cfg);

        assert!(schedule.is_empty());
        assert_eq!(schedule.skipped.len(), 1);
    }

    #[test]
    fn test_window_start_in_future_is_skipped_not_waited() {
        let mut lot = Lot::new("L-001", "A", 10_000);
        lot.window_start = Some(start() + hours_to_duration(5.0));
        let schedule = TimelineSimulator::new().expand(&[lot], start(), &cfg_for_test());

        assert!(schedule.is_empty());
        assert_eq!(schedule.skipped.len(), 1);
    }

    #[test]
    fn test_determinism_bit_identical() {
        let lots = vec![
            Lot::new("L-001", "A", 10_000),
            Lot::new("L-002", "B", 7_500),
            Lot::new("L-003", "A", 12_000),
        ];
        let cfg = cfg_for_test();
        let a = TimelineSimulator::new().expand(&lots, start(), &cfg);
        let b = TimelineSimulator::new().expand(&lots, start(), &cfg);
        assert_eq!(a, b);
    }
}
