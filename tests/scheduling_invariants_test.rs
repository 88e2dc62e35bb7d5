// ==========================================
// 排程不变量集成测试
// ==========================================
// 对所有策略的输出统一验证:
// - 活动链时间连续、无重叠;
// - 回放重算的窗口累计永不超限;
// - 批次至多灌装一次,排产/跳过完备且不相交;
// - 换型时长与前后类型一致;
// - 同输入重跑逐位相同 (确定性)
// ==========================================


use filling_aps::{
    run_strategy, ActivityDetail, ActivityKind, Schedule, ScheduleConfig, ScheduleVerifier,
    StrategyKind,
};
use std::collections::HashSet;
use test_helpers::{base_config, make_lot, make_windowed_lot, start_time};

/// 混合类型 + 带窗口 + 超窗批次的混合输入
fn mixed_lots() -> Vec<filling_aps::Lot> {
    vec![
        make_lot("L-001", "A", 9_000),
        make_lot("L-002", "B", 11_000),
        make_lot("L-003", "A", 7_000),
        make_windowed_lot(
            "L-004",
            "C",
            6_000,
            None,
            Some(start_time() + chrono::Duration::hours(12)),
        ),
        make_lot("L-005", "B", 13_000),
        make_windowed_lot(
            "L-006",
            "A",
            5_000,
            Some(start_time() + chrono::Duration::hours(500)),
            None,
        ),
    ]
}

fn tight_config() -> ScheduleConfig {
    let mut cfg = base_config();
    cfg.window_hours = 25.0;
    cfg.chg_same_hours = 1.0;
    cfg
}

fn assert_invariants(schedule: &Schedule, lots: &[filling_aps::Lot], cfg: &ScheduleConfig) {
    // 活动链: 严格有序无空隙
    for pair in schedule.activities.windows(2) {
        assert_eq!(
            pair[0].end, pair[1].start,
            "活动链存在空隙或重叠"
        );
    }
    for activity in &schedule.activities {
        assert!(activity.end > activity.start, "活动时长必须为正");
    }

    // 回放窗口累计
    let mut window_sum = 0.0f64;
    for activity in &schedule.activities {
        match activity.kind() {
            ActivityKind::Clean => window_sum = 0.0,
            _ => {
                window_sum += activity.duration_hours();
                assert!(
                    window_sum <= cfg.window_hours + 1e-6,
                    "窗口累计超限: {:.2}h",
                    window_sum
                );
            }
        }
    }

    // 批次完备且不相交
    let mut filled: HashSet<&str> = HashSet::new();
    for activity in &schedule.activities {
        if let ActivityDetail::Fill { lot_id, .. } = &activity.detail {
            assert!(filled.insert(lot_id.as_str()), "批次 {} 被拆分", lot_id);
        }
    }
    let skipped: HashSet<&str> = schedule.skipped.iter().map(|s| s.lot_id.as_str()).collect();
    assert_eq!(filled.len() + skipped.len(), lots.len());
    for lot in lots {
        let id = lot.lot_id.as_str();
        assert!(
            filled.contains(id) ^ skipped.contains(id),
            "批次 {} 计数不完备或重复",
            id
        );
    }

    // 独立校验引擎同样零错误
    let report = ScheduleVerifier::new().verify_schedule(schedule, lots, cfg);
    assert!(report.is_ok(), "校验错误: {:?}", report.errors);
}

#[test]
fn test_invariants_hold_for_every_strategy() {
    let lots = mixed_lots();
    let cfg = tight_config();

    for strategy in StrategyKind::all() {
        match run_strategy(strategy, &lots, start_time(), &cfg) {
            Ok(run) => assert_invariants(&run.schedule, &lots, &cfg),
            // 精确求解允许因窗口批次不可行而整体失败,其余策略不允许
            Err(e) => assert_eq!(
                strategy,
                StrategyKind::ExactOpt,
                "策略 {} 意外失败: {}",
                strategy,
                e
            ),
        }
    }
}

#[test]
fn test_changeover_durations_match_types() {
    let lots = mixed_lots();
    let cfg = tight_config();
    let run = run_strategy(StrategyKind::LptPack, &lots, start_time(), &cfg).unwrap();

    let mut last_fill_type: Option<String> = None;
    for activity in &run.schedule.activities {
        match &activity.detail {
            ActivityDetail::Changeover { from_type, to_type } => {
                let expected = if from_type == to_type {
                    cfg.chg_same_hours
                } else {
                    cfg.chg_diff_hours
                };
                assert!(
                    (activity.duration_hours() - expected).abs() < 1e-6,
                    "换型时长 {:.2}h 与类型关系不符",
                    activity.duration_hours()
                );
                if let Some(prev) = &last_fill_type {
                    assert_eq!(from_type, prev);
                }
            }
            ActivityDetail::Fill { lot_type, .. } => {
                last_fill_type = Some(lot_type.clone());
            }
            ActivityDetail::Clean => {}
        }
    }
}

#[test]
fn test_reruns_are_bit_identical() {
    let lots = mixed_lots();
    let cfg = tight_config();

    for strategy in StrategyKind::heuristics() {
        let first = run_strategy(strategy, &lots, start_time(), &cfg).unwrap();
        let second = run_strategy(strategy, &lots, start_time(), &cfg).unwrap();
        assert_eq!(first, second, "策略 {} 重跑结果不一致", strategy);
    }
}

#[test]
fn test_invalid_configuration_rejected_before_simulation() {
    let mut cfg = base_config();
    cfg.fill_rate_vph = 0.0;

    let err = run_strategy(
        StrategyKind::SptPack,
        &[make_lot("L-001", "A", 1_000)],
        start_time(),
        &cfg,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        filling_aps::ScheduleError::InvalidConfiguration { .. }
    ));
}
