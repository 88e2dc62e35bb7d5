// ==========================================
// 多策略对比集成测试
// ==========================================
// 并行试算 + 失败隔离 + 排序维度
// ==========================================


use anyhow::Result;
use filling_aps::{compare_strategies, ComparisonSort, ScheduleError, StrategyKind};
use test_helpers::{aba_lots, base_config, start_time};

#[tokio::test]
async fn test_exact_failure_does_not_poison_other_strategies() -> Result<()> {
    // 精确求解上限压到 2, 输入 3 批 => 该策略失败,其余策略照常产出
    let mut cfg = base_config();
    cfg.exact.max_lots = 2;

    let report = compare_strategies(
        aba_lots(),
        start_time(),
        cfg,
        vec![
            StrategyKind::SptPack,
            StrategyKind::ExactOpt,
            StrategyKind::CfsPack,
        ],
        ComparisonSort::ByMakespan,
    )
    .await?;

    assert_eq!(report.runs.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].strategy, StrategyKind::ExactOpt);
    assert!(report.failures[0].error.contains("超过上限"));
    Ok(())
}

#[tokio::test]
async fn test_rows_sorted_by_makespan() -> Result<()> {
    let report = compare_strategies(
        aba_lots(),
        start_time(),
        base_config(),
        StrategyKind::heuristics().to_vec(),
        ComparisonSort::ByMakespan,
    )
    .await?;

    assert_eq!(report.runs.len(), 5);
    for pair in report.runs.windows(2) {
        assert!(
            pair[0].schedule.kpi.makespan_hours <= pair[1].schedule.kpi.makespan_hours,
            "对比行未按总工期升序"
        );
    }
    // 聚类型策略把两个 A 批排到一起: 最优行只有一次换型 => 32h
    assert_eq!(report.runs[0].schedule.kpi.makespan_hours, 32.0);
    Ok(())
}

#[tokio::test]
async fn test_rows_sorted_by_utilization() -> Result<()> {
    let report = compare_strategies(
        aba_lots(),
        start_time(),
        base_config(),
        vec![StrategyKind::SptPack, StrategyKind::SmartPack],
        ComparisonSort::ByUtilization,
    )
    .await?;

    for pair in report.runs.windows(2) {
        assert!(
            pair[0].schedule.kpi.utilization >= pair[1].schedule.kpi.utilization,
            "对比行未按利用率降序"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_exact_solve_status_tagged_in_run() -> Result<()> {
    let report = compare_strategies(
        aba_lots(),
        start_time(),
        base_config(),
        vec![StrategyKind::ExactOpt],
        ComparisonSort::ByMakespan,
    )
    .await?;

    assert_eq!(report.runs.len(), 1);
    let run = &report.runs[0];
    assert_eq!(run.strategy, StrategyKind::ExactOpt);
    assert!(run.solve_status.is_some());
    // 小实例在时限内必然证明最优: A,A,B 单次换型 = 32h
    assert_eq!(run.schedule.kpi.makespan_hours, 32.0);
    Ok(())
}

#[tokio::test]
async fn test_invalid_configuration_rejected_before_dispatch() {
    let mut cfg = base_config();
    cfg.window_hours = -10.0;

    let err = compare_strategies(
        aba_lots(),
        start_time(),
        cfg,
        vec![StrategyKind::SptPack],
        ComparisonSort::ByMakespan,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidConfiguration { .. }));
}
