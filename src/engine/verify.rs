// ==========================================
// 灌装线排产引擎 - 排程校验引擎
// ==========================================
// 职责: 输入批次的预检 + 已产出排程的回放校验
// 输出: 错误/告警列表 (数据化结果,不打印、不中断)
// ==========================================
// 校验项 (回放):
// - 活动链严格有序、无重叠、无空隙;
// - 回放重算 elapsed_since_clean, 任何非清洁活动后不得超窗;
// - 批次不得拆分 (同一批次至多一次灌装);
// - 换型时长与前后灌装类型一致 (同型 chg_same / 异型 chg_diff);
// - 灌装开始时刻落在批次交付窗口内;
// - 输入批次要么恰好排产一次,要么记录为跳过 (完备且不相交)
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::activity::ActivityDetail;
use crate::domain::lot::Lot;
use crate::domain::schedule::Schedule;
use crate::domain::types::ActivityKind;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// 时间戳级比较容差 (小时)
const TOLERANCE_HOURS: f64 = 1e-6;

// ==========================================
// VerifyReport - 校验报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifyReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

// ==========================================
// ScheduleVerifier - 排程校验引擎
// ==========================================
pub struct ScheduleVerifier {
    // 无状态引擎,不需要注入依赖
}

impl ScheduleVerifier {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 输入批次预检
    ///
    /// 约定输入已由上游校验过,此处做防御性复核:
    /// 空批次号/空类型/零瓶数/窗口倒置为错误,重复批次号与
    /// 注定被跳过的超窗批次为告警
    #[instrument(skip(self, lots, cfg), fields(lots_count = lots.len()))]
    pub fn verify_input_lots(&self, lots: &[Lot], cfg: &ScheduleConfig) -> VerifyReport {
        let mut report = VerifyReport::default();
        let mut seen_ids: HashSet<&str> = HashSet::new();

        for lot in lots {
            if lot.lot_id.trim().is_empty() {
                report.errors.push("存在空批次号的批次".to_string());
            }
            if lot.lot_type.trim().is_empty() {
                report
                    .errors
                    .push(format!("批次 {} 的产品类型为空", lot.lot_id));
            }
            if lot.quantity == 0 {
                report
                    .errors
                    .push(format!("批次 {} 的瓶数必须为正", lot.lot_id));
            }
            if let (Some(ws), Some(we)) = (lot.window_start, lot.window_end) {
                if we < ws {
                    report.errors.push(format!(
                        "批次 {} 的交付窗口倒置: {} > {}",
                        lot.lot_id,
                        ws.format("%Y-%m-%d %H:%M"),
                        we.format("%Y-%m-%d %H:%M")
                    ));
                }
            }
            if !seen_ids.insert(lot.lot_id.as_str()) {
                report
                    .warnings
                    .push(format!("重复批次号: {}", lot.lot_id));
            }

            let fill_hours = lot.fill_hours(cfg.fill_rate_vph);
            if fill_hours > cfg.window_hours + TOLERANCE_HOURS {
                report.warnings.push(format!(
                    "批次 {} 灌装 {:.2}h 超过清洁窗口 {:.0}h, 推演时将始终被跳过",
                    lot.lot_id, fill_hours, cfg.window_hours
                ));
            }
        }

        debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "输入批次预检完成"
        );
        report
    }

    /// 排程回放校验
    ///
    /// 用与推演器相同的规则重放活动链,独立验证不变量
    #[instrument(skip(self, schedule, lots, cfg), fields(
        activities_count = schedule.activities.len()
    ))]
    pub fn verify_schedule(
        &self,
        schedule: &Schedule,
        lots: &[Lot],
        cfg: &ScheduleConfig,
    ) -> VerifyReport {
        let mut report = VerifyReport::default();
        let lots_by_id: HashMap<&str, &Lot> =
            lots.iter().map(|l| (l.lot_id.as_str(), l)).collect();

        let mut window_sum = 0.0f64;
        let mut filled_ids: HashSet<&str> = HashSet::new();
        let mut last_fill_type: Option<&str> = None;
        let mut pending_changeover: Option<(&str, &str, f64)> = None;

        for (i, activity) in schedule.activities.iter().enumerate() {
            let hours = activity.duration_hours();
            if hours <= 0.0 {
                report
                    .errors
                    .push(format!("第 {} 个活动时长非正: {:.4}h", i, hours));
            }
            if i > 0 {
                let prev = &schedule.activities[i - 1];
                if activity.start != prev.end {
                    report.errors.push(format!(
                        "活动链断裂: 第 {} 个活动起点 {} != 前一活动终点 {}",
                        i,
                        activity.start.format("%Y-%m-%d %H:%M:%S"),
                        prev.end.format("%Y-%m-%d %H:%M:%S")
                    ));
                }
            }

            match &activity.detail {
                ActivityDetail::Clean => {
                    window_sum = 0.0;
                    // 清洁不消费待核换型
                }
                ActivityDetail::Changeover { from_type, to_type } => {
                    window_sum += hours;
                    if pending_changeover.is_some() {
                        report
                            .errors
                            .push(format!("第 {} 个活动: 连续两次换型", i));
                    }
                    pending_changeover = Some((from_type.as_str(), to_type.as_str(), hours));
                }
                ActivityDetail::Fill { lot_id, lot_type, .. } => {
                    window_sum += hours;

                    if !filled_ids.insert(lot_id.as_str()) {
                        report.errors.push(format!("批次拆分: {} 多次灌装", lot_id));
                    }

                    // 换型一致性: 有换型核对前后类型与时长, 无换型要求类型延续
                    match pending_changeover.take() {
                        Some((from_type, to_type, chg_hours)) => {
                            if let Some(prev_type) = last_fill_type {
                                if from_type != prev_type {
                                    report.errors.push(format!(
                                        "换型前类型不符: 记录 {} 实际 {}",
                                        from_type, prev_type
                                    ));
                                }
                            }
                            if to_type != lot_type.as_str() {
                                report.errors.push(format!(
                                    "换型后类型不符: 记录 {} 实际 {}",
                                    to_type, lot_type
                                ));
                            }
                            let expected = if from_type == to_type {
                                cfg.chg_same_hours
                            } else {
                                cfg.chg_diff_hours
                            };
                            if (chg_hours - expected).abs() > TOLERANCE_HOURS {
                                report.errors.push(format!(
                                    "换型时长不符 ({}->{}): 期望 {:.2}h 实际 {:.2}h",
                                    from_type, to_type, expected, chg_hours
                                ));
                            }
                        }
                        None => {
                            if let Some(prev_type) = last_fill_type {
                                if prev_type != lot_type.as_str() && cfg.chg_diff_hours > 0.0 {
                                    report.errors.push(format!(
                                        "批次 {} 缺少异型换型 ({} -> {})",
                                        lot_id, prev_type, lot_type
                                    ));
                                }
                                if prev_type == lot_type.as_str() && cfg.chg_same_hours > 0.0 {
                                    report.errors.push(format!(
                                        "批次 {} 缺少同型换型 ({})",
                                        lot_id, lot_type
                                    ));
                                }
                            }
                        }
                    }
                    last_fill_type = Some(lot_type.as_str());

                    // 交付窗口: 灌装开始时刻必须落在窗口内
                    if let Some(lot) = lots_by_id.get(lot_id.as_str()) {
                        if let Some(ws) = lot.window_start {
                            if activity.start < ws {
                                report.errors.push(format!(
                                    "批次 {} 灌装早于交付窗口起点",
                                    lot_id
                                ));
                            }
                        }
                        if let Some(we) = lot.window_end {
                            if activity.start > we {
                                report.errors.push(format!(
                                    "批次 {} 灌装晚于交付窗口终点",
                                    lot_id
                                ));
                            }
                        }
                    }
                }
            }

            // 任何非清洁活动后, 回放累计不得超窗
            if activity.kind() != ActivityKind::Clean
                && window_sum > cfg.window_hours + TOLERANCE_HOURS
            {
                report.errors.push(format!(
                    "清洁窗口超限: 回放累计 {:.2}h > {:.0}h (第 {} 个活动后)",
                    window_sum, cfg.window_hours, i
                ));
            }
        }

        if pending_changeover.is_some() {
            report
                .errors
                .push("活动链以换型结尾, 未跟随灌装".to_string());
        }

        // 完备且不相交: 每个输入批次要么恰好灌装一次,要么恰好记录跳过一次
        let skipped_ids: HashSet<&str> = schedule
            .skipped
            .iter()
            .map(|s| s.lot_id.as_str())
            .collect();
        for lot in lots {
            let filled = filled_ids.contains(lot.lot_id.as_str());
            let skipped = skipped_ids.contains(lot.lot_id.as_str());
            match (filled, skipped) {
                (true, true) => report.errors.push(format!(
                    "批次 {} 同时出现在排产与跳过记录中",
                    lot.lot_id
                )),
                (false, false) => report.errors.push(format!(
                    "批次 {} 既未排产也未记录跳过",
                    lot.lot_id
                )),
                _ => {}
            }
        }

        debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "排程回放校验完成"
        );
        report
    }
}

impl Default for ScheduleVerifier {
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
    use crate::domain::activity::{hours_to_duration, Activity};
    use crate::engine::simulator::TimelineSimulator;
    use chrono::{TimeZone, Utc};

    fn cfg_for_test() -> ScheduleConfig {
        ScheduleConfig {
            fill_rate_vph: 1000.0,
            clean_hours: 5.0,
            window_hours: 15.0,
            chg_same_hours: 0.0,
            chg_diff_hours: 2.0,
            ..ScheduleConfig::default()
        }
    }

    #[test]
    fn test_simulator_output_passes_verification() {
        let cfg = cfg_for_test();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let lots = vec![
            Lot::new("L-001", "A", 10_000),
            Lot::new("L-002", "B", 10_000),
            Lot::new("L-003", "A", 10_000),
        ];
        let schedule = TimelineSimulator::new().expand(&lots, start, &cfg);

        let report = ScheduleVerifier::new().verify_schedule(&schedule, &lots, &cfg);
        assert!(report.is_ok(), "不应有错误: {:?}", report.errors);
    }

    #[test]
    fn test_broken_chain_detected() {
        let cfg = cfg_for_test();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let lots = vec![Lot::new("L-001", "A", 10_000), Lot::new("L-002", "A", 5_000)];
        let mut schedule = TimelineSimulator::new().expand(&lots, start, &cfg);

        // 人为在链上打洞
        let hole = hours_to_duration(1.0);
        let last: &mut Activity = schedule.activities.last_mut().unwrap();
        last.start += hole;
        last.end += hole;

        let report = ScheduleVerifier::new().verify_schedule(&schedule, &lots, &cfg);
        assert!(!report.is_ok());
        assert!(report.errors.iter().any(|e| e.contains("活动链断裂")));
    }

    #[test]
    fn test_unaccounted_lot_detected() {
        let cfg = cfg_for_test();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let lots = vec![Lot::new("L-001", "A", 10_000)];
        let schedule = TimelineSimulator::new().expand(&lots, start, &cfg);

        // 校验时带上一个排程中不存在的批次
        let mut with_ghost = lots.clone();
        with_ghost.push(Lot::new("L-999", "C", 1_000));
        let report = ScheduleVerifier::new().verify_schedule(&schedule, &with_ghost, &cfg);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("L-999") && e.contains("既未排产也未记录跳过")));
    }

    #[test]
    fn test_input_precheck_flags_inverted_window_and_oversize() {
        let cfg = cfg_for_test();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();

        let mut inverted = Lot::new("L-001", "A", 5_000);
        inverted.window_start = Some(start + hours_to_duration(10.0));
        inverted.window_end = Some(start);
        let oversize = Lot::new("L-002", "B", 20_000); // 20h > 15h 窗口

        let report =
            ScheduleVerifier::new().verify_input_lots(&[inverted, oversize], &cfg);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("交付窗口倒置"));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("始终被跳过"));
    }
}
