// ==========================================
// 灌装线排产引擎 - KPI 汇总引擎
// ==========================================
// 职责: 对已完成排程做纯函数汇总,供单次报告与多策略对比共用
// 输入: 活动链 + 跳过批次
// 输出: ScheduleKpi
// ==========================================

use crate::domain::activity::{span_hours, Activity};
use crate::domain::schedule::{ScheduleKpi, SkippedLot};
use crate::domain::types::ActivityKind;

// ==========================================
// KpiAggregator - KPI 汇总引擎
// ==========================================
pub struct KpiAggregator {
    // 无状态引擎,不需要注入依赖
}

impl KpiAggregator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 汇总活动链与跳过批次为 KPI 记录
    ///
    /// 利用率 = 灌装总时长 / 总工期; 空排程利用率为 0
    pub fn aggregate(&self, activities: &[Activity], skipped: &[SkippedLot]) -> ScheduleKpi {
        if activities.is_empty() {
            let mut kpi = ScheduleKpi::empty();
            kpi.lots_skipped = skipped.len();
            kpi.skipped_lot_ids = skipped.iter().map(|s| s.lot_id.clone()).collect();
            return kpi;
        }

        let mut lots_scheduled = 0usize;
        let mut changeover_count = 0usize;
        let mut clean_count = 0usize;
        let mut total_fill_hours = 0.0f64;
        let mut total_changeover_hours = 0.0f64;
        let mut total_clean_hours = 0.0f64;

        for activity in activities {
            let hours = activity.duration_hours();
            match activity.kind() {
                ActivityKind::Fill => {
                    lots_scheduled += 1;
                    total_fill_hours += hours;
                }
                ActivityKind::Changeover => {
                    changeover_count += 1;
                    total_changeover_hours += hours;
                }
                ActivityKind::Clean => {
                    clean_count += 1;
                    total_clean_hours += hours;
                }
            }
        }

        let makespan_hours = span_hours(
            activities[0].start,
            activities[activities.len() - 1].end,
        );
        let utilization = if makespan_hours > 0.0 {
            total_fill_hours / makespan_hours
        } else {
            0.0
        };

        ScheduleKpi {
            lots_scheduled,
            lots_skipped: skipped.len(),
            changeover_count,
            clean_count,
            total_fill_hours,
            total_changeover_hours,
            total_clean_hours,
            makespan_hours,
            utilization,
            skipped_lot_ids: skipped.iter().map(|s| s.lot_id.clone()).collect(),
        }
    }
}

impl Default for KpiAggregator {
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
    use crate::domain::activity::{hours_to_duration, ActivityDetail};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_aggregate_counts_and_utilization() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let t1 = t0 + hours_to_duration(10.0);
        let t2 = t1 + hours_to_duration(2.0);
        let t3 = t2 + hours_to_duration(8.0);

        let activities = vec![
            Activity {
                line_id: "FL-01".into(),
                start: t0,
                end: t1,
                detail: ActivityDetail::Fill {
                    lot_id: "L-001".into(),
                    lot_type: "A".into(),
                    quantity: 10_000,
                },
            },
            Activity {
                line_id: "FL-01".into(),
                start: t1,
                end: t2,
                detail: ActivityDetail::Changeover {
                    from_type: "A".into(),
                    to_type: "B".into(),
                },
            },
            Activity {
                line_id: "FL-01".into(),
                start: t2,
                end: t3,
                detail: ActivityDetail::Fill {
                    lot_id: "L-002".into(),
                    lot_type: "B".into(),
                    quantity: 8_000,
                },
            },
        ];
        let skipped = vec![SkippedLot {
            lot_id: "L-003".into(),
            lot_type: "C".into(),
            reason: "超窗".into(),
        }];

        let kpi = KpiAggregator::new().aggregate(&activities, &skipped);
        assert_eq!(kpi.lots_scheduled, 2);
        assert_eq!(kpi.lots_skipped, 1);
        assert_eq!(kpi.changeover_count, 1);
        assert_eq!(kpi.clean_count, 0);
        assert_eq!(kpi.total_fill_hours, 18.0);
        assert_eq!(kpi.total_changeover_hours, 2.0);
        assert_eq!(kpi.makespan_hours, 20.0);
        assert!((kpi.utilization - 0.9).abs() < 1e-12);
        assert_eq!(kpi.skipped_lot_ids, vec!["L-003".to_string()]);
    }

    #[test]
    fn test_aggregate_empty_with_skips() {
        let skipped = vec![SkippedLot {
            lot_id: "L-001".into(),
            lot_type: "A".into(),
            reason: "超窗".into(),
        }];
        let kpi = KpiAggregator::new().aggregate(&[], &skipped);
        assert_eq!(kpi.lots_scheduled, 0);
        assert_eq!(kpi.lots_skipped, 1);
        assert_eq!(kpi.makespan_hours, 0.0);
        assert_eq!(kpi.utilization, 0.0);
    }
}
