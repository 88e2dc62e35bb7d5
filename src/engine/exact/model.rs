// ==========================================
// 精确求解 - 定序模型
// ==========================================
// 职责: 把批次集合 + 工艺配置编译为与求解后端无关的定序模型:
//       灌装时长向量、换型矩阵、相对交付窗口、清洁块约束
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::activity::span_hours;
use crate::domain::lot::Lot;
use chrono::{DateTime, Utc};

// ==========================================
// SequencingModel - 定序模型
// ==========================================
// 所有时间量以"距推演起点的小时数"表达,后端无须理解绝对时刻
#[derive(Debug, Clone)]
pub struct SequencingModel {
    /// 各批次灌装时长 (小时)
    pub fill_hours: Vec<f64>,
    /// 换型矩阵: setup[i][j] = 批次 i 之后紧接批次 j 的换型时长
    pub setup: Vec<Vec<f64>>,
    /// 交付窗口起点 (相对小时, 无约束为 None)
    pub window_start_hours: Vec<Option<f64>>,
    /// 交付窗口终点 (相对小时, 无约束为 None)
    pub window_end_hours: Vec<Option<f64>>,
    /// 清洁窗口容量 (小时)
    pub window_hours: f64,
    /// 清洁时长 (小时)
    pub clean_hours: f64,
    /// 清洁块数量上限
    pub max_blocks: usize,
}

impl SequencingModel {
    /// 从批次集合与配置编译模型
    pub fn build(lots: &[Lot], start_time: DateTime<Utc>, cfg: &ScheduleConfig) -> Self {
        let n = lots.len();
        let fill_hours: Vec<f64> = lots.iter().map(|l| l.fill_hours(cfg.fill_rate_vph)).collect();

        let mut setup = vec![vec![0.0; n]; n];
        for (i, prev) in lots.iter().enumerate() {
            for (j, next) in lots.iter().enumerate() {
                if i == j {
                    continue;
                }
                setup[i][j] = if prev.lot_type == next.lot_type {
                    cfg.chg_same_hours
                } else {
                    cfg.chg_diff_hours
                };
            }
        }

        let window_start_hours = lots
            .iter()
            .map(|l| l.window_start.map(|ws| span_hours(start_time, ws)))
            .collect();
        let window_end_hours = lots
            .iter()
            .map(|l| l.window_end.map(|we| span_hours(start_time, we)))
            .collect();

        Self {
            fill_hours,
            setup,
            window_start_hours,
            window_end_hours,
            window_hours: cfg.window_hours,
            clean_hours: cfg.clean_hours,
            max_blocks: cfg.exact.max_blocks,
        }
    }

    pub fn lot_count(&self) -> usize {
        self.fill_hours.len()
    }

    /// 总灌装时长 (目标函数中的常量部分)
    pub fn total_fill_hours(&self) -> f64 {
        self.fill_hours.iter().sum()
    }

    /// 装满排所有批次所需清洁块数的下界 (仅按灌装时长估计)
    pub fn min_blocks_lower_bound(&self) -> usize {
        if self.fill_hours.is_empty() {
            return 0;
        }
        (self.total_fill_hours() / self.window_hours).ceil().max(1.0) as usize
    }
}
