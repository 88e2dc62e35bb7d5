// ==========================================
// 灌装线排产引擎 - 工艺规则
// ==========================================
// 职责: 换型时长与清洁窗口的判定规则,供推演器/策略/精确模型共用
// 红线: 所有策略通过同一套规则评估,保证横向可比
// ==========================================

use crate::config::ScheduleConfig;

/// 窗口累计的浮点容差 (小时)
pub const EPS_HOURS: f64 = 1e-9;

/// 换型时长 (小时)
///
/// - 首灌 (无类型记忆): 0
/// - 同型: chg_same_hours
/// - 异型: chg_diff_hours
///
/// 类型记忆跨清洁保留,清洁后的首个灌装仍按上一类型判定换型
pub fn changeover_hours(prev_type: Option<&str>, next_type: &str, cfg: &ScheduleConfig) -> f64 {
    match prev_type {
        None => 0.0,
        Some(prev) if prev == next_type => cfg.chg_same_hours,
        Some(_) => cfg.chg_diff_hours,
    }
}

/// 本步 (换型 + 灌装) 是否能装入当前清洁窗口剩余容量
pub fn step_fits_window(elapsed_since_clean: f64, step_hours: f64, cfg: &ScheduleConfig) -> bool {
    elapsed_since_clean + step_hours <= cfg.window_hours + EPS_HOURS
}
