// ==========================================
// 灌装线排产引擎 - 排产配置
// ==========================================
// 职责: 工艺常量 + 策略参数的统一配置记录
// 红线: 加载时全量校验,校验失败前不进入任何推演; 绝不部分生效
// ==========================================

use crate::domain::types::{ClusterOrder, StrategyKind, WithinOrder};
use crate::engine::error::ScheduleError;
use serde::{Deserialize, Serialize};

// ==========================================
// SmartPackConfig - 束搜索策略参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartPackConfig {
    /// 束宽 (1~10), 宽度 1 退化为纯贪心
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,

    /// 异型换型惩罚 (小时当量)
    #[serde(default = "default_score_alpha")]
    pub score_alpha: f64,

    /// 同型换型惩罚 (小时当量)
    #[serde(default = "default_score_beta")]
    pub score_beta: f64,

    /// 浪费窗口容量的单位惩罚
    #[serde(default = "default_slack_waste_weight")]
    pub slack_waste_weight: f64,

    /// 类型连跑奖励
    #[serde(default = "default_streak_bonus")]
    pub streak_bonus: f64,
}

fn default_beam_width() -> usize {
    3
}
fn default_score_alpha() -> f64 {
    8.0
}
fn default_score_beta() -> f64 {
    4.0
}
fn default_slack_waste_weight() -> f64 {
    3.0
}
fn default_streak_bonus() -> f64 {
    1.0
}

impl Default for SmartPackConfig {
    fn default() -> Self {
        Self {
            beam_width: default_beam_width(),
            score_alpha: default_score_alpha(),
            score_beta: default_score_beta(),
            slack_waste_weight: default_slack_waste_weight(),
            streak_bonus: default_streak_bonus(),
        }
    }
}

// ==========================================
// CfsPackConfig - 聚类策略参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CfsPackConfig {
    /// 簇间排序: by_count / by_total_hours
    #[serde(default)]
    pub cluster_order: ClusterOrder,

    /// 簇内排序: SPT / LPT
    #[serde(default)]
    pub within: WithinOrder,
}

// ==========================================
// HybridPackConfig - 混合贪心策略参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridPackConfig {
    /// 同型续跑奖励
    #[serde(default = "default_same_type_bonus")]
    pub same_type_bonus: f64,

    /// 同型连跑内的 SPT 偏好权重
    #[serde(default = "default_spt_weight")]
    pub spt_weight: f64,

    /// 换型惩罚乘数 (>= 1.0)
    #[serde(default = "default_switch_penalty_mult")]
    pub switch_penalty_mult: f64,
}

fn default_same_type_bonus() -> f64 {
    2.0
}
fn default_spt_weight() -> f64 {
    0.5
}
fn default_switch_penalty_mult() -> f64 {
    1.1
}

impl Default for HybridPackConfig {
    fn default() -> Self {
        Self {
            same_type_bonus: default_same_type_bonus(),
            spt_weight: default_spt_weight(),
            switch_penalty_mult: default_switch_penalty_mult(),
        }
    }
}

// ==========================================
// ExactConfig - 精确求解参数
// ==========================================
// 硬前置: 批次数超过 max_lots 时拒绝求解 (CapacityExceeded),绝不静默截断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactConfig {
    /// 批次数上限 (保证模型规模可解)
    #[serde(default = "default_max_lots")]
    pub max_lots: usize,

    /// 清洁块数量上限
    #[serde(default = "default_max_blocks")]
    pub max_blocks: usize,

    /// 求解墙钟时限 (秒)
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u64,
}

fn default_max_lots() -> usize {
    30
}
fn default_max_blocks() -> usize {
    30
}
fn default_time_limit_secs() -> u64 {
    60
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            max_lots: default_max_lots(),
            max_blocks: default_max_blocks(),
            time_limit_secs: default_time_limit_secs(),
        }
    }
}

// ==========================================
// ScheduleConfig - 排产配置全集
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// 产线代码
    #[serde(default = "default_line_id")]
    pub line_id: String,

    /// 灌装速率 (瓶/小时, > 0)
    #[serde(default = "default_fill_rate_vph")]
    pub fill_rate_vph: f64,

    /// 清洁时长 (小时, >= 0)
    #[serde(default = "default_clean_hours")]
    pub clean_hours: f64,

    /// 两次清洁之间的最大连续运行窗口 (小时, > 0)
    #[serde(default = "default_window_hours")]
    pub window_hours: f64,

    /// 同型换型时长 (小时, >= 0)
    #[serde(default = "default_chg_same_hours")]
    pub chg_same_hours: f64,

    /// 异型换型时长 (小时, >= 0)
    #[serde(default = "default_chg_diff_hours")]
    pub chg_diff_hours: f64,

    /// 默认策略
    #[serde(default)]
    pub strategy: StrategyKind,

    /// 束搜索策略参数
    #[serde(default)]
    pub smart: SmartPackConfig,

    /// 聚类策略参数
    #[serde(default)]
    pub cfs: CfsPackConfig,

    /// 混合贪心策略参数
    #[serde(default)]
    pub hybrid: HybridPackConfig,

    /// 精确求解参数
    #[serde(default)]
    pub exact: ExactConfig,
}

fn default_line_id() -> String {
    "FL-01".to_string()
}
fn default_fill_rate_vph() -> f64 {
    19920.0
}
fn default_clean_hours() -> f64 {
    24.0
}
fn default_window_hours() -> f64 {
    120.0
}
fn default_chg_same_hours() -> f64 {
    4.0
}
fn default_chg_diff_hours() -> f64 {
    8.0
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            line_id: default_line_id(),
            fill_rate_vph: default_fill_rate_vph(),
            clean_hours: default_clean_hours(),
            window_hours: default_window_hours(),
            chg_same_hours: default_chg_same_hours(),
            chg_diff_hours: default_chg_diff_hours(),
            strategy: StrategyKind::default(),
            smart: SmartPackConfig::default(),
            cfs: CfsPackConfig::default(),
            hybrid: HybridPackConfig::default(),
            exact: ExactConfig::default(),
        }
    }
}

impl ScheduleConfig {
    /// 全量校验 (首个越界项即返回错误)
    ///
    /// # 返回
    /// - Ok(()): 全部配置项在定义域内
    /// - Err(InvalidConfiguration): 字段名 + 越界原因
    pub fn validate(&self) -> Result<(), ScheduleError> {
        fn invalid(field: &str, reason: String) -> Result<(), ScheduleError> {
            Err(ScheduleError::InvalidConfiguration {
                field: field.to_string(),
                reason,
            })
        }

        if self.line_id.trim().is_empty() {
            return invalid("line_id", "产线代码不能为空".to_string());
        }
        if !(self.fill_rate_vph > 0.0) || !self.fill_rate_vph.is_finite() {
            return invalid(
                "fill_rate_vph",
                format!("灌装速率必须 > 0, 实际 {}", self.fill_rate_vph),
            );
        }
        if !(self.window_hours > 0.0) || !self.window_hours.is_finite() {
            return invalid(
                "window_hours",
                format!("清洁窗口必须 > 0, 实际 {}", self.window_hours),
            );
        }
        if self.clean_hours < 0.0 || !self.clean_hours.is_finite() {
            return invalid(
                "clean_hours",
                format!("清洁时长必须 >= 0, 实际 {}", self.clean_hours),
            );
        }
        if self.chg_same_hours < 0.0 || !self.chg_same_hours.is_finite() {
            return invalid(
                "chg_same_hours",
                format!("同型换型时长必须 >= 0, 实际 {}", self.chg_same_hours),
            );
        }
        if self.chg_diff_hours < 0.0 || !self.chg_diff_hours.is_finite() {
            return invalid(
                "chg_diff_hours",
                format!("异型换型时长必须 >= 0, 实际 {}", self.chg_diff_hours),
            );
        }

        // ===== 束搜索参数 =====
        if !(1..=10).contains(&self.smart.beam_width) {
            return invalid(
                "smart.beam_width",
                format!("束宽必须在 1~10 之间, 实际 {}", self.smart.beam_width),
            );
        }
        if self.smart.score_alpha < 0.0 {
            return invalid(
                "smart.score_alpha",
                format!("异型换型惩罚必须 >= 0, 实际 {}", self.smart.score_alpha),
            );
        }
        if self.smart.score_beta < 0.0 {
            return invalid(
                "smart.score_beta",
                format!("同型换型惩罚必须 >= 0, 实际 {}", self.smart.score_beta),
            );
        }
        if self.smart.slack_waste_weight < 0.0 {
            return invalid(
                "smart.slack_waste_weight",
                format!(
                    "浪费容量惩罚权重必须 >= 0, 实际 {}",
                    self.smart.slack_waste_weight
                ),
            );
        }
        if self.smart.streak_bonus < 0.0 {
            return invalid(
                "smart.streak_bonus",
                format!("连跑奖励必须 >= 0, 实际 {}", self.smart.streak_bonus),
            );
        }

        // ===== 混合贪心参数 =====
        if self.hybrid.same_type_bonus < 0.0 {
            return invalid(
                "hybrid.same_type_bonus",
                format!("同型奖励必须 >= 0, 实际 {}", self.hybrid.same_type_bonus),
            );
        }
        if self.hybrid.spt_weight < 0.0 {
            return invalid(
                "hybrid.spt_weight",
                format!("SPT 权重必须 >= 0, 实际 {}", self.hybrid.spt_weight),
            );
        }
        if self.hybrid.switch_penalty_mult < 1.0 {
            return invalid(
                "hybrid.switch_penalty_mult",
                format!(
                    "换型惩罚乘数必须 >= 1.0, 实际 {}",
                    self.hybrid.switch_penalty_mult
                ),
            );
        }

        // ===== 精确求解参数 =====
        if self.exact.max_lots == 0 {
            return invalid("exact.max_lots", "批次数上限必须 >= 1".to_string());
        }
        if self.exact.max_blocks == 0 {
            return invalid("exact.max_blocks", "清洁块上限必须 >= 1".to_string());
        }
        if self.exact.time_limit_secs == 0 {
            return invalid("exact.time_limit_secs", "求解时限必须 >= 1 秒".to_string());
        }

        Ok(())
    }

    /// 从 JSON 配置快照解析并校验
    ///
    /// 传输层交给引擎的是 JSON 文档 (配置快照),解析失败与
    /// 校验失败同样按 InvalidConfiguration 处理
    pub fn from_json_str(json: &str) -> Result<Self, ScheduleError> {
        let cfg: ScheduleConfig =
            serde_json::from_str(json).map_err(|e| ScheduleError::InvalidConfiguration {
                field: "$".to_string(),
                reason: format!("配置快照解析失败: {}", e),
            })?;
        cfg.validate()?;
        Ok(cfg)
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = ScheduleConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.strategy, StrategyKind::SmartPack);
        assert_eq!(cfg.smart.beam_width, 3);
    }

    #[test]
    fn test_negative_window_rejected() {
        let cfg = ScheduleConfig {
            window_hours: -1.0,
            ..ScheduleConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        match err {
            ScheduleError::InvalidConfiguration { field, .. } => {
                assert_eq!(field, "window_hours");
            }
            other => panic!("期望 InvalidConfiguration, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_beam_width_out_of_range_rejected() {
        let mut cfg = ScheduleConfig::default();
        cfg.smart.beam_width = 11;
        assert!(cfg.validate().is_err());

        cfg.smart.beam_width = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_switch_penalty_mult_below_one_rejected() {
        let mut cfg = ScheduleConfig::default();
        cfg.hybrid.switch_penalty_mult = 0.9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_json_snapshot_with_partial_fields() {
        let cfg = ScheduleConfig::from_json_str(
            r#"{"fill_rate_vph": 1000.0, "strategy": "spt_pack", "smart": {"beam_width": 5}}"#,
        )
        .unwrap();
        assert_eq!(cfg.fill_rate_vph, 1000.0);
        assert_eq!(cfg.strategy, StrategyKind::SptPack);
        assert_eq!(cfg.smart.beam_width, 5);
        // 未给出的字段取默认值
        assert_eq!(cfg.window_hours, 120.0);
        assert_eq!(cfg.cfs.within, WithinOrder::Lpt);
    }

    #[test]
    fn test_from_json_unknown_strategy_rejected() {
        let err = ScheduleConfig::from_json_str(r#"{"strategy": "magic_pack"}"#).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::InvalidConfiguration { .. }
        ));
    }
}
