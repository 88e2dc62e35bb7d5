// ==========================================
// 灌装线排产引擎 - 领域类型定义
// ==========================================
// 职责: 定义排产引擎的封闭枚举类型
// 红线: 策略集合是封闭可枚举的,用 sum type + match 分发,不做开放式动态派发
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 活动类别 (Activity Kind)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与报表层一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Fill,       // 灌装
    Changeover, // 换型
    Clean,      // 清洁 (CIP/SIP)
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Fill => write!(f, "FILL"),
            ActivityKind::Changeover => write!(f, "CHANGEOVER"),
            ActivityKind::Clean => write!(f, "CLEAN"),
        }
    }
}

// ==========================================
// 排产策略 (Strategy Kind)
// ==========================================
// 用途:
// - 多策略试算在不落库的前提下使用不同策略生成候选排列;
// - 对比报表复用相同策略参数,保证结果可复现。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    SptPack,    // 最短灌装时长优先
    LptPack,    // 最长灌装时长优先
    CfsPack,    // 先聚类后排序
    HybridPack, // 混合加权贪心
    SmartPack,  // 有界束搜索
    ExactOpt,   // 精确求解 (规模受限)
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::SptPack => "spt_pack",
            StrategyKind::LptPack => "lpt_pack",
            StrategyKind::CfsPack => "cfs_pack",
            StrategyKind::HybridPack => "hybrid_pack",
            StrategyKind::SmartPack => "smart_pack",
            StrategyKind::ExactOpt => "exact_opt",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            StrategyKind::SptPack => "短单优先",
            StrategyKind::LptPack => "长单优先",
            StrategyKind::CfsPack => "同型聚类",
            StrategyKind::HybridPack => "混合贪心",
            StrategyKind::SmartPack => "智能束搜索",
            StrategyKind::ExactOpt => "精确求解",
        }
    }

    /// 全部可用策略 (对比试算的默认集合)
    pub fn all() -> [StrategyKind; 6] {
        [
            StrategyKind::SptPack,
            StrategyKind::LptPack,
            StrategyKind::CfsPack,
            StrategyKind::HybridPack,
            StrategyKind::SmartPack,
            StrategyKind::ExactOpt,
        ]
    }

    /// 全部启发式策略 (不含精确求解)
    pub fn heuristics() -> [StrategyKind; 5] {
        [
            StrategyKind::SptPack,
            StrategyKind::LptPack,
            StrategyKind::CfsPack,
            StrategyKind::HybridPack,
            StrategyKind::SmartPack,
        ]
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::SmartPack
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "spt_pack" | "sptpack" | "spt" => Ok(StrategyKind::SptPack),
            "lpt_pack" | "lptpack" | "lpt" => Ok(StrategyKind::LptPack),
            "cfs_pack" | "cfspack" | "cfs" => Ok(StrategyKind::CfsPack),
            "hybrid_pack" | "hybrid" => Ok(StrategyKind::HybridPack),
            "smart_pack" | "smartpack" | "smart" => Ok(StrategyKind::SmartPack),
            "exact_opt" | "exactopt" | "exact" => Ok(StrategyKind::ExactOpt),
            other => Err(format!("未知策略类型: {}", other)),
        }
    }
}

// ==========================================
// 聚类排序方式 (CFS 策略)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterOrder {
    ByCount,      // 按批次数量降序
    ByTotalHours, // 按总灌装时长降序
}

impl Default for ClusterOrder {
    fn default() -> Self {
        ClusterOrder::ByCount
    }
}

impl fmt::Display for ClusterOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterOrder::ByCount => write!(f, "by_count"),
            ClusterOrder::ByTotalHours => write!(f, "by_total_hours"),
        }
    }
}

// ==========================================
// 簇内排序方式 (CFS 策略)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithinOrder {
    Spt, // 簇内短单优先
    Lpt, // 簇内长单优先
}

impl Default for WithinOrder {
    fn default() -> Self {
        WithinOrder::Lpt
    }
}

impl fmt::Display for WithinOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithinOrder::Spt => write!(f, "SPT"),
            WithinOrder::Lpt => write!(f, "LPT"),
        }
    }
}

// ==========================================
// 求解状态 (Solve Status)
// ==========================================
// TIME_LIMITED 是告警级结果,不是失败:
// 时限内未完成最优性证明,但返回了可行排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    Optimal,     // 已证明最优
    TimeLimited, // 时限截断,可行但未证最优
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "OPTIMAL"),
            SolveStatus::TimeLimited => write!(f, "TIME_LIMITED"),
        }
    }
}

// ==========================================
// 对比排序维度 (Comparison Sort)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonSort {
    ByMakespan,    // 按总工期升序
    ByUtilization, // 按利用率降序
}

impl Default for ComparisonSort {
    fn default() -> Self {
        ComparisonSort::ByMakespan
    }
}
