// ==========================================
// 灌装线排产引擎 - 同型聚类策略 (CFS)
// ==========================================
// 先聚类后排序:
// 1) 按产品类型聚簇;
// 2) 簇间按批次数量或总灌装时长降序 (可配置), 平局按类型名;
// 3) 簇内按 SPT 或 LPT (可配置)
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::lot::Lot;
use crate::domain::types::{ClusterOrder, WithinOrder};
use std::collections::BTreeMap;

// ==========================================
// CfsPack - 同型聚类
// ==========================================
pub struct CfsPack {
    // 无状态策略,不需要注入依赖
}

impl CfsPack {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 聚类后拼接为总排列
    pub fn order(&self, lots: &[Lot], cfg: &ScheduleConfig) -> Vec<Lot> {
        // BTreeMap 保证聚簇遍历顺序确定
        let mut clusters: BTreeMap<String, Vec<Lot>> = BTreeMap::new();
        for lot in lots {
            clusters
                .entry(lot.lot_type.clone())
                .or_default()
                .push(lot.clone());
        }

        let mut ordered_clusters: Vec<(String, Vec<Lot>)> = clusters.into_iter().collect();
        match cfg.cfs.cluster_order {
            ClusterOrder::ByCount => {
                ordered_clusters.sort_by(|a, b| {
                    b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0))
                });
            }
            ClusterOrder::ByTotalHours => {
                ordered_clusters.sort_by(|a, b| {
                    let ta: f64 = a.1.iter().map(|l| l.fill_hours(cfg.fill_rate_vph)).sum();
                    let tb: f64 = b.1.iter().map(|l| l.fill_hours(cfg.fill_rate_vph)).sum();
                    tb.total_cmp(&ta).then_with(|| a.0.cmp(&b.0))
                });
            }
        }

        let mut ordered = Vec::with_capacity(lots.len());
        for (_, mut cluster) in ordered_clusters {
            self.sequence_within(&mut cluster, cfg);
            ordered.extend(cluster);
        }
        ordered
    }

    /// 簇内排序 (SPT/LPT, 平局按 priority 再按批次号)
    fn sequence_within(&self, cluster: &mut [Lot], cfg: &ScheduleConfig) {
        match cfg.cfs.within {
            WithinOrder::Spt => cluster.sort_by(|a, b| {
                a.fill_hours(cfg.fill_rate_vph)
                    .total_cmp(&b.fill_hours(cfg.fill_rate_vph))
                    .then_with(|| a.priority.cmp(&b.priority))
                    .then_with(|| a.lot_id.cmp(&b.lot_id))
            }),
            WithinOrder::Lpt => cluster.sort_by(|a, b| {
                b.fill_hours(cfg.fill_rate_vph)
                    .total_cmp(&a.fill_hours(cfg.fill_rate_vph))
                    .then_with(|| a.priority.cmp(&b.priority))
                    .then_with(|| a.lot_id.cmp(&b.lot_id))
            }),
        }
    }
}

impl Default for CfsPack {
    fn default() -> Self {
        Self::new()
    }
}
