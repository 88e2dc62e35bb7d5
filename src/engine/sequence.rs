// ==========================================
// 灌装线排产引擎 - 外部序列工具
// ==========================================
// 职责: 按外部给定的批次号序列重排批次集合
// 用途: "给定顺序" 与优化策略的对比基准 (给定顺序同样走推演器)
// ==========================================

use crate::domain::lot::Lot;
use std::collections::HashMap;

// ==========================================
// SequenceOrdering - 重排结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOrdering {
    /// 重排后的批次: 序列中提到的在前,未提到的按输入顺序追加
    pub ordered: Vec<Lot>,
    /// 序列中无法匹配任何批次的批次号
    pub unknown_ids: Vec<String>,
}

/// 按批次号序列重排批次集合
///
/// 序列未提到的批次保持输入相对顺序追加在尾部;
/// 未知批次号不报错,记录后由调用方决定如何呈现
pub fn order_lots_by_sequence(lots: &[Lot], sequence: &[String]) -> SequenceOrdering {
    let by_id: HashMap<&str, &Lot> = lots.iter().map(|l| (l.lot_id.as_str(), l)).collect();

    let mut ordered: Vec<Lot> = Vec::with_capacity(lots.len());
    let mut unknown_ids: Vec<String> = Vec::new();
    let mut mentioned: std::collections::HashSet<&str> = std::collections::HashSet::new();

    for lot_id in sequence {
        match by_id.get(lot_id.as_str()) {
            Some(lot) => {
                // 序列中的重复批次号只取首次出现
                if mentioned.insert(lot_id.as_str()) {
                    ordered.push((*lot).clone());
                }
            }
            None => unknown_ids.push(lot_id.clone()),
        }
    }

    for lot in lots {
        if !mentioned.contains(lot.lot_id.as_str()) {
            ordered.push(lot.clone());
        }
    }

    SequenceOrdering {
        ordered,
        unknown_ids,
    }
}
