// ==========================================
// 库存缓冲决策引擎 - 缓冲区领域模型
// ==========================================
// 职责: 缓冲区、净流量位置、缓冲穿透、人工调整记录
// 红线: 缓冲区只能由计算生成，人工调整必须留痕 (ZoneAdjustment)
// ==========================================

use crate::domain::types::{AdjustmentDirection, BufferStatus, PlanningPriority, ZoneKind};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// BufferZones - 红/黄/绿缓冲区
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BufferZones {
    pub red: f64,    // 安全库存
    pub yellow: f64, // 补货周期库存
    pub green: f64,  // 订货周期保护
}

impl BufferZones {
    pub fn new(red: f64, yellow: f64, green: f64) -> Self {
        Self { red, yellow, green }
    }

    /// 全零缓冲 (不可计算时的默认值)
    pub fn zero() -> Self {
        Self::default()
    }

    /// 缓冲总量
    pub fn total(&self) -> f64 {
        self.red + self.yellow + self.green
    }

    /// 红区顶 (TOR)
    pub fn top_of_red(&self) -> f64 {
        self.red
    }

    /// 黄区顶 (TOY)
    pub fn top_of_yellow(&self) -> f64 {
        self.red + self.yellow
    }

    /// 绿区顶 (TOG)
    pub fn top_of_green(&self) -> f64 {
        self.total()
    }

    pub fn zone(&self, kind: ZoneKind) -> f64 {
        match kind {
            ZoneKind::Red => self.red,
            ZoneKind::Yellow => self.yellow,
            ZoneKind::Green => self.green,
        }
    }
}

// ==========================================
// NetFlowPosition - 净流量位置
// ==========================================
// value = on_hand + on_order - qualified_demand，允许为负 (缺货风险)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetFlowPosition {
    pub on_hand: f64,
    pub on_order: f64,
    pub qualified_demand: f64,
    pub value: f64,
}

// ==========================================
// BufferPenetration - 缓冲穿透
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferPenetration {
    pub percent: f64,          // [0, 100]
    pub status: BufferStatus,  // green / yellow / red
}

// ==========================================
// ReplenishmentSignal - 补货建议
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentSignal {
    pub planning_priority: PlanningPriority,
    pub should_order: bool,
    pub order_quantity: f64,
}

// ==========================================
// ZoneAdjustment - 缓冲区人工调整记录
// ==========================================
// 红线: 每次调整必须附带原因，只追加不修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAdjustment {
    pub adjustment_id: String,
    pub sku: String,
    pub before: BufferZones,
    pub after: BufferZones,
    pub factor: f64,                    // 百分比
    pub direction: AdjustmentDirection,
    pub zones: BTreeSet<ZoneKind>,      // 被调整的区
    pub reason: String,                 // 调整原因
    pub adjusted_at: NaiveDateTime,
}
