// ==========================================
// 库存缓冲决策引擎 - 物料快照与缓冲配置档
// ==========================================
// 职责: 引擎的原始输入值对象
// 红线: 缺失的数值属性按 0 处理 (显式默认值，不是错误)
// ==========================================

use crate::domain::types::{LeadTimeCategory, VariabilityLevel};
use serde::{Deserialize, Serialize};

// ==========================================
// ItemSnapshot - 物料快照
// ==========================================
// 来源: ItemStore (按 sku 或 sku+location_id 读取)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub sku: String,                        // 物料编码
    #[serde(default)]
    pub location_id: Option<String>,        // 库位 (可选)
    #[serde(default)]
    pub buffer_profile_id: Option<String>,  // 关联缓冲配置档 (可选)

    // ===== 库存位置 =====
    #[serde(default)]
    pub on_hand: f64,                       // 现有库存
    #[serde(default)]
    pub on_order: f64,                      // 在途订单
    #[serde(default)]
    pub qualified_demand: f64,              // 合格需求

    // ===== 需求与提前期 =====
    #[serde(default)]
    pub adu: f64,                           // 日均用量 (≥0)
    #[serde(default)]
    pub lead_time_days: f64,                // 提前期天数 (≥0)
    #[serde(default)]
    pub variability_factor: f64,            // 需求变异系数 (≥0)
}

impl ItemSnapshot {
    /// 创建只有 sku 的空快照，其余数值为 0
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            location_id: None,
            buffer_profile_id: None,
            on_hand: 0.0,
            on_order: 0.0,
            qualified_demand: 0.0,
            adu: 0.0,
            lead_time_days: 0.0,
            variability_factor: 0.0,
        }
    }

    /// 记录键: sku 或 sku@location_id
    pub fn record_key(&self) -> String {
        match &self.location_id {
            Some(loc) if !loc.is_empty() => format!("{}@{}", self.sku, loc),
            _ => self.sku.clone(),
        }
    }
}

// ==========================================
// BufferProfile - 缓冲配置档
// ==========================================
// 关系: 多个解耦点共享同一配置档 (多对一)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferProfile {
    pub profile_id: String,                   // 配置档ID
    pub variability_factor: VariabilityLevel, // 变异等级 → 红区变异乘数
    pub lead_time_factor: LeadTimeCategory,   // 提前期类别 → 红区提前期乘数
    #[serde(default)]
    pub moq: Option<f64>,                     // 最小订货量 (红区下限 / 订货取整)
    #[serde(default)]
    pub lot_size_factor: Option<f64>,         // 批量因子 (绿区乘数)
}

impl BufferProfile {
    pub fn new(
        profile_id: impl Into<String>,
        variability_factor: VariabilityLevel,
        lead_time_factor: LeadTimeCategory,
    ) -> Self {
        Self {
            profile_id: profile_id.into(),
            variability_factor,
            lead_time_factor,
            moq: None,
            lot_size_factor: None,
        }
    }

    /// 有效 MOQ (仅正数有效)
    pub fn effective_moq(&self) -> Option<f64> {
        self.moq.filter(|m| m.is_finite() && *m > 0.0)
    }
}
