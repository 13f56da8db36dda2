// ==========================================
// 库存缓冲决策引擎 - 领域类型定义
// ==========================================
// 职责: 分类等级、缓冲状态、解耦点类型等枚举
// 序列化格式: snake_case (与外部记录存储一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 变异等级 (Variability Level)
// ==========================================
// 用途: 缓冲配置档的变异因子 / SKU 分类的变异轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariabilityLevel {
    Low,    // 低变异
    Medium, // 中变异
    High,   // 高变异
}

impl fmt::Display for VariabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariabilityLevel::Low => write!(f, "low"),
            VariabilityLevel::Medium => write!(f, "medium"),
            VariabilityLevel::High => write!(f, "high"),
        }
    }
}

// ==========================================
// 提前期类别 (Lead Time Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTimeCategory {
    Short,  // 短提前期
    Medium, // 中提前期
    Long,   // 长提前期
}

impl fmt::Display for LeadTimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadTimeCategory::Short => write!(f, "short"),
            LeadTimeCategory::Medium => write!(f, "medium"),
            LeadTimeCategory::Long => write!(f, "long"),
        }
    }
}

// ==========================================
// 关键度 (Criticality)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Low,
    Medium,
    High,
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criticality::Low => write!(f, "low"),
            Criticality::Medium => write!(f, "medium"),
            Criticality::High => write!(f, "high"),
        }
    }
}

// ==========================================
// 缓冲状态 (Buffer Status)
// ==========================================
// 顺序: Green < Yellow < Red (穿透越深越危险)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferStatus {
    Green,  // 安全
    Yellow, // 补货区
    Red,    // 危险
}

impl fmt::Display for BufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferStatus::Green => write!(f, "green"),
            BufferStatus::Yellow => write!(f, "yellow"),
            BufferStatus::Red => write!(f, "red"),
        }
    }
}

// ==========================================
// 缓冲越界类型 (Breach Type)
// ==========================================
// 与穿透状态正交: 穿透被截断在 [0,100]，越界保留"超出绿区顶"(蓝) 的信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachType {
    BelowTor, // 净流量 < 红区顶，缺货风险
    BelowToy, // 净流量 < 黄区顶
    AboveTog, // 净流量 > 绿区顶，库存过剩 (蓝)
}

impl fmt::Display for BreachType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreachType::BelowTor => write!(f, "below_tor"),
            BreachType::BelowToy => write!(f, "below_toy"),
            BreachType::AboveTog => write!(f, "above_tog"),
        }
    }
}

// ==========================================
// 缓冲区 (Zone Kind)
// ==========================================
// 用途: 人工调整时选择要缩放的区
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Red,
    Yellow,
    Green,
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneKind::Red => write!(f, "red"),
            ZoneKind::Yellow => write!(f, "yellow"),
            ZoneKind::Green => write!(f, "green"),
        }
    }
}

// ==========================================
// 调整方向 (Adjustment Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentDirection {
    Up,   // 放大 1 + factor/100
    Down, // 缩小 1 - factor/100
}

impl fmt::Display for AdjustmentDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentDirection::Up => write!(f, "up"),
            AdjustmentDirection::Down => write!(f, "down"),
        }
    }
}

// ==========================================
// 解耦点类型 (Decoupling Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecouplingType {
    Strategic,     // 战略解耦点
    CustomerOrder, // 客户订单解耦点
    StockPoint,    // 库存点
    Intermediate,  // 中间点
}

impl DecouplingType {
    /// 全部类型（固定顺序，用于分布统计）
    pub const ALL: [DecouplingType; 4] = [
        DecouplingType::Strategic,
        DecouplingType::CustomerOrder,
        DecouplingType::StockPoint,
        DecouplingType::Intermediate,
    ];

    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            DecouplingType::Strategic => "strategic",
            DecouplingType::CustomerOrder => "customer_order",
            DecouplingType::StockPoint => "stock_point",
            DecouplingType::Intermediate => "intermediate",
        }
    }

    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strategic" => Some(DecouplingType::Strategic),
            "customer_order" => Some(DecouplingType::CustomerOrder),
            "stock_point" => Some(DecouplingType::StockPoint),
            "intermediate" => Some(DecouplingType::Intermediate),
            _ => None,
        }
    }
}

impl fmt::Display for DecouplingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 分布状态 (Distribution Status)
// ==========================================
// 仅提示，不拒绝定位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStatus {
    Ok,   // 占比 ≤ 基准
    Over, // 占比 > 基准
}

impl fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionStatus::Ok => write!(f, "ok"),
            DistributionStatus::Over => write!(f, "over"),
        }
    }
}

// ==========================================
// 计划优先级 (Planning Priority)
// ==========================================
// 依据缓冲穿透百分比
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for PlanningPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningPriority::Low => write!(f, "low"),
            PlanningPriority::Medium => write!(f, "medium"),
            PlanningPriority::High => write!(f, "high"),
            PlanningPriority::Critical => write!(f, "critical"),
        }
    }
}

// ==========================================
// 解耦点指定决策 (Designation Decision)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignationDecision {
    AutoDesignate, // 得分 ≥ decoupling_threshold
    Review,        // 得分 ≥ review_threshold
    Reject,        // 其他
}

impl fmt::Display for DesignationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignationDecision::AutoDesignate => write!(f, "auto_designate"),
            DesignationDecision::Review => write!(f, "review"),
            DesignationDecision::Reject => write!(f, "reject"),
        }
    }
}
