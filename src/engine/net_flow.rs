// ==========================================
// 库存缓冲决策引擎 - 净流量位置引擎
// ==========================================
// 公式: 净流量 = 现有库存 + 在途订单 - 合格需求
// 红线: 不截断，负值表示缺货风险，必须原样保留
// ==========================================

use crate::domain::buffer::NetFlowPosition;
use crate::domain::item::ItemSnapshot;

// ==========================================
// NetFlowPositionEngine - 净流量位置引擎
// ==========================================
pub struct NetFlowPositionEngine {}

impl NetFlowPositionEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算净流量位置
    pub fn compute_net_flow_position(&self, item: &ItemSnapshot) -> NetFlowPosition {
        NetFlowPosition {
            on_hand: item.on_hand,
            on_order: item.on_order,
            qualified_demand: item.qualified_demand,
            value: item.on_hand + item.on_order - item.qualified_demand,
        }
    }
}

impl Default for NetFlowPositionEngine {
    fn default() -> Self {
        Self::new()
    }
}
