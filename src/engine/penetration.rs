// ==========================================
// 库存缓冲决策引擎 - 缓冲穿透分类引擎
// ==========================================
// 职责: 穿透百分比 → 绿/黄/红状态; 越界检测; 计划优先级与补货建议
// 输入: NetFlowPosition + BufferZones (+ BufferProfile 取 MOQ)
// 输出: BufferPenetration / BreachType / ReplenishmentSignal
// ==========================================
// 状态边界 (含边界在较安全一侧):
// - percent ≤ 33        → green
// - 33 < percent ≤ 66   → yellow
// - percent > 66        → red
// ==========================================

use crate::domain::buffer::{BufferPenetration, BufferZones, NetFlowPosition, ReplenishmentSignal};
use crate::domain::item::BufferProfile;
use crate::domain::types::{BreachType, BufferStatus, PlanningPriority};
use crate::error::{EngineError, EngineResult};

/// 绿区上界 (百分比)
pub const GREEN_UPPER_PERCENT: f64 = 33.0;
/// 黄区上界 (百分比)
pub const YELLOW_UPPER_PERCENT: f64 = 66.0;

// 计划优先级阈值
const CRITICAL_PRIORITY_PERCENT: f64 = 95.0;
const HIGH_PRIORITY_PERCENT: f64 = 80.0;
const MEDIUM_PRIORITY_PERCENT: f64 = 60.0;

// ==========================================
// BufferPenetrationClassifier - 缓冲穿透分类引擎
// ==========================================
pub struct BufferPenetrationClassifier {}

impl BufferPenetrationClassifier {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算缓冲穿透
    ///
    /// percent = clamp((total - nfp) / total × 100, 0, 100)
    ///
    /// 缓冲总量为 0 (不可计算) 时返回 `{0, green}`。
    ///
    /// # 错误
    /// - 净流量非有限数 (NaN/∞) → Validation
    pub fn classify(&self, net_flow: &NetFlowPosition, zones: &BufferZones) -> EngineResult<BufferPenetration> {
        ensure_finite_net_flow(net_flow)?;

        let total = zones.total();
        if !total.is_finite() || total <= 0.0 {
            return Ok(BufferPenetration {
                percent: 0.0,
                status: BufferStatus::Green,
            });
        }

        let percent = ((total - net_flow.value) / total * 100.0).clamp(0.0, 100.0);
        Ok(BufferPenetration {
            percent,
            status: self.status_for_percent(percent),
        })
    }

    /// 穿透百分比 → 状态
    pub fn status_for_percent(&self, percent: f64) -> BufferStatus {
        if percent <= GREEN_UPPER_PERCENT {
            BufferStatus::Green
        } else if percent <= YELLOW_UPPER_PERCENT {
            BufferStatus::Yellow
        } else {
            BufferStatus::Red
        }
    }
}

impl Default for BufferPenetrationClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_finite_net_flow(net_flow: &NetFlowPosition) -> EngineResult<()> {
    if net_flow.value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::validation(format!(
            "净流量 {} 非有限数 (现有 {}, 在途 {}, 合格需求 {})",
            net_flow.value, net_flow.on_hand, net_flow.on_order, net_flow.qualified_demand
        )))
    }
}

// ==========================================
// BufferBreachDetector - 缓冲越界检测
// ==========================================
// 判定顺序 (严格不等号，恰好落在区顶不算越界):
// - nfp < TOR → BelowTor
// - nfp < TOY → BelowToy
// - nfp > TOG → AboveTog
pub struct BufferBreachDetector {}

impl BufferBreachDetector {
    pub fn new() -> Self {
        Self {}
    }

    /// 检测越界; 缓冲不可计算 (总量为 0) 时无越界
    pub fn detect(&self, net_flow: &NetFlowPosition, zones: &BufferZones) -> EngineResult<Option<BreachType>> {
        ensure_finite_net_flow(net_flow)?;

        let total = zones.total();
        if !total.is_finite() || total <= 0.0 {
            return Ok(None);
        }

        let nfp = net_flow.value;
        let breach = if nfp < zones.top_of_red() {
            Some(BreachType::BelowTor)
        } else if nfp < zones.top_of_yellow() {
            Some(BreachType::BelowToy)
        } else if nfp > zones.top_of_green() {
            Some(BreachType::AboveTog)
        } else {
            None
        };
        Ok(breach)
    }
}

impl Default for BufferBreachDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// ReplenishmentAdvisor - 补货建议
// ==========================================
pub struct ReplenishmentAdvisor {}

impl ReplenishmentAdvisor {
    pub fn new() -> Self {
        Self {}
    }

    /// 穿透百分比 → 计划优先级
    pub fn planning_priority(&self, penetration_percent: f64) -> PlanningPriority {
        if penetration_percent >= CRITICAL_PRIORITY_PERCENT {
            PlanningPriority::Critical
        } else if penetration_percent >= HIGH_PRIORITY_PERCENT {
            PlanningPriority::High
        } else if penetration_percent >= MEDIUM_PRIORITY_PERCENT {
            PlanningPriority::Medium
        } else {
            PlanningPriority::Low
        }
    }

    /// 生成补货建议
    ///
    /// # 参数
    /// - `net_flow`: 净流量位置
    /// - `zones`: 缓冲区
    /// - `penetration`: 缓冲穿透
    /// - `profile`: 缓冲配置档 (提供 MOQ 时订货量向上取整到 MOQ 倍数)
    ///
    /// # 规则
    /// - 缓冲可计算且净流量 ≤ 黄区顶 时下单
    /// - 订货量 = 绿区顶 - 净流量，不下单时为 0
    pub fn recommend(
        &self,
        net_flow: &NetFlowPosition,
        zones: &BufferZones,
        penetration: &BufferPenetration,
        profile: Option<&BufferProfile>,
    ) -> ReplenishmentSignal {
        let computable = zones.total() > 0.0;
        let should_order = computable && net_flow.value <= zones.top_of_yellow();

        let order_quantity = if should_order {
            let raw = (zones.top_of_green() - net_flow.value).max(0.0);
            match profile.and_then(|p| p.effective_moq()) {
                Some(moq) => (raw / moq).ceil() * moq,
                None => raw,
            }
        } else {
            0.0
        };

        ReplenishmentSignal {
            planning_priority: self.planning_priority(penetration.percent),
            should_order,
            order_quantity,
        }
    }
}

impl Default for ReplenishmentAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{LeadTimeCategory, VariabilityLevel};

    fn nfp(value: f64) -> NetFlowPosition {
        NetFlowPosition {
            on_hand: value,
            on_order: 0.0,
            qualified_demand: 0.0,
            value,
        }
    }

    #[test]
    fn test_status_boundaries_are_exact() {
        let classifier = BufferPenetrationClassifier::new();
        assert_eq!(classifier.status_for_percent(0.0), BufferStatus::Green);
        assert_eq!(classifier.status_for_percent(33.0), BufferStatus::Green);
        assert_eq!(classifier.status_for_percent(33.0001), BufferStatus::Yellow);
        assert_eq!(classifier.status_for_percent(66.0), BufferStatus::Yellow);
        assert_eq!(classifier.status_for_percent(66.0001), BufferStatus::Red);
        assert_eq!(classifier.status_for_percent(100.0), BufferStatus::Red);
    }

    #[test]
    fn test_classify_percent_and_status() {
        let classifier = BufferPenetrationClassifier::new();
        let zones = BufferZones::new(20.0, 50.0, 30.0);

        let p = classifier.classify(&nfp(50.0), &zones).unwrap();
        assert_eq!(p.percent, 50.0);
        assert_eq!(p.status, BufferStatus::Yellow);

        let p = classifier.classify(&nfp(75.0), &zones).unwrap();
        assert_eq!(p.percent, 25.0);
        assert_eq!(p.status, BufferStatus::Green);
    }

    #[test]
    fn test_classify_clamps_to_range() {
        let classifier = BufferPenetrationClassifier::new();
        let zones = BufferZones::new(20.0, 50.0, 30.0);

        // 负净流量 → 100%
        let p = classifier.classify(&nfp(-10.0), &zones).unwrap();
        assert_eq!(p.percent, 100.0);
        assert_eq!(p.status, BufferStatus::Red);

        // 超过绿区顶 → 0%
        let p = classifier.classify(&nfp(250.0), &zones).unwrap();
        assert_eq!(p.percent, 0.0);
        assert_eq!(p.status, BufferStatus::Green);
    }

    #[test]
    fn test_zero_buffer_is_green_zero() {
        let classifier = BufferPenetrationClassifier::new();
        let p = classifier.classify(&nfp(-500.0), &BufferZones::zero()).unwrap();
        assert_eq!(p.percent, 0.0);
        assert_eq!(p.status, BufferStatus::Green);
    }

    #[test]
    fn test_non_finite_net_flow_rejected() {
        let classifier = BufferPenetrationClassifier::new();
        let zones = BufferZones::new(20.0, 50.0, 30.0);

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                classifier.classify(&nfp(value), &zones),
                Err(EngineError::Validation(_))
            ));
        }
        // 不可计算的缓冲也不掩盖坏输入
        assert!(classifier.classify(&nfp(f64::NAN), &BufferZones::zero()).is_err());
    }

    #[test]
    fn test_breach_detection_bands() {
        let detector = BufferBreachDetector::new();
        // TOR 20, TOY 70, TOG 100
        let zones = BufferZones::new(20.0, 50.0, 30.0);

        assert_eq!(detector.detect(&nfp(-5.0), &zones).unwrap(), Some(BreachType::BelowTor));
        assert_eq!(detector.detect(&nfp(19.9), &zones).unwrap(), Some(BreachType::BelowTor));
        assert_eq!(detector.detect(&nfp(20.0), &zones).unwrap(), Some(BreachType::BelowToy));
        assert_eq!(detector.detect(&nfp(69.9), &zones).unwrap(), Some(BreachType::BelowToy));
        assert_eq!(detector.detect(&nfp(70.0), &zones).unwrap(), None);
        assert_eq!(detector.detect(&nfp(100.0), &zones).unwrap(), None);
        assert_eq!(detector.detect(&nfp(100.5), &zones).unwrap(), Some(BreachType::AboveTog));
    }

    #[test]
    fn test_excess_is_visible_although_penetration_clamps() {
        let classifier = BufferPenetrationClassifier::new();
        let detector = BufferBreachDetector::new();
        let zones = BufferZones::new(20.0, 50.0, 30.0);

        let penetration = classifier.classify(&nfp(400.0), &zones).unwrap();
        assert_eq!(penetration.percent, 0.0);
        assert_eq!(penetration.status, BufferStatus::Green);
        assert_eq!(detector.detect(&nfp(400.0), &zones).unwrap(), Some(BreachType::AboveTog));
    }

    #[test]
    fn test_no_breach_without_buffer() {
        let detector = BufferBreachDetector::new();
        assert_eq!(detector.detect(&nfp(-100.0), &BufferZones::zero()).unwrap(), None);
        assert!(matches!(
            detector.detect(&nfp(f64::NAN), &BufferZones::new(1.0, 1.0, 1.0)),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn test_planning_priority_bands() {
        let advisor = ReplenishmentAdvisor::new();
        assert_eq!(advisor.planning_priority(100.0), PlanningPriority::Critical);
        assert_eq!(advisor.planning_priority(95.0), PlanningPriority::Critical);
        assert_eq!(advisor.planning_priority(94.9), PlanningPriority::High);
        assert_eq!(advisor.planning_priority(80.0), PlanningPriority::High);
        assert_eq!(advisor.planning_priority(60.0), PlanningPriority::Medium);
        assert_eq!(advisor.planning_priority(59.9), PlanningPriority::Low);
    }

    #[test]
    fn test_recommend_orders_up_to_top_of_green() {
        let classifier = BufferPenetrationClassifier::new();
        let advisor = ReplenishmentAdvisor::new();
        let zones = BufferZones::new(20.0, 50.0, 30.0);
        let net_flow = nfp(40.0);
        let penetration = classifier.classify(&net_flow, &zones).unwrap();

        let signal = advisor.recommend(&net_flow, &zones, &penetration, None);
        assert!(signal.should_order);
        assert_eq!(signal.order_quantity, 60.0);
    }

    #[test]
    fn test_recommend_rounds_up_to_moq() {
        let advisor = ReplenishmentAdvisor::new();
        let zones = BufferZones::new(20.0, 50.0, 30.0);
        let net_flow = nfp(40.0);
        let penetration = BufferPenetrationClassifier::new().classify(&net_flow, &zones).unwrap();
        let mut profile = BufferProfile::new("BP", VariabilityLevel::Low, LeadTimeCategory::Short);
        profile.moq = Some(25.0);

        let signal = advisor.recommend(&net_flow, &zones, &penetration, Some(&profile));
        assert_eq!(signal.order_quantity, 75.0);
    }

    #[test]
    fn test_recommend_no_order_above_top_of_yellow() {
        let advisor = ReplenishmentAdvisor::new();
        let zones = BufferZones::new(20.0, 50.0, 30.0);
        let net_flow = nfp(70.5);
        let penetration = BufferPenetrationClassifier::new().classify(&net_flow, &zones).unwrap();

        let signal = advisor.recommend(&net_flow, &zones, &penetration, None);
        assert!(!signal.should_order);
        assert_eq!(signal.order_quantity, 0.0);
    }

    #[test]
    fn test_recommend_never_orders_without_buffer() {
        let advisor = ReplenishmentAdvisor::new();
        let zones = BufferZones::zero();
        let net_flow = nfp(-20.0);
        let penetration = BufferPenetrationClassifier::new().classify(&net_flow, &zones).unwrap();

        let signal = advisor.recommend(&net_flow, &zones, &penetration, None);
        assert!(!signal.should_order);
        assert_eq!(signal.order_quantity, 0.0);
        assert_eq!(signal.planning_priority, PlanningPriority::Low);
    }
}
