// ==========================================
// 库存缓冲决策引擎 - 缓冲区计算引擎
// ==========================================
// 职责: 由 ADU/提前期/配置档计算红黄绿缓冲区; 人工调整缓冲区
// 输入: ItemSnapshot + Option<BufferProfile> + EngineConfig
// 输出: BufferZones / ZoneAdjustment
// 红线: ADU 或提前期为 0 时缓冲全部为 0，表示"不可计算"，不是零缓冲建议
// ==========================================

use crate::config::EngineConfig;
use crate::domain::buffer::{BufferZones, ZoneAdjustment};
use crate::domain::item::{BufferProfile, ItemSnapshot};
use crate::domain::types::{AdjustmentDirection, ZoneKind};
use crate::error::{EngineError, EngineResult};
use chrono::Utc;
use std::collections::BTreeSet;
use uuid::Uuid;

// ==========================================
// ZoneAdjustmentRequest - 人工调整请求
// ==========================================
#[derive(Debug, Clone)]
pub struct ZoneAdjustmentRequest {
    pub factor: f64,                   // 百分比
    pub direction: AdjustmentDirection,
    pub zones: BTreeSet<ZoneKind>,
    pub reason: String,
}

// ==========================================
// BufferZoneCalculator - 缓冲区计算引擎
// ==========================================
pub struct BufferZoneCalculator {
    // 无状态引擎，配置逐次传入
}

impl BufferZoneCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// 缓冲区是否可计算 (ADU 与提前期均为正有限数)
    pub fn is_computable(&self, item: &ItemSnapshot) -> bool {
        item.adu.is_finite() && item.adu > 0.0 && item.lead_time_days.is_finite() && item.lead_time_days > 0.0
    }

    /// 计算缓冲区
    ///
    /// - 红区 = adu × 提前期 × 提前期乘数 × 变异乘数，配置档 MOQ 为下限
    /// - 黄区 = adu × 提前期 × replenishment_time_factor
    /// - 绿区 = 黄区 × green_zone_factor × lot_size_factor
    ///
    /// 乘数来源:
    /// - 有配置档: 配置档的提前期类别与变异等级查配置
    /// - 无配置档: 按提前期天数分段; 物料自身 variability_factor 作为变异乘数 (≤0 时取 1)
    ///
    /// # 错误
    /// - 配置未通过校验 (负因子、分段阈值非单调) → Configuration
    pub fn compute_buffer_zones(
        &self,
        item: &ItemSnapshot,
        profile: Option<&BufferProfile>,
        config: &EngineConfig,
    ) -> EngineResult<BufferZones> {
        config.validate()?;

        if !self.is_computable(item) {
            tracing::debug!(
                sku = %item.sku,
                adu = item.adu,
                lead_time_days = item.lead_time_days,
                "缓冲区不可计算，返回全零"
            );
            return Ok(BufferZones::zero());
        }

        let (lead_time_multiplier, variability_multiplier) = match profile {
            Some(p) => (
                config.lead_time_multiplier(p.lead_time_factor),
                config.variability_multiplier(p.variability_factor),
            ),
            None => {
                let band = config.lead_time_band(item.lead_time_days);
                let variability = if item.variability_factor.is_finite() && item.variability_factor > 0.0 {
                    item.variability_factor
                } else {
                    1.0
                };
                (config.lead_time_multiplier(band), variability)
            }
        };

        let mut red = item.adu * item.lead_time_days * lead_time_multiplier * variability_multiplier;
        if let Some(moq) = profile.and_then(|p| p.effective_moq()) {
            red = red.max(moq);
        }

        let yellow = item.adu * item.lead_time_days * config.replenishment_time_factor;

        let lot_size_factor = profile
            .and_then(|p| p.lot_size_factor)
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or(1.0);
        let green = yellow * config.green_zone_factor * lot_size_factor;

        Ok(BufferZones { red, yellow, green })
    }

    /// 人工调整缓冲区
    ///
    /// 仅被选中的区按 1 ± factor/100 缩放，未选中的区原值透传。
    ///
    /// # 错误
    /// - factor 非有限或为负
    /// - Down 方向 factor > 100 (会使缓冲区为负)
    /// - 未选中任何区
    pub fn adjust_zones(
        &self,
        current: &BufferZones,
        factor: f64,
        direction: AdjustmentDirection,
        zones_to_adjust: &BTreeSet<ZoneKind>,
    ) -> EngineResult<BufferZones> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(EngineError::validation(format!(
                "调整因子 {} 必须为非负有限数",
                factor
            )));
        }
        if direction == AdjustmentDirection::Down && factor > 100.0 {
            return Err(EngineError::validation(format!(
                "下调因子 {} 超过 100%",
                factor
            )));
        }
        if zones_to_adjust.is_empty() {
            return Err(EngineError::validation("未选择要调整的缓冲区"));
        }

        let multiplier = match direction {
            AdjustmentDirection::Up => 1.0 + factor / 100.0,
            AdjustmentDirection::Down => 1.0 - factor / 100.0,
        };

        let mut adjusted = *current;
        for zone in zones_to_adjust {
            match zone {
                ZoneKind::Red => adjusted.red = current.red * multiplier,
                ZoneKind::Yellow => adjusted.yellow = current.yellow * multiplier,
                ZoneKind::Green => adjusted.green = current.green * multiplier,
            }
        }
        Ok(adjusted)
    }

    /// 带原因的人工调整，生成调整日志记录
    ///
    /// 日志由调用方持久化 (ZoneAdjustmentRepository)。
    pub fn adjust_with_reason(
        &self,
        sku: &str,
        current: &BufferZones,
        request: &ZoneAdjustmentRequest,
    ) -> EngineResult<ZoneAdjustment> {
        if request.reason.trim().is_empty() {
            return Err(EngineError::validation("缓冲区调整必须提供原因"));
        }

        let after = self.adjust_zones(current, request.factor, request.direction, &request.zones)?;

        tracing::info!(
            sku = %sku,
            factor = request.factor,
            direction = %request.direction,
            zones = ?request.zones,
            reason = %request.reason,
            "缓冲区人工调整"
        );

        Ok(ZoneAdjustment {
            adjustment_id: Uuid::new_v4().to_string(),
            sku: sku.to_string(),
            before: *current,
            after,
            factor: request.factor,
            direction: request.direction,
            zones: request.zones.clone(),
            reason: request.reason.trim().to_string(),
            adjusted_at: Utc::now().naive_utc(),
        })
    }
}

impl Default for BufferZoneCalculator {
    fn default() -> Self {
        Self::new()
    }
}
