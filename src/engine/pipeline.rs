// ==========================================
// 库存缓冲决策引擎 - 缓冲状态流水线
// ==========================================
// 顺序: 缓冲区 → 净流量 → 穿透/越界 → 补货建议
// 批处理: 配置先整体校验; 各物料相互独立，单个失败不影响其他物料
// 汇总: BatchOutcome::health_summary
// ==========================================

use crate::config::EngineConfig;
use crate::domain::buffer::{BufferPenetration, BufferZones, NetFlowPosition, ReplenishmentSignal};
use crate::domain::item::{BufferProfile, ItemSnapshot};
use crate::domain::types::{BreachType, BufferStatus};
use crate::engine::buffer_zone::BufferZoneCalculator;
use crate::engine::net_flow::NetFlowPositionEngine;
use crate::engine::penetration::{BufferBreachDetector, BufferPenetrationClassifier, ReplenishmentAdvisor};
use crate::error::{EngineError, EngineResult};
use crate::repository::store::{ItemStore, ProfileStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

// ==========================================
// ItemBufferStatus - 单物料缓冲状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBufferStatus {
    pub sku: String,
    pub location_id: Option<String>,
    pub zones: BufferZones,
    pub buffer_computable: bool, // false 时缓冲全 0 为"不可计算"
    pub net_flow: NetFlowPosition,
    pub penetration: BufferPenetration,
    pub breach: Option<BreachType>,
    pub replenishment: ReplenishmentSignal,
}

/// 批处理失败项
#[derive(Debug)]
pub struct ItemFailure {
    pub record_key: String,
    pub error: EngineError,
}

/// 批处理结果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub statuses: Vec<ItemBufferStatus>,
    pub failures: Vec<ItemFailure>,
}

// 健康分权重: 绿 100, 黄 60, 红与蓝 0
const GREEN_HEALTH_WEIGHT: f64 = 100.0;
const YELLOW_HEALTH_WEIGHT: f64 = 60.0;

// ==========================================
// BufferHealthSummary - 组合层缓冲健康汇总
// ==========================================
// 只统计缓冲可计算的物料; 蓝 (超出绿区顶) 单独计数，不计入绿
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BufferHealthSummary {
    pub evaluated: usize,     // 参与统计的物料数
    pub not_computable: usize,
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
    pub blue: usize,
    pub health_score: f64,        // (绿×100 + 黄×60) / evaluated，无物料时 0
    pub average_penetration: f64, // 穿透百分比均值，无物料时 0
}

impl BatchOutcome {
    /// 汇总缓冲健康度
    pub fn health_summary(&self) -> BufferHealthSummary {
        let mut summary = BufferHealthSummary::default();
        let mut penetration_sum = 0.0;

        for status in &self.statuses {
            if !status.buffer_computable {
                summary.not_computable += 1;
                continue;
            }
            summary.evaluated += 1;
            penetration_sum += status.penetration.percent;

            if status.breach == Some(BreachType::AboveTog) {
                summary.blue += 1;
                continue;
            }
            match status.penetration.status {
                BufferStatus::Red => summary.red += 1,
                BufferStatus::Yellow => summary.yellow += 1,
                BufferStatus::Green => summary.green += 1,
            }
        }

        if summary.evaluated > 0 {
            let n = summary.evaluated as f64;
            summary.health_score =
                (summary.green as f64 * GREEN_HEALTH_WEIGHT + summary.yellow as f64 * YELLOW_HEALTH_WEIGHT) / n;
            summary.average_penetration = penetration_sum / n;
        }
        summary
    }
}

// ==========================================
// BufferStatusPipeline
// ==========================================
pub struct BufferStatusPipeline {
    buffer_calculator: BufferZoneCalculator,
    net_flow_engine: NetFlowPositionEngine,
    classifier: BufferPenetrationClassifier,
    breach_detector: BufferBreachDetector,
    advisor: ReplenishmentAdvisor,
}

impl BufferStatusPipeline {
    pub fn new() -> Self {
        Self {
            buffer_calculator: BufferZoneCalculator::new(),
            net_flow_engine: NetFlowPositionEngine::new(),
            classifier: BufferPenetrationClassifier::new(),
            breach_detector: BufferBreachDetector::new(),
            advisor: ReplenishmentAdvisor::new(),
        }
    }

    /// 单物料评估
    ///
    /// # 错误
    /// - 配置未通过校验 → Configuration
    /// - 净流量非有限数 → Validation
    pub fn evaluate(
        &self,
        item: &ItemSnapshot,
        profile: Option<&BufferProfile>,
        config: &EngineConfig,
    ) -> EngineResult<ItemBufferStatus> {
        let buffer_computable = self.buffer_calculator.is_computable(item);
        let zones = self.buffer_calculator.compute_buffer_zones(item, profile, config)?;
        let net_flow = self.net_flow_engine.compute_net_flow_position(item);
        let penetration = self.classifier.classify(&net_flow, &zones)?;
        let breach = self.breach_detector.detect(&net_flow, &zones)?;
        let replenishment = self.advisor.recommend(&net_flow, &zones, &penetration, profile);

        Ok(ItemBufferStatus {
            sku: item.sku.clone(),
            location_id: item.location_id.clone(),
            zones,
            buffer_computable,
            net_flow,
            penetration,
            breach,
            replenishment,
        })
    }

    /// 批量评估 (配置档由调用方预先解析)
    ///
    /// 配置非法时整体失败; 单物料失败记入 failures，输出顺序与输入一致。
    #[instrument(skip(self, items, config), fields(count = items.len()))]
    pub fn evaluate_batch(
        &self,
        items: &[(ItemSnapshot, Option<BufferProfile>)],
        config: &EngineConfig,
    ) -> EngineResult<BatchOutcome> {
        config.validate()?;

        let mut outcome = BatchOutcome::default();
        for (item, profile) in items {
            self.push_evaluation(&mut outcome, item, profile.as_ref(), config);
        }
        Ok(outcome)
    }

    /// 从记录存储加载全部物料并评估
    ///
    /// # 错误
    /// - 配置未通过校验 → Configuration，整体返回
    /// - 读取物料列表失败 → 整体返回错误
    /// - 单个物料引用了不存在的配置档 → Validation，记入 failures
    #[instrument(skip_all)]
    pub fn evaluate_store<I, P>(
        &self,
        item_store: &I,
        profile_store: &P,
        config: &EngineConfig,
    ) -> EngineResult<BatchOutcome>
    where
        I: ItemStore + ?Sized,
        P: ProfileStore + ?Sized,
    {
        config.validate()?;

        let items = item_store.list_items()?;
        let mut outcome = BatchOutcome::default();
        let mut profile_cache: HashMap<String, Option<BufferProfile>> = HashMap::new();

        for item in &items {
            match self.resolve_profile(item, profile_store, &mut profile_cache) {
                Ok(profile) => self.push_evaluation(&mut outcome, item, profile.as_ref(), config),
                Err(error) => record_failure(&mut outcome, item, error),
            }
        }

        tracing::info!(
            total = items.len(),
            evaluated = outcome.statuses.len(),
            failed = outcome.failures.len(),
            "缓冲状态批处理完成"
        );
        Ok(outcome)
    }

    fn push_evaluation(
        &self,
        outcome: &mut BatchOutcome,
        item: &ItemSnapshot,
        profile: Option<&BufferProfile>,
        config: &EngineConfig,
    ) {
        match self.evaluate(item, profile, config) {
            Ok(status) => outcome.statuses.push(status),
            Err(error) => record_failure(outcome, item, error),
        }
    }

    fn resolve_profile<P>(
        &self,
        item: &ItemSnapshot,
        profile_store: &P,
        cache: &mut HashMap<String, Option<BufferProfile>>,
    ) -> EngineResult<Option<BufferProfile>>
    where
        P: ProfileStore + ?Sized,
    {
        let profile_id = match item.buffer_profile_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let profile = match cache.get(profile_id) {
            Some(cached) => cached.clone(),
            None => {
                let loaded = profile_store.get_profile(profile_id)?;
                cache.insert(profile_id.to_string(), loaded.clone());
                loaded
            }
        };

        profile.map(Some).ok_or_else(|| {
            EngineError::validation(format!(
                "物料 {} 引用的缓冲配置档 {} 不存在",
                item.record_key(),
                profile_id
            ))
        })
    }
}

fn record_failure(outcome: &mut BatchOutcome, item: &ItemSnapshot, error: EngineError) {
    tracing::warn!(record_key = %item.record_key(), error = %error, "物料评估失败");
    outcome.failures.push(ItemFailure {
        record_key: item.record_key(),
        error,
    });
}

impl Default for BufferStatusPipeline {
    fn default() -> Self {
        Self::new()
    }
}
