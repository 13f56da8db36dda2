// ==========================================
// 库存缓冲决策引擎 - 引擎配置
// ==========================================
// 职责: 全部阈值/因子的显式配置，逐次调用传入
// 红线: 无进程级可变全局配置; 非法配置返回 Configuration 错误
// ==========================================

use crate::domain::types::{DecouplingType, LeadTimeCategory, VariabilityLevel};
use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 基准占比之和的容差
pub const BENCHMARK_SUM_TOLERANCE: f64 = 1e-6;

// ==========================================
// DecouplingBenchmarks - 解耦点类型基准占比
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecouplingBenchmarks(pub BTreeMap<DecouplingType, f64>);

impl Default for DecouplingBenchmarks {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert(DecouplingType::Strategic, 0.20);
        map.insert(DecouplingType::CustomerOrder, 0.35);
        map.insert(DecouplingType::StockPoint, 0.35);
        map.insert(DecouplingType::Intermediate, 0.10);
        Self(map)
    }
}

impl DecouplingBenchmarks {
    pub fn get(&self, t: DecouplingType) -> Option<f64> {
        self.0.get(&t).copied()
    }

    /// 校验: 四类齐全、每项 ∈ [0,1]、合计 ≈ 1
    pub fn validate(&self) -> EngineResult<()> {
        let mut sum = 0.0;
        for t in DecouplingType::ALL {
            let v = self
                .get(t)
                .ok_or_else(|| EngineError::configuration(format!("decoupling_benchmarks 缺少类型 {}", t)))?;
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(EngineError::configuration(format!(
                    "decoupling_benchmarks[{}]={} 不在 [0,1] 内",
                    t, v
                )));
            }
            sum += v;
        }
        if (sum - 1.0).abs() > BENCHMARK_SUM_TOLERANCE {
            return Err(EngineError::configuration(format!(
                "decoupling_benchmarks 合计 {} ≠ 1",
                sum
            )));
        }
        Ok(())
    }
}

// ==========================================
// ClassificationWeights - 分类综合得分权重
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationWeights {
    pub lead_time: f64,
    pub variability: f64,
    pub criticality: f64,
    pub importance: f64, // 外部重要度，仅在提供时计入
}

impl Default for ClassificationWeights {
    fn default() -> Self {
        Self {
            lead_time: 1.0,
            variability: 1.0,
            criticality: 1.0,
            importance: 1.0,
        }
    }
}

// ==========================================
// EngineConfig - 引擎配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // ===== 缓冲区: 提前期分段 =====
    pub short_lead_time_threshold: f64,  // 天，≤ 即短
    pub medium_lead_time_threshold: f64, // 天，≤ 即中
    pub short_lead_time_factor: f64,
    pub medium_lead_time_factor: f64,
    pub long_lead_time_factor: f64,

    // ===== 缓冲区: 变异乘数 (配置档提供等级时使用) =====
    pub low_variability_factor: f64,
    pub medium_variability_factor: f64,
    pub high_variability_factor: f64,

    // ===== 缓冲区: 黄/绿 =====
    pub replenishment_time_factor: f64,
    pub green_zone_factor: f64,

    // ===== SKU 分类阈值 =====
    pub classification_medium_lead_time_days: f64, // > 即中
    pub classification_long_lead_time_days: f64,   // > 即长
    pub classification_medium_variability: f64,    // > 即中
    pub classification_high_variability: f64,      // > 即高
    pub classification_weights: ClassificationWeights,

    // ===== 解耦点 =====
    pub decoupling_benchmarks: DecouplingBenchmarks,
    pub decoupling_threshold: f64,          // 自动指定阈值 (0,1]
    pub review_threshold: f64,              // 人工复核阈值
    pub demand_variability_threshold: f64,  // 高需求变异阈值 (0,1]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            short_lead_time_threshold: 15.0,
            medium_lead_time_threshold: 30.0,
            short_lead_time_factor: 0.7,
            medium_lead_time_factor: 1.0,
            long_lead_time_factor: 1.3,
            low_variability_factor: 0.3,
            medium_variability_factor: 0.5,
            high_variability_factor: 0.8,
            replenishment_time_factor: 1.0,
            green_zone_factor: 0.5,
            classification_medium_lead_time_days: 15.0,
            classification_long_lead_time_days: 30.0,
            classification_medium_variability: 0.5,
            classification_high_variability: 1.0,
            classification_weights: ClassificationWeights::default(),
            decoupling_benchmarks: DecouplingBenchmarks::default(),
            decoupling_threshold: 0.75,
            review_threshold: 0.50,
            demand_variability_threshold: 0.6,
        }
    }
}

fn check_non_negative(name: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::configuration(format!(
            "{}={} 必须为非负有限数",
            name, value
        )));
    }
    Ok(())
}

fn check_unit_interval(name: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(EngineError::configuration(format!(
            "{}={} 必须在 (0,1] 内",
            name, value
        )));
    }
    Ok(())
}

impl EngineConfig {
    /// 校验全部配置项
    pub fn validate(&self) -> EngineResult<()> {
        for (name, value) in [
            ("short_lead_time_threshold", self.short_lead_time_threshold),
            ("medium_lead_time_threshold", self.medium_lead_time_threshold),
            ("short_lead_time_factor", self.short_lead_time_factor),
            ("medium_lead_time_factor", self.medium_lead_time_factor),
            ("long_lead_time_factor", self.long_lead_time_factor),
            ("low_variability_factor", self.low_variability_factor),
            ("medium_variability_factor", self.medium_variability_factor),
            ("high_variability_factor", self.high_variability_factor),
            ("replenishment_time_factor", self.replenishment_time_factor),
            ("green_zone_factor", self.green_zone_factor),
            ("classification_medium_lead_time_days", self.classification_medium_lead_time_days),
            ("classification_long_lead_time_days", self.classification_long_lead_time_days),
            ("classification_medium_variability", self.classification_medium_variability),
            ("classification_high_variability", self.classification_high_variability),
            ("classification_weights.lead_time", self.classification_weights.lead_time),
            ("classification_weights.variability", self.classification_weights.variability),
            ("classification_weights.criticality", self.classification_weights.criticality),
            ("classification_weights.importance", self.classification_weights.importance),
        ] {
            check_non_negative(name, value)?;
        }

        // 阈值单调
        if self.short_lead_time_threshold >= self.medium_lead_time_threshold {
            return Err(EngineError::configuration(format!(
                "short_lead_time_threshold({}) 必须小于 medium_lead_time_threshold({})",
                self.short_lead_time_threshold, self.medium_lead_time_threshold
            )));
        }
        if self.classification_medium_lead_time_days >= self.classification_long_lead_time_days {
            return Err(EngineError::configuration(format!(
                "classification_medium_lead_time_days({}) 必须小于 classification_long_lead_time_days({})",
                self.classification_medium_lead_time_days, self.classification_long_lead_time_days
            )));
        }
        if self.classification_medium_variability >= self.classification_high_variability {
            return Err(EngineError::configuration(format!(
                "classification_medium_variability({}) 必须小于 classification_high_variability({})",
                self.classification_medium_variability, self.classification_high_variability
            )));
        }

        let w = &self.classification_weights;
        if w.lead_time + w.variability + w.criticality <= 0.0 {
            return Err(EngineError::configuration(
                "classification_weights 中分类轴权重之和必须大于 0",
            ));
        }

        self.decoupling_benchmarks.validate()?;

        check_unit_interval("decoupling_threshold", self.decoupling_threshold)?;
        check_unit_interval("demand_variability_threshold", self.demand_variability_threshold)?;
        check_non_negative("review_threshold", self.review_threshold)?;
        if self.review_threshold > self.decoupling_threshold {
            return Err(EngineError::configuration(format!(
                "review_threshold({}) 不能大于 decoupling_threshold({})",
                self.review_threshold, self.decoupling_threshold
            )));
        }

        Ok(())
    }

    /// 按提前期天数查找提前期类别 (缓冲区分段，边界含在较短一侧)
    pub fn lead_time_band(&self, lead_time_days: f64) -> LeadTimeCategory {
        if lead_time_days <= self.short_lead_time_threshold {
            LeadTimeCategory::Short
        } else if lead_time_days <= self.medium_lead_time_threshold {
            LeadTimeCategory::Medium
        } else {
            LeadTimeCategory::Long
        }
    }

    /// 提前期类别 → 红区乘数
    pub fn lead_time_multiplier(&self, category: LeadTimeCategory) -> f64 {
        match category {
            LeadTimeCategory::Short => self.short_lead_time_factor,
            LeadTimeCategory::Medium => self.medium_lead_time_factor,
            LeadTimeCategory::Long => self.long_lead_time_factor,
        }
    }

    /// 变异等级 → 红区乘数
    pub fn variability_multiplier(&self, level: VariabilityLevel) -> f64 {
        match level {
            VariabilityLevel::Low => self.low_variability_factor,
            VariabilityLevel::Medium => self.medium_variability_factor,
            VariabilityLevel::High => self.high_variability_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_benchmarks_must_sum_to_one() {
        let mut config = EngineConfig::default();
        config
            .decoupling_benchmarks
            .0
            .insert(DecouplingType::Strategic, 0.30);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
    }

    #[test]
    fn test_benchmarks_missing_type() {
        let mut config = EngineConfig::default();
        config.decoupling_benchmarks.0.remove(&DecouplingType::Intermediate);
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_non_monotonic_thresholds_rejected() {
        let mut config = EngineConfig::default();
        config.short_lead_time_threshold = 30.0;
        config.medium_lead_time_threshold = 30.0;
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));

        let mut config = EngineConfig::default();
        config.classification_medium_variability = 1.5;
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_negative_factor_rejected() {
        let mut config = EngineConfig::default();
        config.green_zone_factor = -0.1;
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));

        let mut config = EngineConfig::default();
        config.replenishment_time_factor = f64::NAN;
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_decoupling_thresholds_range() {
        let mut config = EngineConfig::default();
        config.decoupling_threshold = 1.2;
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));

        let mut config = EngineConfig::default();
        config.demand_variability_threshold = 0.0;
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));

        let mut config = EngineConfig::default();
        config.review_threshold = 0.9;
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_lead_time_band_boundaries() {
        let config = EngineConfig::default();
        assert_eq!(config.lead_time_band(15.0), LeadTimeCategory::Short);
        assert_eq!(config.lead_time_band(15.5), LeadTimeCategory::Medium);
        assert_eq!(config.lead_time_band(30.0), LeadTimeCategory::Medium);
        assert_eq!(config.lead_time_band(31.0), LeadTimeCategory::Long);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"green_zone_factor":0.7,"decoupling_threshold":0.8}"#).unwrap();
        assert_eq!(config.green_zone_factor, 0.7);
        assert_eq!(config.decoupling_threshold, 0.8);
        assert_eq!(config.short_lead_time_factor, 0.7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_benchmarks_json_shape() {
        let json = serde_json::to_value(DecouplingBenchmarks::default()).unwrap();
        assert_eq!(json["customer_order"], 0.35);
        assert_eq!(json["intermediate"], 0.10);
    }
}
