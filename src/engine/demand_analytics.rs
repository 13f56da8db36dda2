// ==========================================
// 库存缓冲决策引擎 - 需求分析
// ==========================================
// 职责: 由需求历史推导 ADU 与变异系数，供构造 ItemSnapshot
//       动态调整因子 (DAF)、订单尖峰阈值、解耦提前期
// ==========================================

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// DynamicAdjustmentFactors - 动态调整因子
// ==========================================
// 计划调整: 季节性 × 趋势 × 市场策略，1.0 表示不调整
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicAdjustmentFactors {
    pub seasonality: f64,
    pub trend: f64,
    pub market_strategy: f64,
}

impl DynamicAdjustmentFactors {
    /// 合成乘数
    pub fn combined(&self) -> f64 {
        self.seasonality * self.trend * self.market_strategy
    }
}

impl Default for DynamicAdjustmentFactors {
    fn default() -> Self {
        Self {
            seasonality: 1.0,
            trend: 1.0,
            market_strategy: 1.0,
        }
    }
}

fn check_non_negative(name: &str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::validation(format!(
            "{} = {} 必须为非负有限数",
            name, value
        )))
    }
}

pub struct DemandAnalytics {}

impl DemandAnalytics {
    pub fn new() -> Self {
        Self {}
    }

    /// 日均用量 = Σ需求 / 天数
    ///
    /// 天数 ≤ 0 或需求为空时返回 0。非有限值不计入。
    pub fn average_daily_usage(&self, demand: &[f64], days: f64) -> f64 {
        if demand.is_empty() || !days.is_finite() || days <= 0.0 {
            return 0.0;
        }
        let total: f64 = demand.iter().filter(|d| d.is_finite()).sum();
        total / days
    }

    /// 变异系数 = 总体标准差 / 均值
    ///
    /// 需求为空或均值为 0 时返回 0。
    pub fn variability_factor(&self, demand: &[f64]) -> f64 {
        let values: Vec<f64> = demand.iter().copied().filter(|d| d.is_finite()).collect();
        if values.is_empty() {
            return 0.0;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        if mean == 0.0 {
            return 0.0;
        }

        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        (variance.sqrt() / mean).abs()
    }

    /// 对基准量 (ADU 或缓冲区) 施加动态调整因子
    ///
    /// # 错误
    /// - 基准量或任一因子为负或非有限 → Validation
    pub fn apply_dynamic_adjustment(&self, base: f64, factors: &DynamicAdjustmentFactors) -> EngineResult<f64> {
        check_non_negative("base", base)?;
        check_non_negative("seasonality", factors.seasonality)?;
        check_non_negative("trend", factors.trend)?;
        check_non_negative("market_strategy", factors.market_strategy)?;
        Ok(base * factors.combined())
    }

    /// 订单尖峰阈值 = ADU × 尖峰因子
    ///
    /// 单日合格需求超过该阈值的订单视为尖峰，计入合格需求。
    pub fn order_spike_threshold(&self, adu: f64, spike_factor: f64) -> EngineResult<f64> {
        check_non_negative("adu", adu)?;
        check_non_negative("spike_factor", spike_factor)?;
        Ok(adu * spike_factor)
    }

    /// 是否为尖峰订单 (严格大于阈值)
    pub fn is_order_spike(&self, quantity: f64, adu: f64, spike_factor: f64) -> EngineResult<bool> {
        let threshold = self.order_spike_threshold(adu, spike_factor)?;
        Ok(quantity.is_finite() && quantity > threshold)
    }

    /// 解耦提前期 = 解耦点之间最长未受保护路径上各段提前期之和
    ///
    /// 空路径返回 0。
    pub fn decoupled_lead_time(&self, segment_lead_times: &[f64]) -> EngineResult<f64> {
        let mut total = 0.0;
        for (index, days) in segment_lead_times.iter().enumerate() {
            check_non_negative(&format!("segment_lead_times[{}]", index), *days)?;
            total += days;
        }
        Ok(total)
    }

    /// 提前期压缩率 (%) = (累计提前期 - 解耦提前期) / 累计提前期 × 100
    ///
    /// 累计提前期为 0 时返回 0。
    pub fn lead_time_compression(&self, cumulative_days: f64, decoupled_days: f64) -> EngineResult<f64> {
        check_non_negative("cumulative_days", cumulative_days)?;
        check_non_negative("decoupled_days", decoupled_days)?;
        if cumulative_days == 0.0 {
            return Ok(0.0);
        }
        Ok((cumulative_days - decoupled_days) / cumulative_days * 100.0)
    }
}

impl Default for DemandAnalytics {
    fn default() -> Self {
        Self::new()
    }
}
