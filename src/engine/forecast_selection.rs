// ==========================================
// 库存缓冲决策引擎 - 预测模型选择引擎
// ==========================================
// 职责: 用实际值评估候选预测序列，选出最优模型并附参数建议
// 输入: 实际值序列 (允许缺失) + 候选预测
// 输出: ModelFitResult / ModelEvaluation 列表
// ==========================================
// 选择规则:
// 1. MAPE 最小
// 2. MAPE 相同 → RMSE 最小
// 3. 仍相同 → 候选列表中靠前者
// ==========================================
// 可评分点: 实际值存在且有限，预测值存在且有限
// MAPE 只统计实际值 ≠ 0 的可评分点
// ==========================================

use crate::domain::forecast::{ForecastCandidate, ForecastMetrics, ModelEvaluation, ModelFitResult};
use crate::engine::parameter_optimizer::{HeuristicParameterOptimizer, ParameterOptimizer};
use crate::error::{EngineError, EngineResult};
use std::cmp::Ordering;
use tracing::instrument;

// ==========================================
// 指标计算
// ==========================================

/// 计算单个候选的精度指标
///
/// # 返回
/// - None: 无可评分点，或可评分点的实际值全为 0 (MAPE 无定义)
pub fn compute_metrics(actuals: &[Option<f64>], forecast: &[f64]) -> Option<ForecastMetrics> {
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut count = 0usize;

    let mut ape_sum = 0.0;
    let mut ape_count = 0usize;

    let mut sape_sum = 0.0;
    let mut sape_count = 0usize;

    for (actual, predicted) in actuals.iter().zip(forecast.iter()) {
        let actual = match actual {
            Some(a) if a.is_finite() => *a,
            _ => continue,
        };
        if !predicted.is_finite() {
            continue;
        }

        let error = actual - predicted;
        abs_sum += error.abs();
        sq_sum += error * error;
        count += 1;

        if actual != 0.0 {
            ape_sum += (error / actual).abs();
            ape_count += 1;
        }

        let denominator = actual.abs() + predicted.abs();
        if denominator > 0.0 {
            sape_sum += error.abs() / denominator;
            sape_count += 1;
        }
    }

    if count == 0 || ape_count == 0 {
        return None;
    }

    Some(ForecastMetrics {
        mape: ape_sum / ape_count as f64 * 100.0,
        mae: abs_sum / count as f64,
        rmse: (sq_sum / count as f64).sqrt(),
        smape: if sape_count > 0 {
            sape_sum / sape_count as f64 * 100.0
        } else {
            0.0
        },
        sample_count: count,
    })
}

/// 比较两组指标 (MAPE 优先，其次 RMSE)
fn compare_metrics(a: &ForecastMetrics, b: &ForecastMetrics) -> Ordering {
    a.mape
        .partial_cmp(&b.mape)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.rmse.partial_cmp(&b.rmse).unwrap_or(Ordering::Equal))
}

// ==========================================
// ForecastModelSelector - 预测模型选择引擎
// ==========================================
pub struct ForecastModelSelector {
    optimizer: Box<dyn ParameterOptimizer>,
}

impl ForecastModelSelector {
    /// 默认使用启发式参数建议
    pub fn new() -> Self {
        Self::with_optimizer(Box::new(HeuristicParameterOptimizer::new()))
    }

    pub fn with_optimizer(optimizer: Box<dyn ParameterOptimizer>) -> Self {
        Self { optimizer }
    }

    /// 评估全部候选，标记最优者
    ///
    /// # 错误
    /// - 候选列表为空 → Validation
    /// - 实际值全部缺失 / 无任何可评分候选 → InsufficientData
    #[instrument(skip(self, actuals, candidates), fields(candidates = candidates.len(), points = actuals.len()))]
    pub fn evaluate_candidates(
        &self,
        actuals: &[Option<f64>],
        candidates: &[ForecastCandidate],
    ) -> EngineResult<Vec<ModelEvaluation>> {
        if candidates.is_empty() {
            return Err(EngineError::validation("候选预测列表为空"));
        }
        if !actuals.iter().any(|a| matches!(a, Some(v) if v.is_finite())) {
            return Err(EngineError::insufficient_data("实际值全部缺失"));
        }

        let metrics: Vec<Option<ForecastMetrics>> = candidates
            .iter()
            .map(|c| compute_metrics(actuals, &c.forecast_series))
            .collect();

        let best = best_index(&metrics).ok_or_else(|| {
            EngineError::insufficient_data("没有候选与实际值存在可评分的重叠点")
        })?;

        for (candidate, m) in candidates.iter().zip(metrics.iter()) {
            if m.is_none() {
                tracing::debug!(model_id = %candidate.model_id, "候选不可评分");
            }
        }

        Ok(candidates
            .iter()
            .zip(metrics)
            .enumerate()
            .map(|(i, (c, m))| ModelEvaluation {
                model_id: c.model_id.clone(),
                model_name: c.model_name.clone(),
                metrics: m,
                is_best: i == best,
            })
            .collect())
    }

    /// 选出最优模型
    ///
    /// optimized_parameters 优先取参数建议中与最优 model_id 对应的一组，
    /// 否则取候选自带参数。
    pub fn select_best_fit(
        &self,
        actuals: &[Option<f64>],
        candidates: &[ForecastCandidate],
    ) -> EngineResult<ModelFitResult> {
        let evaluations = self.evaluate_candidates(actuals, candidates)?;

        let (index, evaluation) = evaluations
            .iter()
            .enumerate()
            .find(|(_, e)| e.is_best)
            .ok_or_else(|| EngineError::insufficient_data("无最优候选"))?;
        let metrics = evaluation
            .metrics
            .ok_or_else(|| EngineError::insufficient_data("最优候选缺少指标"))?;
        let candidate = &candidates[index];

        let observed: Vec<f64> = actuals
            .iter()
            .filter_map(|a| a.filter(|v| v.is_finite()))
            .collect();
        let optimized_parameters = self
            .optimizer
            .optimize(&observed)
            .into_iter()
            .find(|p| p.model_id == candidate.model_id)
            .map(|p| p.parameters)
            .or_else(|| candidate.parameters.clone());

        tracing::info!(
            model_id = %candidate.model_id,
            mape = metrics.mape,
            rmse = metrics.rmse,
            "选出最优预测模型"
        );

        Ok(ModelFitResult {
            model_id: candidate.model_id.clone(),
            model_name: candidate.model_name.clone(),
            metrics,
            optimized_parameters,
        })
    }
}

impl Default for ForecastModelSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// 最优候选下标; 相同指标取靠前者
fn best_index(metrics: &[Option<ForecastMetrics>]) -> Option<usize> {
    let mut best: Option<(usize, &ForecastMetrics)> = None;
    for (i, m) in metrics.iter().enumerate() {
        let Some(m) = m else { continue };
        match best {
            Some((_, current)) if compare_metrics(m, current) != Ordering::Less => {}
            _ => best = Some((i, m)),
        }
    }
    best.map(|(i, _)| i)
}
