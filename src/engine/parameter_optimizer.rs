// ==========================================
// 库存缓冲决策引擎 - 预测模型参数建议
// ==========================================
// 职责: 由历史实际值给出各模型的参数建议 (启发式，不做拟合)
// 扩展: 通过 ParameterOptimizer trait 替换策略
// ==========================================

use crate::domain::forecast::{ModelParameter, OptimizedParameters};

/// 模型标识
pub mod model_ids {
    pub const MOVING_AVERAGE: &str = "moving-avg";
    pub const EXPONENTIAL_SMOOTHING: &str = "exp-smoothing";
    pub const ARIMA: &str = "arima";
}

const MAX_MOVING_AVERAGE_WINDOW: f64 = 12.0;
const SEASONAL_LAG: usize = 12;
const SEASONALITY_THRESHOLD: f64 = 0.3;
const MIN_VOLATILITY: f64 = 0.1;
const MAX_VOLATILITY: f64 = 0.9;
const MAX_ALPHA: f64 = 0.8;
const STATIONARY_MEAN_DIFF: f64 = 0.1;

// ==========================================
// ParameterOptimizer - 参数建议策略
// ==========================================
pub trait ParameterOptimizer: Send + Sync {
    /// 根据实际值序列给出参数建议，序列为空时返回空列表
    fn optimize(&self, actuals: &[f64]) -> Vec<OptimizedParameters>;
}

// ==========================================
// HeuristicParameterOptimizer - 启发式参数建议
// ==========================================
// - 移动平均: 窗口 = min(ceil(sqrt(n)), 12)
// - 指数平滑: alpha = min(0.8, 波动率∈[0.1,0.9]); beta = 0.1; gamma = 季节性 ? 0.3 : 0.1
// - ARIMA: p = 1, q = 1; 一阶差分均值绝对值 < 0.1 时 d = 0，否则 d = 1
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicParameterOptimizer;

impl HeuristicParameterOptimizer {
    pub fn new() -> Self {
        Self
    }

    pub fn moving_average_window(&self, n: usize) -> f64 {
        (n as f64).sqrt().ceil().min(MAX_MOVING_AVERAGE_WINDOW)
    }

    /// 相邻变化率的均方根，截断到 [0.1, 0.9]
    ///
    /// 前值为 0 的点无法计算变化率，跳过。
    pub fn volatility(&self, data: &[f64]) -> f64 {
        let returns: Vec<f64> = data
            .windows(2)
            .filter(|w| w[0] != 0.0)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect();
        if returns.is_empty() {
            return MIN_VOLATILITY;
        }

        let mean_square = returns.iter().map(|r| r * r).sum::<f64>() / returns.len() as f64;
        mean_square.sqrt().clamp(MIN_VOLATILITY, MAX_VOLATILITY)
    }

    /// 12 期滞后自相关是否超过阈值
    pub fn has_seasonality(&self, data: &[f64]) -> bool {
        if data.len() < SEASONAL_LAG * 2 {
            return false;
        }

        let mean = data.iter().sum::<f64>() / data.len() as f64;
        let centered: Vec<f64> = data.iter().map(|x| x - mean).collect();
        let variance: f64 = centered.iter().map(|x| x * x).sum();
        if variance <= 0.0 {
            return false;
        }

        let lagged: f64 = centered
            .iter()
            .zip(centered.iter().skip(SEASONAL_LAG))
            .map(|(a, b)| a * b)
            .sum();
        lagged / variance > SEASONALITY_THRESHOLD
    }

    pub fn differencing_order(&self, data: &[f64]) -> f64 {
        if data.len() < 2 {
            return 0.0;
        }
        let diffs: f64 = data.windows(2).map(|w| w[1] - w[0]).sum();
        let mean_diff = diffs / (data.len() - 1) as f64;
        if mean_diff.abs() < STATIONARY_MEAN_DIFF {
            0.0
        } else {
            1.0
        }
    }
}

impl ParameterOptimizer for HeuristicParameterOptimizer {
    fn optimize(&self, actuals: &[f64]) -> Vec<OptimizedParameters> {
        if actuals.is_empty() {
            return Vec::new();
        }

        let alpha = self.volatility(actuals).min(MAX_ALPHA);
        let gamma = if self.has_seasonality(actuals) { 0.3 } else { 0.1 };

        vec![
            OptimizedParameters {
                model_id: model_ids::MOVING_AVERAGE.to_string(),
                parameters: vec![ModelParameter::new(
                    "window_size",
                    self.moving_average_window(actuals.len()),
                )],
            },
            OptimizedParameters {
                model_id: model_ids::EXPONENTIAL_SMOOTHING.to_string(),
                parameters: vec![
                    ModelParameter::new("alpha", alpha),
                    ModelParameter::new("beta", 0.1),
                    ModelParameter::new("gamma", gamma),
                ],
            },
            OptimizedParameters {
                model_id: model_ids::ARIMA.to_string(),
                parameters: vec![
                    ModelParameter::new("p", 1.0),
                    ModelParameter::new("d", self.differencing_order(actuals)),
                    ModelParameter::new("q", 1.0),
                ],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(result: &[OptimizedParameters], model_id: &str, name: &str) -> f64 {
        result
            .iter()
            .find(|p| p.model_id == model_id)
            .and_then(|p| p.parameters.iter().find(|x| x.name == name))
            .map(|x| x.value)
            .unwrap()
    }

    #[test]
    fn test_empty_series_yields_nothing() {
        assert!(HeuristicParameterOptimizer::new().optimize(&[]).is_empty());
    }

    #[test]
    fn test_moving_average_window_capped() {
        let optimizer = HeuristicParameterOptimizer::new();
        assert_eq!(optimizer.moving_average_window(4), 2.0);
        assert_eq!(optimizer.moving_average_window(10), 4.0);
        assert_eq!(optimizer.moving_average_window(500), 12.0);
    }

    #[test]
    fn test_flat_series_is_stationary_low_volatility() {
        let optimizer = HeuristicParameterOptimizer::new();
        let flat = vec![50.0; 16];
        let result = optimizer.optimize(&flat);

        assert_eq!(param(&result, model_ids::EXPONENTIAL_SMOOTHING, "alpha"), 0.1);
        assert_eq!(param(&result, model_ids::EXPONENTIAL_SMOOTHING, "beta"), 0.1);
        assert_eq!(param(&result, model_ids::EXPONENTIAL_SMOOTHING, "gamma"), 0.1);
        assert_eq!(param(&result, model_ids::ARIMA, "d"), 0.0);
        assert_eq!(param(&result, model_ids::MOVING_AVERAGE, "window_size"), 4.0);
    }

    #[test]
    fn test_volatile_series_alpha_capped() {
        let optimizer = HeuristicParameterOptimizer::new();
        // 每期翻倍/减半，变化率远大于 0.9
        let series = [10.0, 40.0, 10.0, 40.0, 10.0];
        assert_eq!(optimizer.volatility(&series), 0.9);
        let result = optimizer.optimize(&series);
        assert_eq!(param(&result, model_ids::EXPONENTIAL_SMOOTHING, "alpha"), 0.8);
    }

    #[test]
    fn test_zero_previous_values_skipped() {
        let optimizer = HeuristicParameterOptimizer::new();
        assert_eq!(optimizer.volatility(&[0.0, 5.0, 0.0]), 0.9);
        assert_eq!(optimizer.volatility(&[0.0, 0.0]), 0.1);
    }

    #[test]
    fn test_trending_series_differenced() {
        let optimizer = HeuristicParameterOptimizer::new();
        let trend: Vec<f64> = (0..10).map(|i| 100.0 + 5.0 * i as f64).collect();
        assert_eq!(optimizer.differencing_order(&trend), 1.0);
    }

    #[test]
    fn test_seasonal_series_detected() {
        let optimizer = HeuristicParameterOptimizer::new();
        let pattern = [10.0, 12.0, 15.0, 20.0, 30.0, 45.0, 50.0, 42.0, 30.0, 20.0, 14.0, 11.0];
        let series: Vec<f64> = pattern.iter().chain(pattern.iter()).chain(pattern.iter()).copied().collect();
        assert!(optimizer.has_seasonality(&series));

        let result = optimizer.optimize(&series);
        assert_eq!(param(&result, model_ids::EXPONENTIAL_SMOOTHING, "gamma"), 0.3);
    }
}
