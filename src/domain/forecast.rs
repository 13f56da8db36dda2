// ==========================================
// 库存缓冲决策引擎 - 预测模型选择领域模型
// ==========================================
// 说明: 只做模型"选择"，不做模型"拟合"
// ==========================================

use serde::{Deserialize, Serialize};

/// 模型参数 (name, value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameter {
    pub name: String,
    pub value: f64,
}

impl ModelParameter {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// 候选预测序列
///
/// `forecast_series` 中的 NaN 视为缺失点，按点剔除而不是整体拒绝。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCandidate {
    pub model_id: String,
    pub model_name: String,
    pub forecast_series: Vec<f64>,
    #[serde(default)]
    pub parameters: Option<Vec<ModelParameter>>,
}

impl ForecastCandidate {
    pub fn new(model_id: impl Into<String>, model_name: impl Into<String>, forecast_series: Vec<f64>) -> Self {
        Self {
            model_id: model_id.into(),
            model_name: model_name.into(),
            forecast_series,
            parameters: None,
        }
    }
}

/// 精度指标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub mape: f64,
    pub mae: f64,
    pub rmse: f64,
    pub smape: f64,          // 仅展示，不参与选择
    pub sample_count: usize, // 参与 MAE/RMSE 的点数
}

/// 最优模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFitResult {
    pub model_id: String,
    pub model_name: String,
    pub metrics: ForecastMetrics,
    #[serde(default)]
    pub optimized_parameters: Option<Vec<ModelParameter>>,
}

/// 单个候选的评估结果 (metrics 为 None 表示不可评分)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEvaluation {
    pub model_id: String,
    pub model_name: String,
    pub metrics: Option<ForecastMetrics>,
    pub is_best: bool,
}

/// 参数优化结果 (按 model_id 归属)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedParameters {
    pub model_id: String,
    pub parameters: Vec<ModelParameter>,
}
