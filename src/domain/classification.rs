// ==========================================
// 库存缓冲决策引擎 - SKU 分类领域模型
// ==========================================
// 红线: 分类历史只追加，不原地修改
// ==========================================

use crate::domain::types::{Criticality, LeadTimeCategory, VariabilityLevel};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Classification - 分类结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub lead_time_category: LeadTimeCategory,
    pub variability_level: VariabilityLevel,
    pub criticality: Criticality,
    pub score: f64, // [0, 100]
}

// ==========================================
// ClassificationRecord - 分类历史记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub record_id: String,
    pub sku: String,
    pub classification: Classification,
    pub classified_at: NaiveDateTime,
}

impl ClassificationRecord {
    pub fn new(sku: impl Into<String>, classification: Classification, classified_at: NaiveDateTime) -> Self {
        Self {
            record_id: Uuid::new_v4().to_string(),
            sku: sku.into(),
            classification,
            classified_at,
        }
    }
}

// ==========================================
// ClassificationHistory - 分类历史 (只追加)
// ==========================================
// 调用方持有；不提供修改/删除接口
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationHistory {
    records: Vec<ClassificationRecord>,
}

impl ClassificationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条记录
    pub fn append(&mut self, record: ClassificationRecord) {
        self.records.push(record);
    }

    /// 全部记录 (按追加顺序)
    pub fn records(&self) -> &[ClassificationRecord] {
        &self.records
    }

    /// 某 SKU 的记录 (按追加顺序)
    pub fn records_for<'a>(&'a self, sku: &'a str) -> impl Iterator<Item = &'a ClassificationRecord> + 'a {
        self.records.iter().filter(move |r| r.sku == sku)
    }

    /// 某 SKU 最新一条记录
    pub fn latest_for(&self, sku: &str) -> Option<&ClassificationRecord> {
        self.records.iter().rev().find(|r| r.sku == sku)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
