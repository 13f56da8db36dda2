// ==========================================
// 库存缓冲决策引擎 - 记录存储协作接口
// ==========================================
// 职责: 引擎批处理所需的最小读取接口
// 实现: SQLite (ItemSnapshotRepository / BufferProfileRepository)
//       以及内存集合 (Vec / BTreeMap)，便于调用方直接传入快照
// ==========================================

use crate::domain::item::{BufferProfile, ItemSnapshot};
use crate::repository::error::RepositoryResult;
use std::collections::BTreeMap;

/// 物料快照读取接口
pub trait ItemStore {
    /// 按 sku (+ 可选库位) 读取
    fn get_item(&self, sku: &str, location_id: Option<&str>) -> RepositoryResult<Option<ItemSnapshot>>;

    /// 读取全部物料快照
    fn list_items(&self) -> RepositoryResult<Vec<ItemSnapshot>>;
}

/// 缓冲配置档读取接口
pub trait ProfileStore {
    fn get_profile(&self, profile_id: &str) -> RepositoryResult<Option<BufferProfile>>;
}

// ==========================================
// 内存实现
// ==========================================

impl ItemStore for Vec<ItemSnapshot> {
    fn get_item(&self, sku: &str, location_id: Option<&str>) -> RepositoryResult<Option<ItemSnapshot>> {
        Ok(self
            .iter()
            .find(|item| item.sku == sku && item.location_id.as_deref() == location_id)
            .cloned())
    }

    fn list_items(&self) -> RepositoryResult<Vec<ItemSnapshot>> {
        Ok(self.clone())
    }
}

impl ProfileStore for BTreeMap<String, BufferProfile> {
    fn get_profile(&self, profile_id: &str) -> RepositoryResult<Option<BufferProfile>> {
        Ok(self.get(profile_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{LeadTimeCategory, VariabilityLevel};

    #[test]
    fn test_vec_item_store_matches_location() {
        let mut a = ItemSnapshot::new("SKU-1");
        a.location_id = Some("DC-01".to_string());
        let b = ItemSnapshot::new("SKU-1");
        let store = vec![a, b];

        let found = store.get_item("SKU-1", Some("DC-01")).unwrap().unwrap();
        assert_eq!(found.location_id.as_deref(), Some("DC-01"));
        let found = store.get_item("SKU-1", None).unwrap().unwrap();
        assert!(found.location_id.is_none());
        assert!(store.get_item("SKU-2", None).unwrap().is_none());
        assert_eq!(store.list_items().unwrap().len(), 2);
    }

    #[test]
    fn test_map_profile_store() {
        let mut store = BTreeMap::new();
        store.insert(
            "BP-1".to_string(),
            BufferProfile::new("BP-1", VariabilityLevel::Low, LeadTimeCategory::Short),
        );
        assert!(store.get_profile("BP-1").unwrap().is_some());
        assert!(store.get_profile("BP-2").unwrap().is_none());
    }
}
