// ==========================================
// 库存缓冲决策引擎 - 记录存储适配层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: ItemStore / ProfileStore 协作接口及其 SQLite 实现;
//       分类历史、缓冲区调整日志只追加; 解耦点每库位唯一
// 约束: 所有查询使用参数化
// ==========================================

pub mod classification_history_repo;
pub mod decoupling_point_repo;
pub mod error;
pub mod item_repo;
pub mod profile_repo;
pub mod store;
pub mod zone_adjustment_repo;

// 重导出核心仓储
pub use classification_history_repo::ClassificationHistoryRepository;
pub use decoupling_point_repo::DecouplingPointRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use item_repo::ItemSnapshotRepository;
pub use profile_repo::BufferProfileRepository;
pub use store::{ItemStore, ProfileStore};
pub use zone_adjustment_repo::ZoneAdjustmentRepository;
