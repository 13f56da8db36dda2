// ==========================================
// 引擎间集成测试
// ==========================================
// 职责: 验证引擎协作与数据流转
// 场景: 缓冲区 → 净流量 → 穿透 → 补货; 分类; 解耦点; 模型选择
// ==========================================

mod test_helpers;

use inventory_decision_engine::config::{ConfigManager, ConfigScope, EngineConfig};
use inventory_decision_engine::domain::{
    AdjustmentDirection, BreachType, BufferStatus, BufferZones, DecouplingFactor, DecouplingType,
    DesignationDecision, DistributionStatus, ForecastCandidate, LeadTimeCategory,
    PlanningPriority, VariabilityLevel, ZoneKind,
};
use inventory_decision_engine::engine::{
    BufferPenetrationClassifier, BufferStatusPipeline, BufferZoneCalculator,
    DecouplingPointPositioner, DecouplingRecommender, DecouplingRegistry, DemandAnalytics,
    ForecastModelSelector, NetFlowPositionEngine, SkuClassificationEngine, ZoneAdjustmentRequest,
};
use inventory_decision_engine::error::EngineError;
use inventory_decision_engine::repository::{
    BufferProfileRepository, ClassificationHistoryRepository, ItemSnapshotRepository,
    ZoneAdjustmentRepository,
};
use std::collections::BTreeSet;
use test_helpers::{create_stocked_item, create_test_db, create_test_item, create_test_profile, shared_connection};

// ==========================================
// 端到端场景
// ==========================================

/// adu 10, 提前期 14, 现有 120, 在途 50, 合格需求 30
/// 短提前期因子 0.33, 补货因子 1.0, 绿区因子 0.5
#[test]
fn test_end_to_end_scenario_through_store() {
    let (_temp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);

    let manager = ConfigManager::from_connection(conn.clone());
    let scope = ConfigScope::Global;
    manager.set_value(&scope, "short_lead_time_factor", "0.33").unwrap();
    manager.set_value(&scope, "replenishment_time_factor", "1.0").unwrap();
    manager.set_value(&scope, "green_zone_factor", "0.5").unwrap();
    let config = manager.load_engine_config(&scope).unwrap();

    let mut item = create_stocked_item("SKU-E2E", 10.0, 14.0, 120.0, 50.0, 30.0);
    item.variability_factor = 0.5;
    ItemSnapshotRepository::new(conn.clone()).upsert(&item).unwrap();

    let outcome = BufferStatusPipeline::new()
        .evaluate_store(
            &ItemSnapshotRepository::new(conn.clone()),
            &BufferProfileRepository::new(conn.clone()),
            &config,
        )
        .unwrap();

    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.statuses.len(), 1);
    let status = &outcome.statuses[0];

    let expected_red = 10.0 * 14.0 * 0.33 * 0.5;
    assert!((status.zones.red - expected_red).abs() < 1e-9, "red={}", status.zones.red);
    assert_eq!(status.zones.yellow, 140.0);
    assert_eq!(status.zones.green, 70.0);
    assert_eq!(status.net_flow.value, 140.0);
    assert!(status.buffer_computable);

    let total = status.zones.total();
    let expected_percent = (total - 140.0) / total * 100.0;
    assert!((status.penetration.percent - expected_percent).abs() < 1e-9);
    assert_eq!(status.penetration.status, BufferStatus::Yellow);
    assert_eq!(status.breach, Some(BreachType::BelowToy));

    assert!(status.replenishment.should_order, "净流量低于黄区顶应下单");
    assert!((status.replenishment.order_quantity - (total - 140.0)).abs() < 1e-9);
    assert_eq!(status.replenishment.planning_priority, PlanningPriority::Low);

    let summary = outcome.health_summary();
    assert_eq!((summary.evaluated, summary.yellow), (1, 1));
    assert_eq!(summary.health_score, 60.0);
}

#[test]
fn test_pipeline_uses_profile_moq_from_store() {
    let (_temp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);

    let profile = create_test_profile("BP-MOQ", VariabilityLevel::Low, LeadTimeCategory::Short, Some(1000.0));
    BufferProfileRepository::new(conn.clone()).upsert(&profile).unwrap();

    let mut item = create_stocked_item("SKU-MOQ", 2.0, 10.0, 0.0, 0.0, 0.0);
    item.buffer_profile_id = Some("BP-MOQ".to_string());
    let mut orphan = create_test_item("SKU-ORPHAN", 2.0, 10.0);
    orphan.buffer_profile_id = Some("BP-GONE".to_string());

    let items = ItemSnapshotRepository::new(conn.clone());
    items.upsert(&item).unwrap();
    items.upsert(&orphan).unwrap();

    let outcome = BufferStatusPipeline::new()
        .evaluate_store(&items, &BufferProfileRepository::new(conn), &EngineConfig::default())
        .unwrap();

    assert_eq!(outcome.statuses.len(), 1);
    let status = &outcome.statuses[0];
    assert_eq!(status.zones.red, 1000.0, "MOQ 为红区下限");
    assert!(status.replenishment.should_order);
    assert_eq!(status.replenishment.order_quantity % 1000.0, 0.0);
    assert_eq!(status.penetration.status, BufferStatus::Red);

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].record_key, "SKU-ORPHAN");
    assert!(matches!(outcome.failures[0].error, EngineError::Validation(_)));
}

// ==========================================
// 缓冲区性质
// ==========================================

#[test]
fn test_zone_monotonicity_in_adu() {
    let calc = BufferZoneCalculator::new();
    let config = EngineConfig::default();
    let profile = create_test_profile("BP", VariabilityLevel::Medium, LeadTimeCategory::Medium, None);

    for lead_time in [1.0, 14.0, 15.0, 29.0, 45.0] {
        let mut previous = BufferZones::zero();
        for step in 0..40 {
            let item = create_test_item("SKU", step as f64 * 1.5, lead_time);
            for zones in [
                calc.compute_buffer_zones(&item, None, &config).unwrap(),
                calc.compute_buffer_zones(&item, Some(&profile), &config).unwrap(),
            ] {
                assert!(zones.red >= 0.0 && zones.yellow >= 0.0 && zones.green >= 0.0);
            }
            let zones = calc.compute_buffer_zones(&item, Some(&profile), &config).unwrap();
            assert!(zones.red >= previous.red);
            assert!(zones.yellow >= previous.yellow);
            previous = zones;
        }
    }
}

#[test]
fn test_zero_buffer_degeneracy() {
    let calc = BufferZoneCalculator::new();
    let classifier = BufferPenetrationClassifier::new();
    let net_flow_engine = NetFlowPositionEngine::new();
    let config = EngineConfig::default();

    for (adu, lead_time) in [(0.0, 10.0), (5.0, 0.0), (0.0, 0.0)] {
        let item = create_stocked_item("SKU-Z", adu, lead_time, -40.0, 0.0, 10.0);
        let zones = calc.compute_buffer_zones(&item, None, &config).unwrap();
        assert_eq!(zones, BufferZones::zero());
        assert!(!calc.is_computable(&item));

        let penetration = classifier
            .classify(&net_flow_engine.compute_net_flow_position(&item), &zones)
            .unwrap();
        assert_eq!(penetration.percent, 0.0);
        assert_eq!(penetration.status, BufferStatus::Green);
    }
}

#[test]
fn test_net_flow_identity() {
    let engine = NetFlowPositionEngine::new();
    for (on_hand, on_order, demand) in [(120.0, 50.0, 30.0), (0.0, 10.0, 25.5), (-3.0, 0.0, 0.0)] {
        let item = create_stocked_item("SKU", 1.0, 1.0, on_hand, on_order, demand);
        assert_eq!(engine.compute_net_flow_position(&item).value, on_hand + on_order - demand);
    }
}

#[test]
fn test_penetration_boundaries() {
    let classifier = BufferPenetrationClassifier::new();
    assert_eq!(classifier.status_for_percent(33.0), BufferStatus::Green);
    assert_eq!(classifier.status_for_percent(33.0001), BufferStatus::Yellow);
    assert_eq!(classifier.status_for_percent(66.0), BufferStatus::Yellow);
    assert_eq!(classifier.status_for_percent(66.0001), BufferStatus::Red);
}

#[test]
fn test_adjustment_scoping_and_log_persistence() {
    let (_temp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);
    let calc = BufferZoneCalculator::new();
    let current = BufferZones::new(23.1, 140.0, 70.0);

    let request = ZoneAdjustmentRequest {
        factor: 10.0,
        direction: AdjustmentDirection::Up,
        zones: [ZoneKind::Red].into_iter().collect::<BTreeSet<_>>(),
        reason: "供应商交付不稳定".to_string(),
    };
    let log = calc.adjust_with_reason("SKU-ADJ", &current, &request).unwrap();
    assert_eq!(log.after.red, 23.1 * 1.1);
    assert_eq!(log.after.yellow.to_bits(), 140.0_f64.to_bits());
    assert_eq!(log.after.green.to_bits(), 70.0_f64.to_bits());

    let repo = ZoneAdjustmentRepository::new(conn);
    repo.insert(&log).unwrap();
    let stored = repo.list_for_sku("SKU-ADJ").unwrap();
    assert_eq!(stored, vec![log]);
}

// ==========================================
// 分类
// ==========================================

#[test]
fn test_classification_idempotent_and_historized() {
    let (_temp, db_path) = create_test_db().unwrap();
    let repo = ClassificationHistoryRepository::new(shared_connection(&db_path));
    let engine = SkuClassificationEngine::new();
    let analytics = DemandAnalytics::new();
    let config = EngineConfig::default();

    let demand = [12.0, 0.0, 30.0, 4.0, 25.0, 1.0];
    let mut item = create_test_item("SKU-CLS", analytics.average_daily_usage(&demand, 6.0), 35.0);
    item.variability_factor = analytics.variability_factor(&demand);

    let first = engine.classify(&item, true, &config).unwrap();
    let second = engine.classify(&item, true, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.lead_time_category, LeadTimeCategory::Long);

    repo.append(&engine.record(&item.sku, first)).unwrap();
    repo.append(&engine.record(&item.sku, second)).unwrap();
    assert_eq!(repo.list_for_sku("SKU-CLS").unwrap().len(), 2);
}

// ==========================================
// 解耦点
// ==========================================

#[test]
fn test_decoupling_recommendation_to_registry() {
    let config = EngineConfig::default();
    let recommender = DecouplingRecommender::new();
    let positioner = DecouplingPointPositioner::new();
    let mut registry = DecouplingRegistry::new();

    let factors = vec![
        DecouplingFactor::new("lead_time", 6.0, 90.0),
        DecouplingFactor::new("demand_variability", 5.0, 80.0),
        DecouplingFactor::new("customer_service", 3.0, 60.0),
    ];
    let rec = recommender.recommend("LOC-MAIN", &factors, Some(0.7), &config).unwrap();
    assert_eq!(rec.decision, DesignationDecision::AutoDesignate);
    let decoupling_type = rec.recommended_type.unwrap();
    assert_eq!(decoupling_type, DecouplingType::Strategic);

    let point = positioner
        .position(&rec.location_id, decoupling_type, "BP-STRAT", Some("主仓"))
        .unwrap();
    registry.register(point.clone()).unwrap();
    assert!(matches!(registry.register(point), Err(EngineError::Conflict(_))));

    let report = positioner
        .distribution_status(&registry.counts(), &config.decoupling_benchmarks)
        .unwrap();
    assert_eq!(report[&DecouplingType::Strategic].count, 1);
    assert_eq!(report[&DecouplingType::Strategic].status, DistributionStatus::Over);
}

// ==========================================
// 预测模型选择
// ==========================================

#[test]
fn test_model_selection_determinism() {
    let selector = ForecastModelSelector::new();
    let actuals = vec![Some(100.0), Some(110.0), None, Some(90.0)];
    let candidates = vec![
        ForecastCandidate::new("A", "Model A", vec![105.0, 108.0, 95.0, 92.0]),
        ForecastCandidate::new("B", "Model B", vec![90.0, 90.0, 90.0, 90.0]),
    ];

    let first = selector.select_best_fit(&actuals, &candidates).unwrap();
    for _ in 0..20 {
        assert_eq!(selector.select_best_fit(&actuals, &candidates).unwrap(), first);
    }
    assert_eq!(first.model_id, "A");
    assert_eq!(first.metrics.mae, 3.0);
}
