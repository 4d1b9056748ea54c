// ==========================================
// 配置层集成测试
// ==========================================
// 覆盖: config_kv 读写, 参数快照解析与非法配置回落
// ==========================================

mod test_helpers;

use test_helpers::*;

use workforce_roster::config::{config_keys, ConfigManager, EngineParams};
use workforce_roster::domain::{GatePolicy, TimeRange};

fn config_manager(db_path: &str) -> ConfigManager {
    ConfigManager::from_connection(shared_connection(db_path)).unwrap()
}

#[tokio::test]
async fn test_engine_params_defaults() {
    let (_tmp, db_path) = create_test_db();
    let config = config_manager(&db_path);

    let params = EngineParams::resolve(&config).await.unwrap();
    assert_eq!(params.granularity_minutes, 30);
    assert_eq!(params.slots, 48);
    assert_eq!(params.max_window_minutes, 540);
    assert_eq!(params.primary_block_hours, 8);
    assert_eq!(params.short_block_hours, vec![6, 4]);
    assert_eq!(params.gate_policy, GatePolicy::AOrB);
    assert!(params.pairing.is_none());
    assert!(params.skill_priorities.is_empty());
}

#[tokio::test]
async fn test_engine_params_reads_overrides() {
    let (_tmp, db_path) = create_test_db();
    let config = config_manager(&db_path);

    config.set_config_value(config_keys::GRANULARITY_MINUTES, "60").unwrap();
    config.set_config_value(config_keys::MAX_WINDOW_MINUTES, "600").unwrap();
    config.set_config_value(config_keys::PRIMARY_BLOCK_HOURS, "10").unwrap();
    config.set_config_value(config_keys::SHORT_BLOCK_HOURS, "6, 4, 2").unwrap();
    config.set_config_value(config_keys::GATE_POLICY, "a_only").unwrap();
    config
        .set_config_value(config_keys::SKILL_PRIORITIES, r#"{"CASH": 1, "FLOOR": 2}"#)
        .unwrap();

    let params = EngineParams::resolve(&config).await.unwrap();
    assert_eq!(params.granularity_minutes, 60);
    assert_eq!(params.slots, 24);
    assert_eq!(params.max_window_minutes, 600);
    assert_eq!(params.max_slots_per_shift, 10);
    assert_eq!(params.primary_block_hours, 10);
    assert_eq!(params.short_block_hours, vec![6, 4, 2]);
    assert_eq!(params.gate_policy, GatePolicy::AOnly);
    assert_eq!(params.candidate_lengths(), vec![10, 6, 4, 2]);
    // 优先级低的技能排序靠前
    assert!(params.skill_order_key("CASH") < params.skill_order_key("FLOOR"));
    assert!(params.skill_order_key("FLOOR") < params.skill_order_key("OTHER"));
}

#[tokio::test]
async fn test_invalid_granularity_falls_back_to_default() {
    let (_tmp, db_path) = create_test_db();
    let config = config_manager(&db_path);

    config.set_config_value(config_keys::GRANULARITY_MINUTES, "0").unwrap();
    let params = EngineParams::resolve(&config).await.unwrap();
    assert_eq!(params.granularity_minutes, 30);

    config.set_config_value(config_keys::GRANULARITY_MINUTES, "不是数字").unwrap();
    let params = EngineParams::resolve(&config).await.unwrap();
    assert_eq!(params.granularity_minutes, 30);
}

#[tokio::test]
async fn test_pairing_windows_parsed_when_enabled() {
    let (_tmp, db_path) = create_test_db();
    let config = config_manager(&db_path);

    config.set_config_value(config_keys::PAIRING_ENABLED, "true").unwrap();
    config.set_config_value(config_keys::PAIRING_FULL_WINDOW, "09:00-18:00").unwrap();
    config.set_config_value(config_keys::PAIRING_MORNING_WINDOW, "09:00-13:00").unwrap();
    config
        .set_config_value(config_keys::PAIRING_AFTERNOON_WINDOW, "13:00-18:00")
        .unwrap();

    let params = EngineParams::resolve(&config).await.unwrap();
    let pairing = params.pairing.unwrap();
    assert_eq!(pairing.full, TimeRange::new(540, 1080));
    assert_eq!(pairing.morning, TimeRange::new(540, 780));
    assert_eq!(pairing.afternoon, TimeRange::new(780, 1080));
}

#[tokio::test]
async fn test_malformed_pairing_window_disables_pairing() {
    let (_tmp, db_path) = create_test_db();
    let config = config_manager(&db_path);

    config.set_config_value(config_keys::PAIRING_ENABLED, "true").unwrap();
    config.set_config_value(config_keys::PAIRING_FULL_WINDOW, "09:00-18:00").unwrap();
    config.set_config_value(config_keys::PAIRING_MORNING_WINDOW, "乱写的").unwrap();
    config
        .set_config_value(config_keys::PAIRING_AFTERNOON_WINDOW, "13:00-18:00")
        .unwrap();

    let params = EngineParams::resolve(&config).await.unwrap();
    assert!(params.pairing.is_none());
}

#[tokio::test]
async fn test_overlapping_pairing_windows_disable_pairing() {
    let (_tmp, db_path) = create_test_db();
    let config = config_manager(&db_path);

    config.set_config_value(config_keys::PAIRING_ENABLED, "true").unwrap();
    config.set_config_value(config_keys::PAIRING_FULL_WINDOW, "09:00-18:00").unwrap();
    config.set_config_value(config_keys::PAIRING_MORNING_WINDOW, "09:00-14:00").unwrap();
    config
        .set_config_value(config_keys::PAIRING_AFTERNOON_WINDOW, "13:00-18:00")
        .unwrap();

    let params = EngineParams::resolve(&config).await.unwrap();
    assert!(params.pairing.is_none());
}

#[test]
fn test_config_value_upsert() {
    let (_tmp, db_path) = create_test_db();
    let config = config_manager(&db_path);

    config.set_config_value("roster.test_key", "v1").unwrap();
    config.set_config_value("roster.test_key", "v2").unwrap();
    assert_eq!(
        config.get_config_value("roster.test_key").unwrap(),
        Some("v2".to_string())
    );
    assert_eq!(config.get_config_value("roster.missing").unwrap(), None);
}
