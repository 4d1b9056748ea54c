// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use chrono::{NaiveDate, Weekday};
use rusqlite::Connection;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use uuid::Uuid;

use workforce_roster::db::open_sqlite_connection;
use workforce_roster::domain::{DailyRule, DemandDeclaration, Employee};

/// 创建临时测试数据库
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> (NamedTempFile, String) {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();
    (temp_file, db_path)
}

/// 打开共享连接 (仓储与配置层共用)
pub fn shared_connection(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = open_sqlite_connection(db_path).unwrap();
    Arc::new(Mutex::new(conn))
}

/// 创建测试员工 (全天/上午/下午均适格, 默认用工规则)
pub fn create_test_employee(employee_id: &str, skills: &[&str]) -> Employee {
    Employee {
        employee_id: employee_id.to_string(),
        display_name: format!("员工{}", employee_id),
        skill_ids: skills
            .iter()
            .map(|s| s.to_string())
            .collect::<BTreeSet<_>>(),
        eligible_full: true,
        eligible_short_morning: true,
        eligible_short_afternoon: true,
        daily_rule: DailyRule::default(),
    }
}

/// 创建周循环需求声明
pub fn weekly_demand(
    skill_id: &str,
    weekday: Weekday,
    start_min: i32,
    end_min: i32,
    required_seats: i32,
) -> DemandDeclaration {
    DemandDeclaration {
        demand_id: Uuid::new_v4().to_string(),
        skill_id: skill_id.to_string(),
        date: None,
        day_of_week: Some(weekday),
        start_min,
        end_min,
        required_seats,
        active: true,
        sort_order: 0,
    }
}

/// 创建特定日期需求声明 (覆盖当天同技能的周循环需求)
pub fn dated_demand(
    skill_id: &str,
    date: NaiveDate,
    start_min: i32,
    end_min: i32,
    required_seats: i32,
) -> DemandDeclaration {
    DemandDeclaration {
        demand_id: Uuid::new_v4().to_string(),
        skill_id: skill_id.to_string(),
        date: Some(date),
        day_of_week: None,
        start_min,
        end_min,
        required_seats,
        active: true,
        sort_order: 0,
    }
}
