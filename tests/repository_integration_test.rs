// ==========================================
// 仓储层集成测试
// ==========================================
// 覆盖: 各仓储的写入校验、查询排序与整段替换语义
// ==========================================

mod test_helpers;

use chrono::{NaiveDate, Weekday};
use test_helpers::*;
use uuid::Uuid;

use workforce_roster::domain::{
    AvailabilityWindow, ConstraintKind, EmployeeConstraint, SkillPattern, TimeRange,
};
use workforce_roster::engine::RosterRepositories;
use workforce_roster::Assignment;

fn setup_repos(db_path: &str) -> RosterRepositories {
    RosterRepositories::from_connection(shared_connection(db_path)).unwrap()
}

#[test]
fn test_employee_save_and_list_roundtrip() {
    let (_tmp, db_path) = create_test_db();
    let repos = setup_repos(&db_path);

    let mut employee = create_test_employee("E2", &["CASH", "FLOOR"]);
    employee.daily_rule.daily_max_hours = 6;
    repos.employee_repo.save(&employee).unwrap();
    repos
        .employee_repo
        .save(&create_test_employee("E1", &["CASH"]))
        .unwrap();

    let all = repos.employee_repo.list_all().unwrap();
    assert_eq!(all.len(), 2);
    // 稳定排序: 按 employee_id 升序
    assert_eq!(all[0].employee_id, "E1");
    assert_eq!(all[1].employee_id, "E2");
    assert!(all[1].has_skill("FLOOR"));
    assert_eq!(all[1].daily_rule.daily_max_hours, 6);

    // 重复保存 = 更新而非报错, 技能集合整体替换
    let mut updated = create_test_employee("E2", &["FLOOR"]);
    updated.display_name = "改名".to_string();
    repos.employee_repo.save(&updated).unwrap();
    let all = repos.employee_repo.list_all().unwrap();
    assert_eq!(all[1].display_name, "改名");
    assert!(!all[1].has_skill("CASH"));
}

#[test]
fn test_availability_rejects_inverted_window() {
    let (_tmp, db_path) = create_test_db();
    let repos = setup_repos(&db_path);
    repos
        .employee_repo
        .save(&create_test_employee("E1", &["CASH"]))
        .unwrap();

    let bad = AvailabilityWindow {
        employee_id: "E1".to_string(),
        day_of_week: Weekday::Mon,
        start_min: 600,
        end_min: 540,
    };
    assert!(repos.employee_repo.add_availability(&bad).is_err());

    let good = AvailabilityWindow {
        employee_id: "E1".to_string(),
        day_of_week: Weekday::Mon,
        start_min: 540,
        end_min: 780,
    };
    repos.employee_repo.add_availability(&good).unwrap();
    let windows = repos.employee_repo.list_availability().unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].time_range(), TimeRange::new(540, 780));
}

#[test]
fn test_demand_save_validation_rules() {
    let (_tmp, db_path) = create_test_db();
    let repos = setup_repos(&db_path);
    let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

    // 无技能的需求拒绝入库
    let mut no_skill = dated_demand("", day, 540, 1020, 1);
    no_skill.skill_id = String::new();
    assert!(repos.demand_repo.save(&no_skill).is_err());

    // 日期与周几必须二选一
    let mut both = dated_demand("CASH", day, 540, 1020, 1);
    both.day_of_week = Some(Weekday::Mon);
    assert!(repos.demand_repo.save(&both).is_err());

    let mut neither = weekly_demand("CASH", Weekday::Mon, 540, 1020, 1);
    neither.day_of_week = None;
    assert!(repos.demand_repo.save(&neither).is_err());

    // 负席位拒绝
    let negative = dated_demand("CASH", day, 540, 1020, -1);
    assert!(repos.demand_repo.save(&negative).is_err());

    repos.demand_repo.save(&dated_demand("CASH", day, 540, 1020, 1)).unwrap();
}

#[test]
fn test_demand_list_active_for_day_matches_date_and_weekday() {
    let (_tmp, db_path) = create_test_db();
    let repos = setup_repos(&db_path);
    let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let tuesday = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();

    repos.demand_repo.save(&weekly_demand("CASH", Weekday::Mon, 540, 1020, 2)).unwrap();
    repos.demand_repo.save(&dated_demand("FLOOR", monday, 600, 900, 1)).unwrap();
    repos.demand_repo.save(&weekly_demand("CASH", Weekday::Tue, 540, 1020, 3)).unwrap();
    let mut inactive = dated_demand("CASH", monday, 540, 1020, 5);
    inactive.active = false;
    repos.demand_repo.save(&inactive).unwrap();

    let monday_demands = repos
        .demand_repo
        .list_active_for_day(monday, Weekday::Mon)
        .unwrap();
    assert_eq!(monday_demands.len(), 2);

    let tuesday_demands = repos
        .demand_repo
        .list_active_for_day(tuesday, Weekday::Tue)
        .unwrap();
    assert_eq!(tuesday_demands.len(), 1);
    assert_eq!(tuesday_demands[0].required_seats, 3);
}

#[test]
fn test_constraint_roundtrip_preserves_kind() {
    let (_tmp, db_path) = create_test_db();
    let repos = setup_repos(&db_path);
    let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

    let limited = EmployeeConstraint {
        constraint_id: Uuid::new_v4().to_string(),
        employee_id: "E1".to_string(),
        constraint_date: day,
        kind: ConstraintKind::Limited {
            start_min: 600,
            end_min: 840,
        },
    };
    let vacation = EmployeeConstraint {
        constraint_id: Uuid::new_v4().to_string(),
        employee_id: "E2".to_string(),
        constraint_date: day,
        kind: ConstraintKind::Vacation,
    };
    repos.constraint_repo.save(&limited).unwrap();
    repos.constraint_repo.save(&vacation).unwrap();

    let loaded = repos.constraint_repo.list_between(day, day).unwrap();
    assert_eq!(loaded.len(), 2);
    let e1 = loaded.iter().find(|c| c.employee_id == "E1").unwrap();
    assert_eq!(
        e1.kind,
        ConstraintKind::Limited {
            start_min: 600,
            end_min: 840
        }
    );
    let e2 = loaded.iter().find(|c| c.employee_id == "E2").unwrap();
    assert!(e2.kind.is_hard_block());

    // 范围外不返回
    let next_day = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    assert!(repos
        .constraint_repo
        .list_between(next_day, next_day)
        .unwrap()
        .is_empty());
}

#[test]
fn test_holiday_listing_within_range() {
    let (_tmp, db_path) = create_test_db();
    let repos = setup_repos(&db_path);

    let may_day = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
    let national = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
    repos.constraint_repo.add_holiday(may_day, Some("劳动节")).unwrap();
    repos.constraint_repo.add_holiday(national, Some("国庆节")).unwrap();

    let holidays = repos
        .constraint_repo
        .list_holidays_between(
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
        )
        .unwrap();
    assert!(holidays.contains(&may_day));
    assert!(!holidays.contains(&national));
}

#[test]
fn test_skill_pattern_list_active_only() {
    let (_tmp, db_path) = create_test_db();
    let repos = setup_repos(&db_path);

    repos
        .skill_pattern_repo
        .save(&SkillPattern {
            pattern_id: Uuid::new_v4().to_string(),
            skill_id: "CASH".to_string(),
            day_of_week: Some(Weekday::Mon),
            start_min: 540,
            end_min: 900,
            allowed_length_hours: 6,
            active: true,
        })
        .unwrap();
    repos
        .skill_pattern_repo
        .save(&SkillPattern {
            pattern_id: Uuid::new_v4().to_string(),
            skill_id: "FLOOR".to_string(),
            day_of_week: None,
            start_min: 780,
            end_min: 1020,
            allowed_length_hours: 4,
            active: false,
        })
        .unwrap();

    let active = repos.skill_pattern_repo.list_active().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].skill_id, "CASH");
}

#[test]
fn test_assignment_replace_range_is_full_replace() {
    let (_tmp, db_path) = create_test_db();
    let repos = setup_repos(&db_path);

    let day1 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    let outside = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();

    repos
        .assignment_repo
        .replace_range(
            outside,
            outside,
            &[Assignment::new("E9", outside, "CASH", TimeRange::new(540, 1020))],
        )
        .unwrap();
    repos
        .assignment_repo
        .replace_range(
            day1,
            day2,
            &[
                Assignment::new("E1", day1, "CASH", TimeRange::new(540, 1020)),
                Assignment::new("E2", day2, "CASH", TimeRange::new(540, 1020)),
            ],
        )
        .unwrap();

    // 再次替换同区间: 旧内容整体消失
    repos
        .assignment_repo
        .replace_range(
            day1,
            day2,
            &[Assignment::new("E3", day1, "CASH", TimeRange::new(600, 1080))],
        )
        .unwrap();

    let in_range = repos.assignment_repo.list_between(day1, day2).unwrap();
    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].employee_id, "E3");

    // 区间外不受影响
    let kept = repos.assignment_repo.list_between(outside, outside).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].employee_id, "E9");
}

#[test]
fn test_find_last_before_picks_latest_prior_assignment() {
    let (_tmp, db_path) = create_test_db();
    let repos = setup_repos(&db_path);

    let feb_26 = NaiveDate::from_ymd_opt(2026, 2, 26).unwrap();
    let feb_27 = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
    let march_1 = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

    repos
        .assignment_repo
        .replace_range(
            feb_26,
            feb_27,
            &[
                Assignment::new("E1", feb_26, "CASH", TimeRange::new(540, 1020)),
                Assignment::new("E2", feb_27, "CASH", TimeRange::new(540, 780)),
                Assignment::new("E3", feb_27, "CASH", TimeRange::new(780, 1020)),
            ],
        )
        .unwrap();

    // 同日多条时取开始时间最晚的一条
    let last = repos.assignment_repo.find_last_before(march_1).unwrap().unwrap();
    assert_eq!(last.employee_id, "E3");

    // 严格早于: 当天的指派不算
    let last = repos.assignment_repo.find_last_before(feb_27).unwrap().unwrap();
    assert_eq!(last.employee_id, "E1");

    assert!(repos
        .assignment_repo
        .find_last_before(feb_26)
        .unwrap()
        .is_none());
}
