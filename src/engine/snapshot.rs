// ==========================================
// 人力排班系统 - 运行快照
// ==========================================
// 职责: 运行开始时一次性构建的只读数据快照
// 依据: 外部数据读 O(period) 次, 循环内零查询 (保证确定性)
// 红线: 快照构建后不可变, 引擎不得回写
// ==========================================

use chrono::{NaiveDate, Weekday};
use std::collections::{HashMap, HashSet};

use crate::domain::constraint::{ConstraintKind, EmployeeConstraint};
use crate::domain::demand::SkillPattern;
use crate::domain::employee::{AvailabilityWindow, Employee};
use crate::domain::types::TimeRange;

// ==========================================
// RosterSnapshot - 排班运行快照
// ==========================================
pub struct RosterSnapshot {
    /// 员工列表 (employee_id 升序)
    pub employees: Vec<Employee>,
    /// 技能 → 员工下标池 (一次构建, O(1) 查找)
    pub pool_by_skill: HashMap<String, Vec<usize>>,
    /// 员工 → 周几 → 可用时段 (该 weekday 无记录 = 无限制)
    pub availability: HashMap<String, HashMap<Weekday, Vec<TimeRange>>>,
    /// (员工, 日期) → 约束类型列表
    pub constraints: HashMap<(String, NaiveDate), Vec<ConstraintKind>>,
    /// 节假日集合
    pub holidays: HashSet<NaiveDate>,
    /// 启用的技能短班模式
    pub skill_patterns: Vec<SkillPattern>,
    /// 员工 → 轮转名次 (id 升序列表按月度轮转偏移旋转后的位置)
    pub rotation_rank: HashMap<String, usize>,
}

impl RosterSnapshot {
    /// 构建运行快照
    ///
    /// # 参数
    /// - employees: 员工列表 (必须已按 employee_id 升序)
    /// - rotation_offset: 轮转起点下标 (0..employees.len())
    pub fn build(
        employees: Vec<Employee>,
        availability_windows: Vec<AvailabilityWindow>,
        constraints: Vec<EmployeeConstraint>,
        holidays: HashSet<NaiveDate>,
        skill_patterns: Vec<SkillPattern>,
        rotation_offset: usize,
    ) -> Self {
        let mut pool_by_skill: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, employee) in employees.iter().enumerate() {
            for skill_id in &employee.skill_ids {
                pool_by_skill.entry(skill_id.clone()).or_default().push(idx);
            }
        }

        let mut availability: HashMap<String, HashMap<Weekday, Vec<TimeRange>>> = HashMap::new();
        for window in availability_windows {
            availability
                .entry(window.employee_id.clone())
                .or_default()
                .entry(window.day_of_week)
                .or_default()
                .push(window.time_range());
        }

        let mut constraint_map: HashMap<(String, NaiveDate), Vec<ConstraintKind>> = HashMap::new();
        for c in constraints {
            constraint_map
                .entry((c.employee_id.clone(), c.constraint_date))
                .or_default()
                .push(c.kind);
        }

        let n = employees.len();
        let mut rotation_rank = HashMap::with_capacity(n);
        if n > 0 {
            let offset = rotation_offset % n;
            for (idx, employee) in employees.iter().enumerate() {
                // offset 处的员工名次为 0, 其余按 id 序循环
                rotation_rank.insert(employee.employee_id.clone(), (idx + n - offset) % n);
            }
        }

        Self {
            employees,
            pool_by_skill,
            availability,
            constraints: constraint_map,
            holidays,
            skill_patterns,
            rotation_rank,
        }
    }

    /// 某员工某 weekday 的可用时段 (None = 无记录 = 无限制)
    pub fn availability_for(&self, employee_id: &str, weekday: Weekday) -> Option<&Vec<TimeRange>> {
        self.availability
            .get(employee_id)
            .and_then(|by_day| by_day.get(&weekday))
    }

    /// 某员工某日的约束列表 (可能为空)
    pub fn constraints_for(&self, employee_id: &str, day: NaiveDate) -> &[ConstraintKind] {
        self.constraints
            .get(&(employee_id.to_string(), day))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 某窗口在某日的 PREFERRED 员工集合
    ///
    /// 命中条件: 存在与窗口区间重叠的 PREFERRED 约束
    pub fn preferred_set(&self, day: NaiveDate, window: &TimeRange) -> HashSet<String> {
        let mut preferred = HashSet::new();
        for employee in &self.employees {
            let has_preference = self
                .constraints_for(&employee.employee_id, day)
                .iter()
                .any(|kind| kind.prefers(window));
            if has_preference {
                preferred.insert(employee.employee_id.clone());
            }
        }
        preferred
    }

    /// 员工轮转名次 (用于候选排序的最终决胜键)
    pub fn rank_of(&self, employee_id: &str) -> usize {
        self.rotation_rank
            .get(employee_id)
            .copied()
            .unwrap_or(usize::MAX)
    }

    pub fn is_holiday(&self, day: NaiveDate) -> bool {
        self.holidays.contains(&day)
    }
}
