// ==========================================
// 人力排班系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合排班引擎所需的全部 Repository
// 目标: 减少编排器的构造函数参数数量, 便于测试时整体注入
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::repository::{
    AssignmentRepository, ConstraintRepository, DemandRepository, EmployeeRepository,
    RepositoryResult, SkillPatternRepository,
};

/// 排班引擎仓储集合
#[derive(Clone)]
pub struct RosterRepositories {
    /// 员工仓储 (含技能与可用时段)
    pub employee_repo: Arc<EmployeeRepository>,
    /// 需求声明仓储
    pub demand_repo: Arc<DemandRepository>,
    /// 员工约束仓储 (含节假日)
    pub constraint_repo: Arc<ConstraintRepository>,
    /// 技能短班模式仓储
    pub skill_pattern_repo: Arc<SkillPatternRepository>,
    /// 排班结果仓储
    pub assignment_repo: Arc<AssignmentRepository>,
}

impl RosterRepositories {
    pub fn new(
        employee_repo: Arc<EmployeeRepository>,
        demand_repo: Arc<DemandRepository>,
        constraint_repo: Arc<ConstraintRepository>,
        skill_pattern_repo: Arc<SkillPatternRepository>,
        assignment_repo: Arc<AssignmentRepository>,
    ) -> Self {
        Self {
            employee_repo,
            demand_repo,
            constraint_repo,
            skill_pattern_repo,
            assignment_repo,
        }
    }

    /// 在共享连接上构建全部仓储 (CLI 与测试的常用入口)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        Ok(Self {
            employee_repo: Arc::new(EmployeeRepository::from_connection(conn.clone())?),
            demand_repo: Arc::new(DemandRepository::from_connection(conn.clone())?),
            constraint_repo: Arc::new(ConstraintRepository::from_connection(conn.clone())?),
            skill_pattern_repo: Arc::new(SkillPatternRepository::from_connection(conn.clone())?),
            assignment_repo: Arc::new(AssignmentRepository::from_connection(conn)?),
        })
    }
}
