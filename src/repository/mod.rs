// ==========================================
// 人力排班系统 - 数据仓储层
// ==========================================
// 职责: SQLite 数据访问, 每个表一个仓储
// 红线: 引擎不拼 SQL, 仓储不含业务规则
// ==========================================

pub mod assignment_repo;
pub mod constraint_repo;
pub mod demand_repo;
pub mod employee_repo;
pub mod error;
pub mod skill_pattern_repo;

pub use assignment_repo::AssignmentRepository;
pub use constraint_repo::ConstraintRepository;
pub use demand_repo::DemandRepository;
pub use employee_repo::EmployeeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use skill_pattern_repo::SkillPatternRepository;
