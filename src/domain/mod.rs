// ==========================================
// 人力排班系统 - 领域层
// ==========================================
// 职责: 实体与值类型定义, 不含持久化与业务流程
// ==========================================

pub mod assignment;
pub mod constraint;
pub mod demand;
pub mod employee;
pub mod types;
pub mod window;

pub use assignment::{Assignment, ShortageRecord};
pub use constraint::{ConstraintKind, EmployeeConstraint};
pub use demand::{DemandDeclaration, SkillPattern};
pub use employee::{longest_availability_block_min, AvailabilityWindow, DailyRule, Employee};
pub use types::{FillPass, GatePolicy, TimeRange, MINUTES_PER_DAY};
pub use window::{SeatWindow, SubBlock};
