// ==========================================
// 人力排班系统 - 服务层
// ==========================================
// 职责: 面向调用方的任务编排与并发防护
// ==========================================

pub mod generate_service;

pub use generate_service::{month_period, GenerateService, SubmitOutcome};
