// ==========================================
// 人力排班系统 - 引擎层
// ==========================================
// 职责: 实现排班业务规则, 不拼 SQL
// 红线: Engine 不拼 SQL; 候选排序与窗口遍历全程确定性,
//       同输入必产出同结果
// ==========================================

pub mod assigner;
pub mod block_splitter;
pub mod demand_aggregator;
pub mod error;
pub mod orchestrator;
pub mod pairing;
pub mod repositories;
pub mod rotation;
pub mod run_state;
pub mod snapshot;
pub mod window_synthesizer;

// 重导出核心引擎
pub use assigner::{AssignOptions, AssignmentEngine};
pub use block_splitter::WindowScheduler;
pub use demand_aggregator::{DemandAggregator, SkillCurves};
pub use error::{EngineError, EngineResult};
pub use orchestrator::{GenerationResult, RosterOrchestrator};
pub use pairing::PairingEngine;
pub use repositories::RosterRepositories;
pub use rotation::RotationSeeder;
pub use run_state::RunState;
pub use snapshot::RosterSnapshot;
pub use window_synthesizer::WindowSynthesizer;
