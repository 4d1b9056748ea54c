// ==========================================
// 人力排班系统 - 席位窗口领域模型
// ==========================================
// 职责: 合成器输出的席位窗口与切块器输出的子块
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::types::TimeRange;

// ==========================================
// SeatWindow - 席位窗口
// ==========================================
// 由席位轨道合成器产出: 连续时间窗 + 各技能席位数
// 不变量: 窗口时长 <= max_window_minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatWindow {
    pub range: TimeRange,
    // BTreeMap 保证跨运行的遍历顺序稳定
    pub per_skill_seats: BTreeMap<String, i32>,
}

impl SeatWindow {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            per_skill_seats: BTreeMap::new(),
        }
    }

    pub fn add_seats(&mut self, skill_id: &str, seats: i32) {
        *self
            .per_skill_seats
            .entry(skill_id.to_string())
            .or_insert(0) += seats;
    }

    pub fn total_seats(&self) -> i32 {
        self.per_skill_seats.values().sum()
    }
}

// ==========================================
// SubBlock - 指派子块
// ==========================================
// 窗口的长度受限切片, 恰好对应一名员工的一个班次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubBlock {
    pub range: TimeRange,
    pub skill_id: String,
    pub length_hours: i32, // 候选长度档位 (小时)
}

impl SubBlock {
    pub fn new(range: TimeRange, skill_id: &str, length_hours: i32) -> Self {
        Self {
            range,
            skill_id: skill_id.to_string(),
            length_hours,
        }
    }

    /// 班次标签: 技能 + 窗口, 用于 Assignment.label 与缺口日志
    pub fn label(&self) -> String {
        format!("{} {}", self.skill_id, self.range)
    }
}
