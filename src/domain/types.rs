// ==========================================
// 人力排班系统 - 领域类型定义
// ==========================================
// 职责: 基础时间类型与排班枚举
// 时间表示: 当日分钟数 (0..1440), 不携带时区
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 一天的总分钟数
pub const MINUTES_PER_DAY: i32 = 1440;

// ==========================================
// 时间区间 (TimeRange)
// ==========================================
// 半开区间 [start_min, end_min), 单位: 当日分钟
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_min: i32,
    pub end_min: i32,
}

impl TimeRange {
    pub fn new(start_min: i32, end_min: i32) -> Self {
        Self { start_min, end_min }
    }

    /// 区间长度（分钟），空区间返回 0
    pub fn duration_min(&self) -> i32 {
        (self.end_min - self.start_min).max(0)
    }

    /// 是否为合法非空区间
    pub fn is_valid(&self) -> bool {
        self.start_min >= 0 && self.end_min <= MINUTES_PER_DAY && self.start_min < self.end_min
    }

    /// 是否完整包含另一区间
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start_min <= other.start_min && other.end_min <= self.end_min
    }

    /// 是否与另一区间有重叠（半开区间语义）
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }

    /// 区间中点（分钟）
    pub fn midpoint(&self) -> i32 {
        (self.start_min + self.end_min) / 2
    }

    /// 解析 "HH:MM-HH:MM" 格式的时间窗字符串
    ///
    /// # 返回
    /// - Some(TimeRange): 解析成功且 start < end
    /// - None: 格式错误或区间非法
    pub fn parse(s: &str) -> Option<TimeRange> {
        let (left, right) = s.split_once('-')?;
        let start_min = parse_hhmm(left.trim())?;
        let end_min = parse_hhmm(right.trim())?;
        let range = TimeRange::new(start_min, end_min);
        if range.is_valid() {
            Some(range)
        } else {
            None
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_min / 60,
            self.start_min % 60,
            self.end_min / 60,
            self.end_min % 60
        )
    }
}

/// 解析 "HH:MM" 为当日分钟数（支持 24:00 作为当日结束）
fn parse_hhmm(s: &str) -> Option<i32> {
    let (h, m) = s.split_once(':')?;
    let h: i32 = h.parse().ok()?;
    let m: i32 = m.parse().ok()?;
    if !(0..=24).contains(&h) || !(0..60).contains(&m) {
        return None;
    }
    let total = h * 60 + m;
    if total > MINUTES_PER_DAY {
        return None;
    }
    Some(total)
}

// ==========================================
// 周几编码 (与数据库一致: MON..SUN)
// ==========================================

pub fn weekday_code(day: chrono::Weekday) -> &'static str {
    match day {
        chrono::Weekday::Mon => "MON",
        chrono::Weekday::Tue => "TUE",
        chrono::Weekday::Wed => "WED",
        chrono::Weekday::Thu => "THU",
        chrono::Weekday::Fri => "FRI",
        chrono::Weekday::Sat => "SAT",
        chrono::Weekday::Sun => "SUN",
    }
}

pub fn weekday_from_code(code: &str) -> Option<chrono::Weekday> {
    match code {
        "MON" => Some(chrono::Weekday::Mon),
        "TUE" => Some(chrono::Weekday::Tue),
        "WED" => Some(chrono::Weekday::Wed),
        "THU" => Some(chrono::Weekday::Thu),
        "FRI" => Some(chrono::Weekday::Fri),
        "SAT" => Some(chrono::Weekday::Sat),
        "SUN" => Some(chrono::Weekday::Sun),
        _ => None,
    }
}

// ==========================================
// 短班启用判定策略 (Gate Policy)
// ==========================================
// a = 技能模式白名单命中, b = 存在可用的短班适格员工
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatePolicy {
    AOrB,
    AOnly,
    BOnly,
}

impl GatePolicy {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "A_ONLY" => GatePolicy::AOnly,
            "B_ONLY" => GatePolicy::BOnly,
            _ => GatePolicy::AOrB,
        }
    }
}

impl fmt::Display for GatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatePolicy::AOrB => write!(f, "A_OR_B"),
            GatePolicy::AOnly => write!(f, "A_ONLY"),
            GatePolicy::BOnly => write!(f, "B_ONLY"),
        }
    }
}

// ==========================================
// 窗口排序遍 (Fill Pass)
// ==========================================
// 三遍拼接: 同一窗口集合的三种排列, 依次执行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillPass {
    First, // 靠前优先, 从左缘填充
    Last,  // 靠后优先, 从右缘填充
    Other, // 居中优先, 从支点向两侧扩展
}

impl fmt::Display for FillPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillPass::First => write!(f, "FIRST"),
            FillPass::Last => write!(f, "LAST"),
            FillPass::Other => write!(f, "OTHER"),
        }
    }
}
