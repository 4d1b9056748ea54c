// ==========================================
// 人力排班系统 - 席位轨道窗口合成器
// ==========================================
// 职责: 将锯齿状席位需求曲线合成为有界时长的席位窗口集合
// 算法: 天际线扫描 - 轨道开/关对应需求曲线的升/降沿,
//       叠加时长上限强制关闭 (关闭后按需重开)
// 不变量: 窗口覆盖积分 == 曲线积分; 窗口时长 <= max_window_minutes
// ==========================================

use std::collections::BTreeMap;

use crate::config::engine_params::EngineParams;
use crate::domain::types::{TimeRange, MINUTES_PER_DAY};
use crate::domain::window::SeatWindow;

use super::demand_aggregator::SkillCurves;

// ==========================================
// WindowSynthesizer - 窗口合成器
// ==========================================
pub struct WindowSynthesizer;

impl WindowSynthesizer {
    /// 合成单技能的席位窗口
    ///
    /// # 返回
    /// (窗口区间, 席位数) 列表, 同一区间已合并, 按区间升序
    pub fn synthesize_skill(curve: &[i32], params: &EngineParams) -> Vec<(TimeRange, i32)> {
        let g = params.granularity_minutes;
        let max_age = params.max_slots_per_shift;
        let slots = curve.len() as i32;

        // LIFO 开放轨道栈: 元素为开槽下标, 栈底最旧
        let mut open: Vec<i32> = Vec::new();
        let mut emitted: BTreeMap<TimeRange, i32> = BTreeMap::new();

        let close = |start_slot: i32, end_slot: i32, emitted: &mut BTreeMap<TimeRange, i32>| {
            let range = TimeRange::new(
                start_slot * g,
                (end_slot * g).min(MINUTES_PER_DAY),
            );
            if range.duration_min() > 0 {
                *emitted.entry(range).or_insert(0) += 1;
            }
        };

        for i in 0..=slots {
            let demand = if i < slots { curve[i as usize].max(0) } else { 0 };

            // 1) 需求下降: 弹出最近开启的轨道
            while open.len() as i32 > demand {
                match open.pop() {
                    Some(start) => close(start, i, &mut emitted),
                    None => break,
                }
            }

            if i == slots {
                break;
            }

            // 2) 时长上限: 最旧轨道到龄则强制关闭 (栈底最旧)
            while let Some(&oldest) = open.first() {
                if i - oldest >= max_age {
                    open.remove(0);
                    close(oldest, i, &mut emitted);
                } else {
                    break;
                }
            }

            // 3) 需求上升 (含强制关闭后的重开): 开新轨道
            while (open.len() as i32) < demand {
                open.push(i);
            }
        }

        emitted.into_iter().collect()
    }

    /// 合成一天内全部技能的席位窗口, 跨技能按窗口区间合并
    ///
    /// # 返回
    /// SeatWindow 列表, 按区间升序 (跨运行稳定)
    pub fn synthesize_day(curves: &SkillCurves, params: &EngineParams) -> Vec<SeatWindow> {
        let mut merged: BTreeMap<TimeRange, SeatWindow> = BTreeMap::new();
        for (skill_id, curve) in curves {
            for (range, seats) in Self::synthesize_skill(curve, params) {
                merged
                    .entry(range)
                    .or_insert_with(|| SeatWindow::new(range))
                    .add_seats(skill_id, seats);
            }
        }
        merged.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> EngineParams {
        EngineParams::for_tests() // G=60, 上限 9h
    }

    /// 覆盖守恒: 窗口席位×槽数之和 == 曲线积分
    fn coverage(windows: &[(TimeRange, i32)], g: i32) -> i32 {
        windows
            .iter()
            .map(|(range, seats)| seats * range.duration_min() / g)
            .sum()
    }

    #[test]
    fn test_single_window_within_cap() {
        // 09:00-18:00 两席, 9h == 上限, 单窗口
        let mut curve = vec![0; 24];
        for slot in curve.iter_mut().take(18).skip(9) {
            *slot = 2;
        }
        let windows = WindowSynthesizer::synthesize_skill(&curve, &params());
        assert_eq!(windows, vec![(TimeRange::new(540, 1080), 2)]);
    }

    #[test]
    fn test_overlong_demand_splits_into_multiple_windows() {
        // 09:00-21:00 两席, 12h > 9h 上限, 必须拆为至少两个窗口
        let mut curve = vec![0; 24];
        for slot in curve.iter_mut().take(21).skip(9) {
            *slot = 2;
        }
        let windows = WindowSynthesizer::synthesize_skill(&curve, &params());
        assert!(windows.len() >= 2);
        for (range, _) in &windows {
            assert!(range.duration_min() <= 540);
        }
        assert_eq!(coverage(&windows, 60), curve.iter().sum::<i32>());
    }

    #[test]
    fn test_ragged_curve_coverage_conservation() {
        // 升降沿混合: 1,1,3,3,2,2,2,0,4
        let mut curve = vec![0; 24];
        let shape = [1, 1, 3, 3, 2, 2, 2, 0, 4];
        for (i, v) in shape.iter().enumerate() {
            curve[8 + i] = *v;
        }
        let windows = WindowSynthesizer::synthesize_skill(&curve, &params());
        assert_eq!(coverage(&windows, 60), curve.iter().sum::<i32>());
        for (range, _) in &windows {
            assert!(range.duration_min() <= 540);
        }
    }

    #[test]
    fn test_lifo_pop_closes_most_recent_track() {
        // 2 席 08:00-12:00, 其中 1 席延续到 16:00:
        // 需求 2,2,2,2,1,1,1,1 → 降沿弹出最近开启的轨道,
        // 留下最早的轨道继续, 产出 [08:00,12:00) 与 [08:00,16:00)
        let mut curve = vec![0; 24];
        for slot in curve.iter_mut().take(12).skip(8) {
            *slot = 2;
        }
        for slot in curve.iter_mut().take(16).skip(12) {
            *slot = 1;
        }
        let windows = WindowSynthesizer::synthesize_skill(&curve, &params());
        assert_eq!(
            windows,
            vec![
                (TimeRange::new(480, 720), 1),
                (TimeRange::new(480, 960), 1),
            ]
        );
    }

    #[test]
    fn test_day_end_closes_open_tracks() {
        // 需求延伸到当日末尾
        let mut curve = vec![0; 24];
        for slot in curve.iter_mut().take(24).skip(20) {
            *slot = 1;
        }
        let windows = WindowSynthesizer::synthesize_skill(&curve, &params());
        assert_eq!(windows, vec![(TimeRange::new(1200, 1440), 1)]);
    }

    #[test]
    fn test_synthesize_day_merges_skills_by_window() {
        let mut curves = SkillCurves::new();
        let mut a = vec![0; 24];
        let mut b = vec![0; 24];
        for i in 9..13 {
            a[i] = 1;
            b[i] = 2;
        }
        curves.insert("A".to_string(), a);
        curves.insert("B".to_string(), b);

        let windows = WindowSynthesizer::synthesize_day(&curves, &params());
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].range, TimeRange::new(540, 780));
        assert_eq!(windows[0].per_skill_seats["A"], 1);
        assert_eq!(windows[0].per_skill_seats["B"], 2);
    }

    #[test]
    fn test_force_close_reopens_when_demand_persists() {
        // 全天 1 席 (24h): 强制关闭后立即重开, 全部窗口 <= 9h 且守恒
        let curve = vec![1; 24];
        let windows = WindowSynthesizer::synthesize_skill(&curve, &params());
        assert!(windows.len() >= 3);
        for (range, _) in &windows {
            assert!(range.duration_min() <= 540);
        }
        assert_eq!(coverage(&windows, 60), 24);
    }
}
