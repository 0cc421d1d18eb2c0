use crate::model::id::StylistId;
use chrono::{NaiveDate, NaiveTime, Weekday};

pub mod event;

/// スタッフごとの週間基本スケジュール
/// 曜日ごとのエントリーは高々 1 件である
#[derive(Debug, Clone)]
pub struct WeeklySchedule {
    pub stylist_id: StylistId,
    pub entries: Vec<ScheduleEntry>,
}

impl WeeklySchedule {
    pub fn entry_for(&self, day_of_week: Weekday) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.day_of_week == day_of_week)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduleEntry {
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_working_day: bool,
}

/// スタッフごとの固定休憩。曜日ごとに高々 1 件だが、
/// 置き換えはセット全体で行うため、ここでは一覧として扱う
#[derive(Debug, Clone, Copy)]
pub struct BreakEntry {
    pub day_of_week: Weekday,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
}

/// 終日予約不可となる日付範囲（休暇など）
/// スタッフごとに有効なものは高々 1 件で、書き込み時に置き換えられる
#[derive(Debug, Clone, Copy)]
pub struct BlockoutRange {
    pub stylist_id: StylistId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BlockoutRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

// 曜日番号は 0 = 日曜日とする（連携元システムの番号付けに合わせる）
pub fn weekday_from_number(n: i16) -> Option<Weekday> {
    match n {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_number(day_of_week: Weekday) -> i16 {
    day_of_week.num_days_from_sunday() as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_numbering_round_trips() {
        for n in 0..7 {
            let day = weekday_from_number(n).unwrap();
            assert_eq!(weekday_number(day), n);
        }
        assert_eq!(weekday_from_number(7), None);
        assert_eq!(weekday_from_number(-1), None);
    }

    #[test]
    fn blockout_range_is_inclusive_on_both_ends() {
        let range = BlockoutRange {
            stylist_id: StylistId::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 14).unwrap(),
        };
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 8, 14).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()));
    }
}
