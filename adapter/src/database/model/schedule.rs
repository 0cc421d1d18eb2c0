use kernel::model::{
    id::StylistId,
    schedule::{weekday_from_number, BlockoutRange, BreakEntry, ScheduleEntry},
};
use shared::error::AppError;
use sqlx::types::chrono::{NaiveDate, NaiveTime};

// 曜日は 0 = 日曜日の SMALLINT で保存する

#[derive(sqlx::FromRow)]
pub struct ScheduleEntryRow {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_working_day: bool,
}

impl TryFrom<ScheduleEntryRow> for ScheduleEntry {
    type Error = AppError;

    fn try_from(value: ScheduleEntryRow) -> Result<Self, Self::Error> {
        let ScheduleEntryRow {
            day_of_week,
            start_time,
            end_time,
            is_working_day,
        } = value;
        let day_of_week = weekday_from_number(day_of_week).ok_or_else(|| {
            AppError::ConversionEntityError(format!("不正な曜日番号です：{day_of_week}"))
        })?;
        Ok(ScheduleEntry {
            day_of_week,
            start_time,
            end_time,
            is_working_day,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct BreakEntryRow {
    pub day_of_week: i16,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
}

impl TryFrom<BreakEntryRow> for BreakEntry {
    type Error = AppError;

    fn try_from(value: BreakEntryRow) -> Result<Self, Self::Error> {
        let BreakEntryRow {
            day_of_week,
            break_start,
            break_end,
        } = value;
        let day_of_week = weekday_from_number(day_of_week).ok_or_else(|| {
            AppError::ConversionEntityError(format!("不正な曜日番号です：{day_of_week}"))
        })?;
        Ok(BreakEntry {
            day_of_week,
            break_start,
            break_end,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct BlockoutRow {
    pub stylist_id: StylistId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<BlockoutRow> for BlockoutRange {
    fn from(value: BlockoutRow) -> Self {
        let BlockoutRow {
            stylist_id,
            start_date,
            end_date,
        } = value;
        BlockoutRange {
            stylist_id,
            start_date,
            end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn schedule_entry_row_converts_weekday_number() {
        let row = ScheduleEntryRow {
            day_of_week: 1,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            is_working_day: true,
        };
        let entry = ScheduleEntry::try_from(row).unwrap();
        assert_eq!(entry.day_of_week, Weekday::Mon);
    }

    #[test]
    fn out_of_range_weekday_number_is_rejected() {
        let row = BreakEntryRow {
            day_of_week: 9,
            break_start: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            break_end: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        };
        assert!(matches!(
            BreakEntry::try_from(row),
            Err(AppError::ConversionEntityError(_))
        ));
    }
}
