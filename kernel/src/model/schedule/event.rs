use crate::model::id::StylistId;
use crate::model::schedule::{BreakEntry, ScheduleEntry};
use chrono::NaiveDate;
use derive_new::new;

// スケジュール系のイベントはいずれもスタッフ単位の全置き換えである

#[derive(new)]
pub struct UpdateWeeklySchedule {
    pub stylist_id: StylistId,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(new)]
pub struct UpdateDailyBreaks {
    pub stylist_id: StylistId,
    pub entries: Vec<BreakEntry>,
}

#[derive(new)]
pub struct UpsertBlockout {
    pub stylist_id: StylistId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
