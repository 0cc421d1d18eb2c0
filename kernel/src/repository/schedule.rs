use crate::model::{
    id::StylistId,
    schedule::{
        event::{UpdateDailyBreaks, UpdateWeeklySchedule, UpsertBlockout},
        BlockoutRange, BreakEntry, WeeklySchedule,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    // 週間スケジュールをスタッフ単位で全置き換えする
    async fn update_weekly(&self, event: UpdateWeeklySchedule) -> AppResult<()>;
    // 固定休憩をスタッフ単位で全置き換えする
    async fn update_breaks(&self, event: UpdateDailyBreaks) -> AppResult<()>;
    // 休業期間を登録する（スタッフごとに 1 件、書き込み時に置き換え）
    async fn upsert_blockout(&self, event: UpsertBlockout) -> AppResult<()>;
    async fn find_weekly(&self, stylist_id: StylistId) -> AppResult<Option<WeeklySchedule>>;
    async fn find_breaks(&self, stylist_id: StylistId) -> AppResult<Vec<BreakEntry>>;
    async fn find_blockout(&self, stylist_id: StylistId) -> AppResult<Option<BlockoutRange>>;
}
