use crate::model::{
    id::{ClientId, ReservationId, StylistId},
    reservation::{
        event::{CreateReservation, RescheduleReservation},
        Reservation, ReservationStatus,
    },
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Weekday};
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 予約を作成する（検証パイプラインを含む）
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    // 予約を別の日時へ変更する。ステータスは pending に戻る
    async fn reschedule(&self, event: RescheduleReservation) -> AppResult<Reservation>;
    // 予約をキャンセルする（冪等なステータス遷移）
    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<()>;
    // 予約のステータスを変更する
    async fn change_status(
        &self,
        reservation_id: ReservationId,
        new_status: ReservationStatus,
    ) -> AppResult<()>;
    // 予約 ID から予約を取得する
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation>;
    // 顧客に紐づく予約一覧を取得する
    async fn find_by_client(&self, client_id: ClientId) -> AppResult<Vec<Reservation>>;
    // スタッフの指定日の予約一覧を取得する
    async fn find_by_stylist_on(
        &self,
        stylist_id: StylistId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>>;
    // スタッフの日付範囲内の予約一覧を取得する
    async fn find_by_stylist_between(
        &self,
        stylist_id: StylistId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Reservation>>;

    // 以下は連携元システムが破壊的変更の前に問い合わせる読み取り専用クエリ。
    // 回答はあくまで参考情報であり、この側では何もロックしない
    async fn has_future_reservations(&self, stylist_id: StylistId) -> AppResult<bool>;
    async fn has_reservations_on_weekday(
        &self,
        stylist_id: StylistId,
        day_of_week: Weekday,
    ) -> AppResult<bool>;
    async fn has_reservations_in_date_range(
        &self,
        stylist_id: StylistId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<bool>;
    async fn has_reservations_in_time_range(
        &self,
        stylist_id: StylistId,
        day_of_week: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> AppResult<bool>;
}
