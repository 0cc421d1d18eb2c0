use chrono::{NaiveDate, NaiveTime};
use kernel::model::{
    client::event::UpsertClient,
    id::{ClientId, ServiceId, StylistId},
    schedule::{
        event::{UpdateDailyBreaks, UpdateWeeklySchedule, UpsertBlockout},
        weekday_from_number, BreakEntry, ScheduleEntry,
    },
    service::event::UpsertService,
    stylist::event::UpsertStylist,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use shared::error::{AppError, AppResult};
use uuid::Uuid;

// 連携元システムが発行するイベントの形。
// フィールド名は大文字小文字を区別せずに照合し、未知のフィールドは無視する。
// そのためキーを小文字へ正規化してから読み取る

/// ペイロードのキーを小文字へ正規化した上でデシリアライズする
pub fn parse_event<T: DeserializeOwned>(payload: &[u8]) -> AppResult<T> {
    let value: Value = serde_json::from_slice(payload)?;
    Ok(serde_json::from_value(lowercase_keys(value))?)
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), lowercase_keys(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// イベントに適用方法を指示する action フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EventAction {
    #[serde(alias = "CREATED", alias = "created")]
    Created,
    #[serde(alias = "UPDATED", alias = "updated")]
    Updated,
    #[serde(
        alias = "INACTIVATED",
        alias = "inactivated",
        alias = "Inactivated",
        alias = "DEACTIVATED",
        alias = "deactivated"
    )]
    Deactivated,
    // 連携元では削除イベントの中身が未実装のため、受信しても何も適用しない
    #[serde(
        alias = "ELIMINADO",
        alias = "eliminado",
        alias = "Eliminado",
        alias = "REMOVED",
        alias = "removed"
    )]
    Removed,
}

impl EventAction {
    pub fn is_upsert(self) -> bool {
        matches!(self, EventAction::Created | EventAction::Updated)
    }
}

#[derive(Debug, Deserialize)]
pub struct ServiceEvent {
    pub id: ServiceId,
    pub name: String,
    #[serde(rename = "durationminutes")]
    pub duration_minutes: i32,
    // 価格とカテゴリーはこのサービスでは使わないが、イベントには含まれる
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, rename = "categoryid")]
    pub category_id: Option<Uuid>,
    pub available: bool,
    pub action: EventAction,
}

impl ServiceEvent {
    pub fn into_upsert(self) -> UpsertService {
        UpsertService::new(self.id, self.name, self.duration_minutes, self.available)
    }
}

#[derive(Debug, Deserialize)]
pub struct StylistEvent {
    pub id: StylistId,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "externalidentityid")]
    pub external_identity_id: Uuid,
    pub active: bool,
    pub action: EventAction,
}

impl StylistEvent {
    pub fn into_upsert(self) -> UpsertStylist {
        UpsertStylist::new(
            self.id,
            self.full_name,
            self.external_identity_id,
            self.active,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ClientEvent {
    #[serde(rename = "externalidentityid")]
    pub external_identity_id: ClientId,
    pub username: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    pub action: EventAction,
}

impl ClientEvent {
    pub fn into_upsert(self) -> UpsertClient {
        UpsertClient::new(self.external_identity_id, self.username, self.full_name)
    }
}

// スケジュール系のイベント。連携元のフィールド名は providerId のままである

#[derive(Debug, Deserialize)]
pub struct BaseScheduleEvent {
    #[serde(rename = "providerid")]
    pub stylist_id: StylistId,
    #[serde(rename = "weeklyentries")]
    pub weekly_entries: Vec<WeeklyEntryPayload>,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyEntryPayload {
    #[serde(rename = "dayofweek")]
    pub day_of_week: i16,
    #[serde(rename = "starttime")]
    pub start_time: NaiveTime,
    #[serde(rename = "endtime")]
    pub end_time: NaiveTime,
    #[serde(rename = "isworkingday")]
    pub is_working_day: bool,
}

impl BaseScheduleEvent {
    pub fn into_update(self) -> AppResult<UpdateWeeklySchedule> {
        let entries = self
            .weekly_entries
            .into_iter()
            .map(|entry| {
                let day_of_week = weekday_from_number(entry.day_of_week).ok_or_else(|| {
                    AppError::ConversionEntityError(format!(
                        "不正な曜日番号です：{}",
                        entry.day_of_week
                    ))
                })?;
                Ok(ScheduleEntry {
                    day_of_week,
                    start_time: entry.start_time,
                    end_time: entry.end_time,
                    is_working_day: entry.is_working_day,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(UpdateWeeklySchedule::new(self.stylist_id, entries))
    }
}

#[derive(Debug, Deserialize)]
pub struct DailyBreaksEvent {
    #[serde(rename = "providerid")]
    pub stylist_id: StylistId,
    #[serde(rename = "breakentries")]
    pub break_entries: Vec<BreakEntryPayload>,
}

#[derive(Debug, Deserialize)]
pub struct BreakEntryPayload {
    #[serde(rename = "dayofweek")]
    pub day_of_week: i16,
    #[serde(rename = "starttime")]
    pub start_time: NaiveTime,
    #[serde(rename = "endtime")]
    pub end_time: NaiveTime,
}

impl DailyBreaksEvent {
    pub fn into_update(self) -> AppResult<UpdateDailyBreaks> {
        let entries = self
            .break_entries
            .into_iter()
            .map(|entry| {
                let day_of_week = weekday_from_number(entry.day_of_week).ok_or_else(|| {
                    AppError::ConversionEntityError(format!(
                        "不正な曜日番号です：{}",
                        entry.day_of_week
                    ))
                })?;
                Ok(BreakEntry {
                    day_of_week,
                    break_start: entry.start_time,
                    break_end: entry.end_time,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(UpdateDailyBreaks::new(self.stylist_id, entries))
    }
}

#[derive(Debug, Deserialize)]
pub struct BlockoutEvent {
    #[serde(rename = "providerid")]
    pub stylist_id: StylistId,
    #[serde(rename = "startdate")]
    pub start_date: NaiveDate,
    #[serde(rename = "enddate")]
    pub end_date: NaiveDate,
    pub action: EventAction,
}

impl BlockoutEvent {
    pub fn into_upsert(self) -> UpsertBlockout {
        UpsertBlockout::new(self.stylist_id, self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_event_accepts_camel_case_fields() {
        let payload = r#"{
            "id": "0e3d6f1c-43f4-44fc-8a4e-bf09e2a4a2f5",
            "name": "カット",
            "durationMinutes": 45,
            "price": 4500.0,
            "categoryId": "9bfb8d9c-5f93-4a08-8191-2c5c1e5a6e29",
            "available": true,
            "action": "CREATED"
        }"#;
        let event: ServiceEvent = parse_event(payload.as_bytes()).unwrap();
        assert_eq!(event.duration_minutes, 45);
        assert!(event.available);
        assert_eq!(event.action, EventAction::Created);
    }

    #[test]
    fn service_event_accepts_pascal_case_fields() {
        let payload = r#"{
            "Id": "0e3d6f1c-43f4-44fc-8a4e-bf09e2a4a2f5",
            "Name": "カラー",
            "DurationMinutes": 90,
            "Available": false,
            "Action": "Updated"
        }"#;
        let event: ServiceEvent = parse_event(payload.as_bytes()).unwrap();
        assert_eq!(event.name, "カラー");
        assert!(!event.available);
        assert_eq!(event.action, EventAction::Updated);
    }

    #[test]
    fn field_names_match_regardless_of_case() {
        // 全て大文字のキーでも読み取れること
        let payload = r#"{
            "ID": "0e3d6f1c-43f4-44fc-8a4e-bf09e2a4a2f5",
            "NAME": "パーマ",
            "DURATIONMINUTES": 120,
            "AVAILABLE": true,
            "ACTION": "CREATED"
        }"#;
        let event: ServiceEvent = parse_event(payload.as_bytes()).unwrap();
        assert_eq!(event.name, "パーマ");
        assert_eq!(event.duration_minutes, 120);

        // 混在したキーも同様
        let payload = r#"{
            "providerID": "52c1c9e2-0d2d-4b1a-9b52-7b8a8a3ad102",
            "STARTDATE": "2026-09-01",
            "endDate": "2026-09-07",
            "action": "CREATED"
        }"#;
        let event: BlockoutEvent = parse_event(payload.as_bytes()).unwrap();
        assert_eq!(
            event.start_date,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let payload = r#"{
            "id": "0e3d6f1c-43f4-44fc-8a4e-bf09e2a4a2f5",
            "name": "パーマ",
            "durationMinutes": 120,
            "available": true,
            "action": "CREATED",
            "somethingNew": {"nested": true}
        }"#;
        assert!(parse_event::<ServiceEvent>(payload.as_bytes()).is_ok());
    }

    #[test]
    fn action_aliases_map_to_the_same_operation() {
        for raw in ["\"INACTIVATED\"", "\"DEACTIVATED\"", "\"inactivated\""] {
            let action: EventAction = serde_json::from_str(raw).unwrap();
            assert_eq!(action, EventAction::Deactivated);
            assert!(!action.is_upsert());
        }
        let action: EventAction = serde_json::from_str("\"ELIMINADO\"").unwrap();
        assert_eq!(action, EventAction::Removed);
    }

    #[test]
    fn base_schedule_event_converts_weekday_numbers() {
        let payload = r#"{
            "providerId": "52c1c9e2-0d2d-4b1a-9b52-7b8a8a3ad102",
            "weeklyEntries": [
                {"dayOfWeek": 1, "startTime": "09:00:00", "endTime": "18:00:00", "isWorkingDay": true},
                {"DayOfWeek": 0, "StartTime": "00:00:00", "EndTime": "00:00:00", "IsWorkingDay": false}
            ]
        }"#;
        let event: BaseScheduleEvent = parse_event(payload.as_bytes()).unwrap();
        let update = event.into_update().unwrap();
        assert_eq!(update.entries.len(), 2);
        assert_eq!(update.entries[0].day_of_week, chrono::Weekday::Mon);
        assert!(!update.entries[1].is_working_day);
    }

    #[test]
    fn invalid_weekday_number_is_a_conversion_error() {
        let payload = r#"{
            "providerId": "52c1c9e2-0d2d-4b1a-9b52-7b8a8a3ad102",
            "weeklyEntries": [
                {"dayOfWeek": 8, "startTime": "09:00:00", "endTime": "18:00:00", "isWorkingDay": true}
            ]
        }"#;
        let event: BaseScheduleEvent = parse_event(payload.as_bytes()).unwrap();
        assert!(matches!(
            event.into_update(),
            Err(AppError::ConversionEntityError(_))
        ));
    }

    #[test]
    fn blockout_event_parses_date_range_and_action() {
        let payload = r#"{
            "ProviderId": "52c1c9e2-0d2d-4b1a-9b52-7b8a8a3ad102",
            "StartDate": "2026-09-01",
            "EndDate": "2026-09-07",
            "Action": "CREATED"
        }"#;
        let event: BlockoutEvent = parse_event(payload.as_bytes()).unwrap();
        assert!(event.action.is_upsert());
        let upsert = event.into_upsert();
        assert_eq!(
            upsert.end_date,
            NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()
        );
    }
}
