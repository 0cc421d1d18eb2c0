use crate::model::id::{ReservationId, ServiceId, StylistId};
use crate::model::schedule::{BlockoutRange, BreakEntry, WeeklySchedule};
use crate::model::service::Service;
use crate::model::stylist::Stylist;
use chrono::{Datelike, NaiveDate, NaiveTime};

/// 空き判定の対象となる候補枠
#[derive(Debug, Clone, Copy)]
pub struct CandidateSlot {
    pub reserved_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// 既存予約のうち衝突判定に必要な部分だけを持つ型
#[derive(Debug, Clone, Copy)]
pub struct BookedSlot {
    pub reservation_id: ReservationId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// 空き判定に失敗した理由。呼び出し側でクライアントエラーに変換する
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlotRejection {
    #[error("スタッフは {start_date} から {end_date} まで休業中のため予約できません。")]
    FullyBlockedOut {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    #[error("スタッフの基本スケジュールが登録されていません。")]
    NoBaseSchedule,
    #[error("スタッフはこの曜日は勤務していません。")]
    NotWorkingDay,
    #[error("営業時間外です（勤務時間：{open}〜{close}）。")]
    OutsideWorkingHours { open: NaiveTime, close: NaiveTime },
    #[error("休憩時間（{break_start}〜{break_end}）と重複しています。")]
    OverlapsBreak {
        break_start: NaiveTime,
        break_end: NaiveTime,
    },
    #[error("既存の予約（{start}〜{end}）と重複しています。")]
    Conflict { start: NaiveTime, end: NaiveTime },
}

/// 参照確認に失敗した理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceRejection {
    #[error("メニュー（{0}）が見つかりませんでした。")]
    ServiceNotFound(ServiceId),
    #[error("メニュー（{0}）は現在利用できません。")]
    ServiceUnavailable(ServiceId),
    #[error("スタッフ（{0}）が見つかりませんでした。")]
    StylistNotFound(StylistId),
    #[error("スタッフ（{0}）は現在予約を受け付けていません。")]
    StylistInactive(StylistId),
}

/// 空き判定の前段となる参照確認。
/// メニュー→スタッフの順に調べ、最初に失敗した理由を返す。
/// 通過した場合は所要時間の算出に使うメニューを返す
pub fn check_references<'a>(
    service_id: ServiceId,
    stylist_id: StylistId,
    service: Option<&'a Service>,
    stylist: Option<&'a Stylist>,
) -> Result<&'a Service, ReferenceRejection> {
    let Some(service) = service else {
        return Err(ReferenceRejection::ServiceNotFound(service_id));
    };
    if !service.is_available {
        return Err(ReferenceRejection::ServiceUnavailable(service_id));
    }
    let Some(stylist) = stylist else {
        return Err(ReferenceRejection::StylistNotFound(stylist_id));
    };
    if !stylist.is_active {
        return Err(ReferenceRejection::StylistInactive(stylist_id));
    }
    Ok(service)
}

/// `[start, end)` の半開区間同士の重なり判定
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// 候補枠が予約可能かを判定する。
/// 粗い条件（休業期間）から順に調べ、最後に既存予約との衝突を確認する。
/// 予約変更時は `exclude` に対象の予約 ID を渡すことで自分自身を除外する
pub fn check_slot(
    candidate: &CandidateSlot,
    blockout: Option<&BlockoutRange>,
    schedule: Option<&WeeklySchedule>,
    breaks: &[BreakEntry],
    existing: &[BookedSlot],
    exclude: Option<ReservationId>,
) -> Result<(), SlotRejection> {
    let day_of_week = candidate.reserved_date.weekday();

    // ① 休業期間（終日予約不可）の確認。両端を含む
    if let Some(range) = blockout {
        if range.contains(candidate.reserved_date) {
            return Err(SlotRejection::FullyBlockedOut {
                start_date: range.start_date,
                end_date: range.end_date,
            });
        }
    }

    // ② 基本スケジュールの確認
    let Some(schedule) = schedule else {
        return Err(SlotRejection::NoBaseSchedule);
    };
    let entry = match schedule.entry_for(day_of_week) {
        Some(entry) if entry.is_working_day => entry,
        _ => return Err(SlotRejection::NotWorkingDay),
    };
    // 日を跨ぐ候補（end <= start）も営業時間外として扱う
    if candidate.end_time <= candidate.start_time
        || candidate.start_time < entry.start_time
        || candidate.end_time > entry.end_time
    {
        return Err(SlotRejection::OutsideWorkingHours {
            open: entry.start_time,
            close: entry.end_time,
        });
    }

    // ③ 固定休憩の確認。該当曜日のすべてのエントリーを調べる
    for break_entry in breaks.iter().filter(|b| b.day_of_week == day_of_week) {
        if overlaps(
            candidate.start_time,
            candidate.end_time,
            break_entry.break_start,
            break_entry.break_end,
        ) {
            return Err(SlotRejection::OverlapsBreak {
                break_start: break_entry.break_start,
                break_end: break_entry.break_end,
            });
        }
    }

    // ④ 既存予約との衝突確認。予約変更時は自分自身を除外する
    let conflict = existing
        .iter()
        .filter(|slot| exclude != Some(slot.reservation_id))
        .find(|slot| {
            overlaps(
                candidate.start_time,
                candidate.end_time,
                slot.start_time,
                slot.end_time,
            )
        });
    if let Some(slot) = conflict {
        return Err(SlotRejection::Conflict {
            start: slot.start_time,
            end: slot.end_time,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::StylistId;
    use crate::model::reservation::attended_minutes;
    use crate::model::schedule::ScheduleEntry;
    use chrono::{Duration, Weekday};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2026-08-24 は月曜日
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    fn weekday_schedule(start: NaiveTime, end: NaiveTime) -> WeeklySchedule {
        WeeklySchedule {
            stylist_id: StylistId::new(),
            entries: vec![ScheduleEntry {
                day_of_week: Weekday::Mon,
                start_time: start,
                end_time: end,
                is_working_day: true,
            }],
        }
    }

    fn candidate(start: NaiveTime, duration_minutes: i32) -> CandidateSlot {
        let minutes = attended_minutes(duration_minutes);
        CandidateSlot {
            reserved_date: monday(),
            start_time: start,
            end_time: start + Duration::minutes(i64::from(minutes)),
        }
    }

    fn service(is_available: bool) -> Service {
        Service {
            service_id: ServiceId::new(),
            service_name: "カット".into(),
            duration_minutes: 45,
            is_available,
        }
    }

    fn stylist(is_active: bool) -> Stylist {
        Stylist {
            stylist_id: StylistId::new(),
            full_name: "山田 花子".into(),
            external_identity_id: uuid::Uuid::new_v4(),
            is_active,
        }
    }

    #[test]
    fn references_pass_when_service_and_stylist_are_usable() {
        let service = service(true);
        let stylist = stylist(true);
        let checked = check_references(
            service.service_id,
            stylist.stylist_id,
            Some(&service),
            Some(&stylist),
        )
        .unwrap();
        assert_eq!(checked.duration_minutes, 45);
    }

    #[test]
    fn missing_service_or_stylist_is_rejected() {
        let service = service(true);
        let stylist = stylist(true);

        assert_eq!(
            check_references(
                service.service_id,
                stylist.stylist_id,
                None,
                Some(&stylist)
            ),
            Err(ReferenceRejection::ServiceNotFound(service.service_id))
        );
        assert_eq!(
            check_references(service.service_id, stylist.stylist_id, Some(&service), None),
            Err(ReferenceRejection::StylistNotFound(stylist.stylist_id))
        );
    }

    #[test]
    fn deactivated_service_replica_rejects_booking() {
        // 利用不可イベントを適用済みのメニューでは予約できない
        let service = service(false);
        let stylist = stylist(true);
        assert_eq!(
            check_references(
                service.service_id,
                stylist.stylist_id,
                Some(&service),
                Some(&stylist)
            ),
            Err(ReferenceRejection::ServiceUnavailable(service.service_id))
        );
    }

    #[test]
    fn inactive_stylist_rejects_booking() {
        let service = service(true);
        let stylist = stylist(false);
        assert_eq!(
            check_references(
                service.service_id,
                stylist.stylist_id,
                Some(&service),
                Some(&stylist)
            ),
            Err(ReferenceRejection::StylistInactive(stylist.stylist_id))
        );
    }

    #[test]
    fn overlap_is_symmetric_and_reflexive() {
        let cases = [
            (time(10, 0), time(11, 0), time(10, 30), time(11, 30)),
            (time(10, 0), time(11, 0), time(11, 0), time(12, 0)),
            (time(9, 0), time(12, 0), time(10, 0), time(11, 0)),
            (time(8, 0), time(9, 0), time(9, 30), time(10, 0)),
        ];
        for (a_start, a_end, b_start, b_end) in cases {
            assert_eq!(
                overlaps(a_start, a_end, b_start, b_end),
                overlaps(b_start, b_end, a_start, a_end),
            );
        }
        // 空でない区間は自分自身と重なる
        assert!(overlaps(time(10, 0), time(11, 0), time(10, 0), time(11, 0)));
    }

    #[test]
    fn adjacent_intervals_do_not_overlap() {
        assert!(!overlaps(time(10, 0), time(11, 0), time(11, 0), time(12, 0)));
        assert!(!overlaps(time(11, 0), time(12, 0), time(10, 0), time(11, 0)));
    }

    #[test]
    fn bookable_slot_inside_working_hours() {
        // 月曜 09:00-18:00 勤務、休憩・休業・既存予約なしで 45 分メニューを 10:00 に予約
        let schedule = weekday_schedule(time(9, 0), time(18, 0));
        let candidate = candidate(time(10, 0), 45);
        assert_eq!(candidate.end_time, time(11, 0));
        assert_eq!(
            check_slot(&candidate, None, Some(&schedule), &[], &[], None),
            Ok(())
        );
    }

    #[test]
    fn slot_before_opening_is_rejected() {
        let schedule = weekday_schedule(time(9, 0), time(18, 0));
        let candidate = candidate(time(8, 30), 45);
        assert_eq!(
            check_slot(&candidate, None, Some(&schedule), &[], &[], None),
            Err(SlotRejection::OutsideWorkingHours {
                open: time(9, 0),
                close: time(18, 0),
            })
        );
    }

    #[test]
    fn slot_running_past_closing_is_rejected() {
        let schedule = weekday_schedule(time(9, 0), time(18, 0));
        let candidate = candidate(time(17, 30), 45);
        assert!(matches!(
            check_slot(&candidate, None, Some(&schedule), &[], &[], None),
            Err(SlotRejection::OutsideWorkingHours { .. })
        ));
    }

    #[test]
    fn slot_crossing_midnight_is_rejected() {
        let schedule = weekly_schedule_all_day();
        let candidate = CandidateSlot {
            reserved_date: monday(),
            start_time: time(23, 30),
            // NaiveTime の加算は日を跨ぐと巻き戻るため end < start になる
            end_time: time(0, 30),
        };
        assert!(matches!(
            check_slot(&candidate, None, Some(&schedule), &[], &[], None),
            Err(SlotRejection::OutsideWorkingHours { .. })
        ));
    }

    fn weekly_schedule_all_day() -> WeeklySchedule {
        weekday_schedule(time(0, 0), time(23, 59))
    }

    #[test]
    fn missing_schedule_and_non_working_day_are_rejected() {
        let candidate = candidate(time(10, 0), 45);
        assert_eq!(
            check_slot(&candidate, None, None, &[], &[], None),
            Err(SlotRejection::NoBaseSchedule)
        );

        // 該当曜日のエントリーがない
        let empty = WeeklySchedule {
            stylist_id: StylistId::new(),
            entries: vec![],
        };
        assert_eq!(
            check_slot(&candidate, None, Some(&empty), &[], &[], None),
            Err(SlotRejection::NotWorkingDay)
        );

        // エントリーはあるが休みの日
        let mut off_day = weekday_schedule(time(9, 0), time(18, 0));
        off_day.entries[0].is_working_day = false;
        assert_eq!(
            check_slot(&candidate, None, Some(&off_day), &[], &[], None),
            Err(SlotRejection::NotWorkingDay)
        );
    }

    #[test]
    fn slot_overlapping_fixed_break_is_rejected() {
        // 月曜 13:00-14:00 が休憩のとき、45 分メニューを 13:15 に予約しようとする
        let schedule = weekday_schedule(time(9, 0), time(18, 0));
        let breaks = [BreakEntry {
            day_of_week: Weekday::Mon,
            break_start: time(13, 0),
            break_end: time(14, 0),
        }];
        let candidate = candidate(time(13, 15), 45);
        assert_eq!(
            check_slot(&candidate, None, Some(&schedule), &breaks, &[], None),
            Err(SlotRejection::OverlapsBreak {
                break_start: time(13, 0),
                break_end: time(14, 0),
            })
        );
    }

    #[test]
    fn every_break_entry_is_checked() {
        let schedule = weekday_schedule(time(9, 0), time(18, 0));
        let breaks = [
            BreakEntry {
                day_of_week: Weekday::Mon,
                break_start: time(10, 0),
                break_end: time(10, 30),
            },
            BreakEntry {
                day_of_week: Weekday::Mon,
                break_start: time(15, 0),
                break_end: time(15, 30),
            },
        ];
        let candidate = candidate(time(14, 45), 45);
        assert_eq!(
            check_slot(&candidate, None, Some(&schedule), &breaks, &[], None),
            Err(SlotRejection::OverlapsBreak {
                break_start: time(15, 0),
                break_end: time(15, 30),
            })
        );
    }

    #[test]
    fn conflicting_reservation_is_reported_with_its_window() {
        // 既存予約 10:00-11:00 があるとき、10:30 開始はどの長さでも衝突する
        let schedule = weekday_schedule(time(9, 0), time(18, 0));
        let existing = [BookedSlot {
            reservation_id: ReservationId::new(),
            start_time: time(10, 0),
            end_time: time(11, 0),
        }];
        let candidate = candidate(time(10, 30), 15);
        assert_eq!(
            check_slot(&candidate, None, Some(&schedule), &[], &existing, None),
            Err(SlotRejection::Conflict {
                start: time(10, 0),
                end: time(11, 0),
            })
        );
    }

    #[test]
    fn reschedule_excludes_own_reservation() {
        // 自分の旧予約 10:00-11:00 は衝突扱いにしない
        let schedule = weekday_schedule(time(9, 0), time(18, 0));
        let own_id = ReservationId::new();
        let existing = [BookedSlot {
            reservation_id: own_id,
            start_time: time(10, 0),
            end_time: time(11, 0),
        }];
        let candidate = candidate(time(10, 0), 45);
        assert_eq!(
            check_slot(
                &candidate,
                None,
                Some(&schedule),
                &[],
                &existing,
                Some(own_id)
            ),
            Ok(())
        );

        // 他人の予約はこれまで通り衝突する
        assert!(matches!(
            check_slot(&candidate, None, Some(&schedule), &[], &existing, None),
            Err(SlotRejection::Conflict { .. })
        ));
    }

    #[test]
    fn blockout_takes_precedence_over_everything_else() {
        // 休業期間中はスケジュール・休憩の設定に関わらず拒否される
        let stylist_id = StylistId::new();
        let blockout = BlockoutRange {
            stylist_id,
            start_date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
        };
        let schedule = weekday_schedule(time(9, 0), time(18, 0));
        let candidate = candidate(time(10, 0), 45);
        assert_eq!(
            check_slot(
                &candidate,
                Some(&blockout),
                Some(&schedule),
                &[],
                &[],
                None
            ),
            Err(SlotRejection::FullyBlockedOut {
                start_date: blockout.start_date,
                end_date: blockout.end_date,
            })
        );

        // スケジュール未登録でも休業の方が先に報告される
        assert_eq!(
            check_slot(&candidate, Some(&blockout), None, &[], &[], None),
            Err(SlotRejection::FullyBlockedOut {
                start_date: blockout.start_date,
                end_date: blockout.end_date,
            })
        );
    }

    #[test]
    fn reschedule_to_free_slot_succeeds() {
        // 10:00-11:00 の予約を 14:30 へ移動する（他の衝突なし）
        let schedule = weekday_schedule(time(9, 0), time(18, 0));
        let own_id = ReservationId::new();
        let existing = [BookedSlot {
            reservation_id: own_id,
            start_time: time(10, 0),
            end_time: time(11, 0),
        }];
        let candidate = candidate(time(14, 30), 45);
        assert_eq!(
            check_slot(
                &candidate,
                None,
                Some(&schedule),
                &[],
                &existing,
                Some(own_id)
            ),
            Ok(())
        );
    }
}
