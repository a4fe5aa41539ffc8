//! Priority-based rescheduling of calendar events.
//!
//! Events are packed back to back from the start of the selected range, most
//! important first, with a fixed buffer between them. `plan_reschedule` only
//! computes the moves; `reschedule_by_priority` fetches and applies them.

use std::cmp::Reverse;

use chrono::{DateTime, Duration, NaiveTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{info, instrument, warn};

use shared_config::AppConfig;

use crate::error::CalendarError;
use crate::models::{
    CalendarEvent, EventDateTime, EventPriority, ListEventsQuery, PlannedMove, PriorityOrder,
    RescheduleRequest, RescheduleResult, RescheduledEvent, TimeRange,
};
use crate::services::client::CalendarClient;

pub const WORK_START_HOUR: u32 = 9;
pub const WORK_END_HOUR: u32 = 17;
pub const BUFFER_MINUTES: i64 = 15;

pub fn extract_priority(event: &CalendarEvent) -> EventPriority {
    let description = event.description.as_deref().unwrap_or_default().to_lowercase();
    let summary = event.summary.to_lowercase();

    if description.contains("high priority") || description.contains("urgent") || summary.contains("urgent") {
        EventPriority::High
    } else if description.contains("medium priority") || description.contains("important") {
        EventPriority::Medium
    } else {
        EventPriority::Low
    }
}

fn local_at(tz: &Tz, day: chrono::NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&day.and_time(time)).earliest()
}

/// Window to reschedule, in the zone of `now`.
pub fn time_range(range: TimeRange, now: DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    let tz = now.timezone();
    match range {
        TimeRange::Today => {
            let day = now.date_naive();
            let start = local_at(&tz, day, NaiveTime::MIN).unwrap_or(now);
            let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
                .and_then(|t| local_at(&tz, day, t))
                .unwrap_or(now);
            (start, end)
        }
        TimeRange::Week => (now, now + Duration::days(7)),
        TimeRange::Month => (now, now + Duration::days(30)),
    }
}

/// Before opening time moves to 09:00 the same day; at or after closing moves
/// to 09:00 the next day.
pub fn adjust_to_working_hours(time: DateTime<Tz>) -> DateTime<Tz> {
    let tz = time.timezone();
    let day = match time.hour() {
        h if h < WORK_START_HOUR => Some(time.date_naive()),
        h if h >= WORK_END_HOUR => time.date_naive().succ_opt(),
        _ => return time,
    };

    day.zip(NaiveTime::from_hms_opt(WORK_START_HOUR, 0, 0))
        .and_then(|(day, opening)| local_at(&tz, day, opening))
        .unwrap_or(time)
}

/// Compute new slots for `events` starting at `range_start`.
///
/// Only events whose start actually changes are returned. All-day events and
/// events without an id are left where they are.
pub fn plan_reschedule(
    events: &[CalendarEvent],
    range_start: DateTime<Tz>,
    order: PriorityOrder,
    respect_working_hours: bool,
) -> Vec<PlannedMove> {
    let mut candidates: Vec<(EventPriority, &CalendarEvent, DateTime<chrono::FixedOffset>, Duration)> = events
        .iter()
        .filter(|event| event.id.is_some())
        .filter_map(|event| {
            let start = event.start.instant()?;
            let end = event.end.instant().unwrap_or(start);
            Some((extract_priority(event), event, start, end - start))
        })
        .collect();

    match order {
        PriorityOrder::HighToLow => candidates.sort_by_key(|(priority, ..)| Reverse(*priority)),
        PriorityOrder::LowToHigh => candidates.sort_by_key(|(priority, ..)| *priority),
    }

    let mut cursor = range_start;
    let mut moves = Vec::new();

    for (priority, event, old_start, duration) in candidates {
        if respect_working_hours {
            cursor = adjust_to_working_hours(cursor);
        }

        let new_start = cursor.with_timezone(&cursor.offset().fix());
        let new_end = new_start + duration;

        if new_start.timestamp_millis() != old_start.timestamp_millis() {
            moves.push(PlannedMove {
                event: event.clone(),
                priority,
                new_start,
                new_end,
            });
        }

        cursor = (cursor + duration) + Duration::minutes(BUFFER_MINUTES);
    }

    moves
}

/// Write each planned move back to the calendar. Stops at the first failure.
pub async fn apply_moves(
    client: &CalendarClient,
    moves: Vec<PlannedMove>,
    time_zone: &str,
) -> Result<Vec<RescheduledEvent>, CalendarError> {
    let mut applied = Vec::with_capacity(moves.len());

    for planned in moves {
        let Some(event_id) = planned.event.id.clone() else {
            continue;
        };

        let updated = CalendarEvent {
            start: EventDateTime::timed(planned.new_start.to_rfc3339(), Some(time_zone)),
            end: EventDateTime::timed(planned.new_end.to_rfc3339(), Some(time_zone)),
            ..planned.event.clone()
        };

        if let Err(e) = client.update_event(&event_id, &updated).await {
            warn!("Rescheduling stopped at event {}: {}", event_id, e);
            return Err(CalendarError::PartialReschedule {
                applied: applied.len(),
                message: e.to_string(),
            });
        }

        applied.push(RescheduledEvent {
            id: event_id,
            summary: planned.event.summary.clone(),
            priority: planned.priority,
            old_time: planned.event.start.display(),
            new_time: planned.new_start.to_rfc3339(),
        });
    }

    Ok(applied)
}

#[instrument(skip(config, client))]
pub async fn reschedule_by_priority(
    config: &AppConfig,
    client: &CalendarClient,
    request: &RescheduleRequest,
) -> Result<RescheduleResult, CalendarError> {
    let tz = config.clinic_tz().unwrap_or(Tz::UTC);
    let now = Utc::now().with_timezone(&tz);
    let (start, end) = time_range(request.time_range, now);

    let events = client
        .list_events(&ListEventsQuery {
            time_min: Some(start.to_rfc3339()),
            time_max: Some(end.to_rfc3339()),
            max_results: None,
        })
        .await?;

    let moves = plan_reschedule(&events, start, request.priority_order, request.respect_working_hours);
    let rescheduled_events = apply_moves(client, moves, tz.name()).await?;

    info!("Rescheduled {} of {} events", rescheduled_events.len(), events.len());

    Ok(RescheduleResult {
        message: format!("Rescheduled {} events by priority", rescheduled_events.len()),
        rescheduled_events,
        total_events: events.len(),
    })
}
