//! Read-only aggregation over completed sessions and habit logs.
//!
//! Pure, stateless functions. Completed sessions are the sole study-time
//! input; records in any other lifecycle state are ignored even if a caller
//! passes them in, so scheduled or active sessions can never leak into
//! historical statistics.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::date::calc_streak;
use crate::records::{Habit, HabitLog, Resource, Task};
use crate::session::{SessionStatus, StudySession};

/// Label used when a session's linked resource no longer exists.
pub const UNKNOWN_RESOURCE: &str = "Unknown";

fn completed_only(sessions: &[StudySession]) -> impl Iterator<Item = &StudySession> {
    sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
}

fn minutes_of(session: &StudySession) -> u64 {
    u64::from(session.duration.unwrap_or(0))
}

/// Rounds hours to two decimals for chart series.
fn to_hours(minutes: u64) -> f64 {
    #[expect(clippy::cast_precision_loss, reason = "minute totals are user-scale")]
    let hours = minutes as f64 / 60.0;
    (hours * 100.0).round() / 100.0
}

/// Total study minutes across all completed sessions.
#[must_use]
pub fn total_minutes(sessions: &[StudySession]) -> u64 {
    completed_only(sessions).map(minutes_of).sum()
}

/// Study minutes on one calendar day.
#[must_use]
pub fn minutes_on(sessions: &[StudySession], day: NaiveDate) -> u64 {
    completed_only(sessions)
        .filter(|s| s.date == Some(day))
        .map(minutes_of)
        .sum()
}

/// Study minutes across a set of days (e.g. the last seven).
#[must_use]
pub fn minutes_in_window(sessions: &[StudySession], days: &[NaiveDate]) -> u64 {
    days.iter().map(|&d| minutes_on(sessions, d)).sum()
}

/// Hours per day for a chart series, two-decimal rounded, one entry per day.
#[must_use]
pub fn daily_hours(sessions: &[StudySession], days: &[NaiveDate]) -> Vec<f64> {
    days.iter()
        .map(|&d| to_hours(minutes_on(sessions, d)))
        .collect()
}

/// Hours per `(year, month)` for a chart series, two-decimal rounded.
#[must_use]
pub fn monthly_hours(sessions: &[StudySession], months: &[(i32, u32)]) -> Vec<f64> {
    months
        .iter()
        .map(|&(year, month)| {
            let minutes: u64 = completed_only(sessions)
                .filter(|s| {
                    s.date
                        .is_some_and(|d| d.year() == year && d.month() == month)
                })
                .map(minutes_of)
                .sum();
            to_hours(minutes)
        })
        .collect()
}

/// Minute totals per subject, sorted descending, top `k`.
///
/// Ties break alphabetically so the ordering is stable.
#[must_use]
pub fn minutes_by_subject(sessions: &[StudySession], k: usize) -> Vec<(String, u64)> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for session in completed_only(sessions) {
        *totals.entry(session.subject.as_str()).or_default() += minutes_of(session);
    }
    top_k(totals, k)
}

/// Minute totals per linked resource, resolved to display titles, sorted
/// descending, top `k`. Dangling resource IDs resolve to [`UNKNOWN_RESOURCE`].
#[must_use]
pub fn minutes_by_resource(
    sessions: &[StudySession],
    resources: &[Resource],
    k: usize,
) -> Vec<(String, u64)> {
    let mut totals: HashMap<String, u64> = HashMap::new();
    for session in completed_only(sessions) {
        let Some(resource_id) = &session.linked_resource_id else {
            continue;
        };
        let title = resources
            .iter()
            .find(|r| &r.id == resource_id)
            .map_or(UNKNOWN_RESOURCE, |r| r.title.as_str());
        *totals.entry(title.to_string()).or_default() += minutes_of(session);
    }
    top_k(totals, k)
}

fn top_k<K: Into<String> + Ord>(totals: HashMap<K, u64>, k: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(K, u64)> = totals.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(k);
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Percent of habits with a log on `day`, rounded to the nearest percent.
/// Zero when there are no habits.
#[must_use]
pub fn habit_rate_on(habits: &[Habit], logs: &[HabitLog], day: NaiveDate) -> u32 {
    if habits.is_empty() {
        return 0;
    }
    let done = habits
        .iter()
        .filter(|h| logs.iter().any(|l| l.habit_id == h.id && l.date == day))
        .count();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "percentages are in [0, 100]"
    )]
    let pct = (done as f64 / habits.len() as f64 * 100.0).round() as u32;
    pct
}

/// The best current streak across all habits, measured back from `today`.
#[must_use]
pub fn best_streak(habits: &[Habit], logs: &[HabitLog], today: NaiveDate) -> u32 {
    habits
        .iter()
        .map(|habit| {
            let dates: Vec<NaiveDate> = logs
                .iter()
                .filter(|l| l.habit_id == habit.id)
                .map(|l| l.date)
                .collect();
            calc_streak(&dates, today)
        })
        .max()
        .unwrap_or(0)
}

/// Count of tasks not yet completed.
#[must_use]
pub fn pending_tasks(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| !t.completed).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records;
    use crate::store::MemoryStore;
    use crate::types::ResourceId;
    use chrono::{DateTime, TimeZone, Utc};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    fn completed(subject: &str, day: NaiveDate, minutes: u32) -> StudySession {
        let mut s = StudySession::ad_hoc(subject, now());
        s.status = SessionStatus::Completed;
        s.date = Some(day);
        s.duration = Some(minutes);
        s.duration_seconds = Some(f64::from(minutes) * 60.0);
        s.completed_at = Some(now());
        s
    }

    #[test]
    fn non_completed_sessions_contribute_nothing() {
        let scheduled = StudySession::scheduled("algebra", d(6, 2), Some(500), now());
        let active = StudySession::ad_hoc("algebra", now());
        let real = completed("algebra", d(6, 2), 30);
        let sessions = vec![scheduled, active, real];

        assert_eq!(total_minutes(&sessions), 30);
        assert_eq!(minutes_on(&sessions, d(6, 2)), 30);
        assert_eq!(minutes_by_subject(&sessions, 10), [("algebra".into(), 30)]);
    }

    #[test]
    fn daily_hours_round_to_two_decimals() {
        let sessions = vec![completed("a", d(6, 1), 50), completed("b", d(6, 2), 90)];
        let days = [d(6, 1), d(6, 2), d(6, 3)];
        assert_eq!(daily_hours(&sessions, &days), [0.83, 1.5, 0.0]);
    }

    #[test]
    fn monthly_hours_bucket_by_year_and_month() {
        let sessions = vec![
            completed("a", d(5, 31), 60),
            completed("a", d(6, 1), 30),
            completed("a", d(6, 15), 30),
        ];
        let months = [(2025, 5), (2025, 6)];
        assert_eq!(monthly_hours(&sessions, &months), [1.0, 1.0]);
    }

    #[test]
    fn subjects_sort_descending_and_slice_top_k() {
        let sessions = vec![
            completed("algebra", d(6, 1), 10),
            completed("physics", d(6, 1), 50),
            completed("algebra", d(6, 2), 25),
            completed("history", d(6, 2), 5),
        ];
        let top = minutes_by_subject(&sessions, 2);
        assert_eq!(top, [("physics".into(), 50), ("algebra".into(), 35)]);
    }

    #[test]
    fn dangling_resource_ids_render_unknown() {
        let store = MemoryStore::new();
        let resource = records::add_resource(
            &store,
            records::Resource {
                id: ResourceId::generate(),
                title: "calculus text".to_string(),
                kind: "book".to_string(),
                url: None,
                progress: 0,
                current_page: None,
                total_pages: None,
                created_at: now(),
            },
        );

        let mut linked = completed("math", d(6, 1), 40);
        linked.linked_resource_id = Some(resource.id.clone());
        let mut dangling = completed("math", d(6, 1), 15);
        dangling.linked_resource_id = Some(ResourceId::new("deleted").unwrap());

        let resources = records::resources(&store);
        let totals = minutes_by_resource(&[linked, dangling], &resources, 10);
        assert_eq!(
            totals,
            [
                ("calculus text".into(), 40),
                (UNKNOWN_RESOURCE.into(), 15)
            ]
        );
    }

    #[test]
    fn habit_rate_rounds_and_handles_empty() {
        let store = MemoryStore::new();
        assert_eq!(habit_rate_on(&[], &[], d(6, 2)), 0);

        let a = records::add_habit(&store, "reading", now());
        let _b = records::add_habit(&store, "running", now());
        let _c = records::add_habit(&store, "writing", now());
        records::toggle_habit_log(&store, &a.id, d(6, 2), now());

        let habits = records::habits(&store);
        let logs = records::habit_logs(&store);
        // 1 of 3 => 33%
        assert_eq!(habit_rate_on(&habits, &logs, d(6, 2)), 33);
        assert_eq!(habit_rate_on(&habits, &logs, d(6, 3)), 0);
    }

    #[test]
    fn best_streak_takes_the_maximum_over_habits() {
        let store = MemoryStore::new();
        let a = records::add_habit(&store, "reading", now());
        let b = records::add_habit(&store, "running", now());
        let today = d(6, 3);
        for day in [d(6, 3), d(6, 2), d(6, 1)] {
            records::toggle_habit_log(&store, &a.id, day, now());
        }
        records::toggle_habit_log(&store, &b.id, d(6, 3), now());

        let habits = records::habits(&store);
        let logs = records::habit_logs(&store);
        assert_eq!(best_streak(&habits, &logs, today), 3);
    }

    #[test]
    fn pending_tasks_counts_incomplete() {
        let store = MemoryStore::new();
        let t = records::add_task(&store, "essay", None, now());
        records::add_task(&store, "problem set", None, now());
        records::toggle_task(&store, &t.id, now());
        assert_eq!(pending_tasks(&records::tasks(&store)), 1);
    }
}
