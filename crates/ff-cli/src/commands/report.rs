//! Report command: study-time series plus subject, resource, and habit
//! rollups. All study-time numbers come from completed sessions only.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;

use ff_core::date::{format_minutes, last_n_days, last_n_months};
use ff_core::{Store, Tracker, records, report};

const DAYS_SHOWN: u64 = 7;
const MONTHS_SHOWN: u32 = 6;
const TOP_SUBJECTS: usize = 8;
const TOP_RESOURCES: usize = 6;

/// Generates a 10-character progress bar.
fn progress_bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return "░░░░░░░░░░".to_string();
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "ratio is clamped to [0, 10] before the cast"
    )]
    let filled = ((value / max * 10.0).round().clamp(0.0, 10.0)) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

pub fn run<S: Store, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    monthly: bool,
    today: NaiveDate,
) -> Result<()> {
    let sessions = tracker.completed_sessions();
    let store = tracker.store();

    if monthly {
        let months = last_n_months(MONTHS_SHOWN, today);
        let hours = report::monthly_hours(&sessions, &months);
        let max = hours.iter().copied().fold(0.0_f64, f64::max);
        writeln!(writer, "Study hours, last {MONTHS_SHOWN} months")?;
        for ((year, month), value) in months.iter().zip(&hours) {
            writeln!(
                writer,
                "  {year}-{month:02}  {} {value:.2}h",
                progress_bar(*value, max)
            )?;
        }
    } else {
        let days = last_n_days(DAYS_SHOWN, today);
        let hours = report::daily_hours(&sessions, &days);
        let max = hours.iter().copied().fold(0.0_f64, f64::max);
        writeln!(writer, "Study hours, last {DAYS_SHOWN} days")?;
        for (day, value) in days.iter().zip(&hours) {
            writeln!(
                writer,
                "  {} {}  {} {value:.2}h",
                day.format("%a"),
                day,
                progress_bar(*value, max)
            )?;
        }
    }

    let subjects = report::minutes_by_subject(&sessions, TOP_SUBJECTS);
    if !subjects.is_empty() {
        let max = subjects[0].1;
        writeln!(writer, "\nBy subject")?;
        for (subject, minutes) in &subjects {
            #[expect(clippy::cast_precision_loss, reason = "minute totals are user-scale")]
            let ratio = (*minutes as f64, max as f64);
            writeln!(
                writer,
                "  {subject}  {}  {}",
                format_minutes(*minutes),
                progress_bar(ratio.0, ratio.1)
            )?;
        }
    }

    let resources = records::resources(store);
    let by_resource = report::minutes_by_resource(&sessions, &resources, TOP_RESOURCES);
    if !by_resource.is_empty() {
        writeln!(writer, "\nBy resource")?;
        for (title, minutes) in &by_resource {
            writeln!(writer, "  {title}  {}", format_minutes(*minutes))?;
        }
    }

    let habits = records::habits(store);
    let logs = records::habit_logs(store);
    writeln!(
        writer,
        "\nHabits today: {}% · best streak {}d · total study time {}",
        report::habit_rate_on(&habits, &logs, today),
        report::best_streak(&habits, &logs, today),
        format_minutes(report::total_minutes(&sessions)),
    )?;
    Ok(())
}
