//! Plain-text rendering of engine state.

use chrono::{Datelike, NaiveDate};
use journey_core::{CalendarDay, DayMark, StreakEvent, StreakStatus, TodayState};

pub fn status_text(s: &StreakStatus) -> String {
    let headline = match s.today_state {
        TodayState::Expired => "Streak expired. Start learning again.",
        TodayState::Completed => "Goal completed!",
        TodayState::Learned => "Learned today",
        TodayState::Frozen => "Day frozen",
        TodayState::NotLearned => "Not logged yet today",
    };

    let mut out = String::new();
    out.push_str(&format!("Learning {} ({})\n", s.learning_topic, s.duration));
    out.push_str(&format!("{}: {}\n", s.today, headline));
    out.push_str(&format!(
        "{} {} learned (target {})\n",
        s.streak_days,
        plural(s.streak_days, "day", "days"),
        s.target_days
    ));
    out.push_str(&format!(
        "{} {} frozen ({} of {} freezes left)\n",
        s.freezes_used,
        plural(s.freezes_used, "day", "days"),
        s.freeze_quota.saturating_sub(s.freezes_used),
        s.freeze_quota
    ));
    if !s.can_freeze {
        out.push_str("Freeze unavailable today\n");
    } else if s.freeze_disabled {
        out.push_str("Freezing today replaces today's learned mark\n");
    }
    out
}

fn plural(n: u32, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}

fn glyph(mark: DayMark) -> char {
    match mark {
        DayMark::Learned => 'L',
        DayMark::Frozen => 'F',
        DayMark::Idle => '.',
    }
}

fn cell(day: &CalendarDay) -> String {
    let body = format!("{:>2}{}", day.date.day(), glyph(day.mark));
    if day.is_today {
        format!("[{body}]")
    } else {
        format!(" {body} ")
    }
}

const WEEKDAY_HEADER: &str = "  Sun   Mon   Tue   Wed   Thu   Fri   Sat";

pub fn week_text(days: &[CalendarDay]) -> String {
    let Some(first) = days.first() else {
        return String::new();
    };
    let cells: Vec<String> = days.iter().map(cell).collect();
    format!(
        "{}\n{}\n{}\n",
        first.date.format("%B %Y"),
        WEEKDAY_HEADER,
        cells.join(" ")
    )
}

/// Month grid, Sunday-first, blank-padded before the 1st.
pub fn month_text(days: &[CalendarDay]) -> String {
    let Some(first) = days.first() else {
        return String::new();
    };

    let mut out = format!("{}\n{}\n", first.date.format("%B %Y"), WEEKDAY_HEADER);
    let lead = first.date.weekday().num_days_from_sunday() as usize;
    let mut row: Vec<String> = vec![" ".repeat(5); lead];
    for day in days {
        row.push(cell(day));
        if row.len() == 7 {
            out.push_str(&row.join(" "));
            out.push('\n');
            row.clear();
        }
    }
    if !row.is_empty() {
        out.push_str(row.join(" ").trim_end());
        out.push('\n');
    }
    out.push_str("L learned  F frozen  [ ] today\n");
    out
}

pub fn describe_event(event: &StreakEvent) -> String {
    match event {
        StreakEvent::Learned { day } => format!("{day}: logged as learned"),
        StreakEvent::Frozen { day } => format!("{day}: day frozen"),
        StreakEvent::Unfrozen { day } => format!("{day}: freeze returned"),
        StreakEvent::Reset { reason } => format!("streak reset ({reason:?})"),
        StreakEvent::DayRolledOver { day } => format!("new day: {}", day_label(*day)),
    }
}

fn day_label(day: NaiveDate) -> String {
    day.format("%a %Y-%m-%d").to_string()
}
