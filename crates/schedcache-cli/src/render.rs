//! Plain-text output for the terminal.

use chrono::NaiveDate;
use schedcache_core::{
    FlightScope, LoadedPeriodCache, LoadedSchedule, MetadataIndex, PeriodId,
};

/// "0830" -> "08:30". Anything that isn't four digits is shown as-is.
pub fn format_time(hhmm: &str) -> String {
    let t = hhmm.trim();
    if t.len() == 4 && t.chars().all(|c| c.is_ascii_digit()) {
        format!("{}:{}", &t[..2], &t[2..])
    } else {
        t.to_string()
    }
}

pub fn print_periods(index: &MetadataIndex, today: NaiveDate) {
    if index.is_empty() {
        println!("No flight schedules available.");
        return;
    }

    for period in index.periods() {
        let marker = if period.contains(today) { "*" } else { " " };
        println!(
            "{} {:>6}  {} to {}  ({})",
            marker,
            period.id,
            period.start_date,
            period.end_date,
            period.range_display()
        );
    }
}

pub fn print_timetable(schedule: &LoadedSchedule, scope: &FlightScope) {
    println!(
        "Schedule {}: {} ({} flights, showing {})",
        schedule.period.id,
        schedule.period.range_display(),
        schedule.len(),
        scope
    );

    for day in schedule.timetable(scope) {
        println!();
        println!("{}", day.weekday);
        if day.is_empty() {
            println!("  No flights scheduled for this day");
            continue;
        }
        for (aircraft, flights) in day.by_aircraft() {
            println!("  {}", aircraft);
            for flight in flights {
                println!(
                    "    {:<8} {:<5} -> {:<5} {:>5}  {:>5}",
                    flight.flight_number,
                    flight.departure_port,
                    flight.arrival_port,
                    format_time(&flight.departure_time),
                    format_time(&flight.arrival_time)
                );
            }
        }
    }
}

pub fn print_neighbor_status(index: &MetadataIndex, cache: &LoadedPeriodCache, current: &PeriodId) {
    let neighbors = index.neighbors(current);
    if neighbors.is_empty() {
        return;
    }

    println!();
    for period in neighbors {
        let status = match cache.entry(&period.id) {
            Some(entry) => format!("ready ({} flights, loaded {})", entry.schedule.len(), entry.age_display()),
            None => "not loaded".to_string(),
        };
        println!("Neighbor {} ({}): {}", period.id, period.range_display(), status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time("0830"), "08:30");
        assert_eq!(format_time(" 2359 "), "23:59");
        assert_eq!(format_time("11:55"), "11:55");
        assert_eq!(format_time("TBA"), "TBA");
    }
}
