//! iCalendar export of a committed schedule.
//!
//! Produces a minimal VCALENDAR with one VEVENT per placed task. Unplaced
//! tasks are skipped; they have no interval to export.

use crate::scheduler::ScheduledTask;

/// Render the schedule as an iCalendar document.
pub fn export_ics(schedule: &[ScheduledTask]) -> String {
    let mut out = String::new();
    out.push_str("BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//Dayflow//EN\n");

    for task in schedule {
        let (Some(start), Some(end)) = (task.scheduled_start, task.end_time()) else {
            continue;
        };

        out.push_str("BEGIN:VEVENT\n");
        out.push_str(&format!("UID:{}@dayflow\n", task.task.id));
        out.push_str(&format!("DTSTART:{}\n", start.format("%Y%m%dT%H%M%SZ")));
        out.push_str(&format!("DTEND:{}\n", end.format("%Y%m%dT%H%M%SZ")));
        out.push_str(&format!("SUMMARY:{}\n", escape_ics(&task.task.title)));
        if !task.task.description.is_empty() {
            out.push_str(&format!(
                "DESCRIPTION:{}\n",
                escape_ics(&task.task.description)
            ));
        }
        out.push_str(&format!("CATEGORIES:{}\n", task.task.category));
        out.push_str(&format!("PRIORITY:{}\n", external_priority(task.task.priority)));
        let status = if task.task.completed { "COMPLETED" } else { "CONFIRMED" };
        out.push_str(&format!("STATUS:{}\n", status));
        out.push_str("END:VEVENT\n");
    }

    out.push_str("END:VCALENDAR\n");
    out
}

/// Map the internal 1-5 scale (5 highest) onto the iCalendar 0-9 scale
/// (1 highest): external = 10 - internal * 2.
fn external_priority(priority: u8) -> u8 {
    10u8.saturating_sub(priority.saturating_mul(2))
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::{Duration, TimeZone, Utc};

    fn make_scheduled(id: &str, title: &str, priority: u8) -> ScheduledTask {
        let start = Utc.with_ymd_and_hms(2026, 8, 4, 9, 0, 0).unwrap();
        let mut task = Task::new(title);
        task.id = id.to_string();
        task.priority = priority;
        task.duration = 2.0;
        task.deadline = start + Duration::days(1);
        ScheduledTask::new(task, Some(start))
    }

    #[test]
    fn renders_one_event_per_placed_task() {
        let placed = make_scheduled("t1", "Write report", 5);
        let unplaced = ScheduledTask::new(Task::new("Unplaced"), None);

        let ics = export_ics(&[placed, unplaced]);
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert!(ics.starts_with("BEGIN:VCALENDAR\n"));
        assert!(ics.ends_with("END:VCALENDAR\n"));
        assert!(ics.contains("UID:t1@dayflow\n"));
        assert!(ics.contains("DTSTART:20260804T090000Z\n"));
        assert!(ics.contains("DTEND:20260804T110000Z\n"));
        assert!(ics.contains("STATUS:CONFIRMED\n"));
    }

    #[test]
    fn priority_maps_to_external_scale() {
        assert_eq!(external_priority(5), 0);
        assert_eq!(external_priority(3), 4);
        assert_eq!(external_priority(1), 8);

        let ics = export_ics(&[make_scheduled("t", "Task", 4)]);
        assert!(ics.contains("PRIORITY:2\n"));
    }

    #[test]
    fn escapes_reserved_characters() {
        let mut task = make_scheduled("t", "Plan; review, ship", 3);
        task.task.description = "line one\nline two".to_string();
        let ics = export_ics(&[task]);
        assert!(ics.contains("SUMMARY:Plan\\; review\\, ship\n"));
        assert!(ics.contains("DESCRIPTION:line one\\nline two\n"));
    }
}
