//! Terminal rendering for trellocal types.

use owo_colors::OwoColorize;
use trellocal_core::{CardSchedule, NewEvent, Plan, TaskRecord};

pub trait Render {
    fn render(&self) -> String;
}

fn time_span(event: &NewEvent) -> String {
    if event.start.date_naive() == event.end.date_naive() {
        format!(
            "{} {}-{}",
            event.start.format("%a %Y-%m-%d"),
            event.start.format("%H:%M"),
            event.end.format("%H:%M")
        )
    } else {
        format!(
            "{} - {}",
            event.start.format("%a %Y-%m-%d %H:%M"),
            event.end.format("%a %Y-%m-%d %H:%M")
        )
    }
}

impl Render for NewEvent {
    fn render(&self) -> String {
        format!("{} {} {}", "+".green(), self.title.green(), time_span(self).dimmed())
    }
}

impl Render for TaskRecord {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            "!".yellow(),
            self.title.yellow(),
            format!("({} left)", self.estimate).dimmed()
        )
    }
}

impl Render for CardSchedule {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            "~".cyan(),
            self.title,
            format!(
                "start {} due {}",
                self.start.format("%Y-%m-%d %H:%M"),
                self.due.format("%Y-%m-%d %H:%M")
            )
            .dimmed()
        )
    }
}

impl Render for Plan {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        if self.events.is_empty() {
            lines.push("   (no events)".dimmed().to_string());
        }
        for event in &self.events {
            lines.push(format!("   {}", event.render()));
        }

        if !self.unscheduled.is_empty() {
            lines.push(String::new());
            lines.push(format!("   {}", "Did not fit in any slot:".yellow()));
            for task in &self.unscheduled {
                lines.push(format!("   {}", task.render()));
            }
        }

        lines.join("\n")
    }
}
