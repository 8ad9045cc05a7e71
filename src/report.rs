//! Plan rendering.
//!
//! Turns a [`Schedule`] (and optionally its [`EfficiencyReport`]) into text
//! for a terminal or JSON for other tools.

use std::fmt::{self, Write};

use serde::Serialize;

use crate::analyze::EfficiencyReport;
use crate::schedule::Schedule;

/// Shape of the JSON output.
#[derive(Serialize)]
struct Plan<'a, S> {
    schedule: &'a Schedule<S>,
    #[serde(skip_serializing_if = "Option::is_none")]
    efficiency: Option<&'a EfficiencyReport>,
}

/// Renders the schedule as JSON, with the efficiency report under
/// `efficiency` when given.
pub fn render_json<S: Serialize>(
    schedule: &Schedule<S>,
    efficiency: Option<&EfficiencyReport>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Plan {
        schedule,
        efficiency,
    })
}

/// Renders the schedule as human-readable text.
///
/// Styling is applied only when the terminal supports it.
pub fn render_text<S: std::fmt::Display>(
    schedule: &Schedule<S>,
    efficiency: Option<&EfficiencyReport>,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, schedule, efficiency);
    out
}

fn write_text<S: std::fmt::Display>(
    out: &mut String,
    schedule: &Schedule<S>,
    efficiency: Option<&EfficiencyReport>,
) -> fmt::Result {
    if schedule.is_empty() {
        writeln!(out, "{}", console::style("Nothing to schedule.").yellow())?;
    }

    for (idx, tier) in schedule.tiers.iter().enumerate() {
        writeln!(
            out,
            "{} ({} groups, ~{})",
            console::style(format!("Tier {}", idx + 1)).bold(),
            tier.len(),
            format_ms(tier.max_duration())
        )?;
        for group in &tier.groups {
            writeln!(
                out,
                "  [{}] priority {:.1}, ~{}, {} units",
                console::style(group.partition_key()).cyan(),
                group.priority,
                format_ms(group.estimated_duration),
                group.len()
            )?;
            for unit in &group.units {
                writeln!(out, "    {}", unit)?;
            }
        }
    }

    if let Some(report) = efficiency {
        writeln!(out)?;
        writeln!(out, "{}", console::style("Efficiency:").bold())?;
        writeln!(out, "  Groups:        {}", report.total_groups)?;
        writeln!(out, "  Tests:         {}", report.total_tests)?;
        writeln!(
            out,
            "  Est. time:     {}",
            format_ms(report.estimated_total_time)
        )?;
        writeln!(out, "  Avg group:     {:.2}", report.average_group_size)?;
        writeln!(out, "  Load balance:  {:.2}", report.load_balance)?;
        writeln!(out, "  Parallelism:   {:.2}", report.parallelism)?;
    }

    Ok(())
}

/// Formats milliseconds as `850ms` or `12.3s`.
pub fn format_ms(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.0}ms", ms)
    } else {
        format!("{:.1}s", ms / 1000.0)
    }
}
