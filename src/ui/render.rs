//! Plain-text rendering of simulation state
//!
//! Every function returns a `String` so the front end decides where it goes.

use std::fmt::Write;

use crate::core::types::join_ksaos;
use crate::simulation::state::SimulationState;
use crate::ui::state::{Tab, ViewState};

/// Width of the longest bar in bar charts
const BAR_WIDTH: usize = 40;

fn bar(value: f64, max: f64) -> String {
    if !(max > 0.0) {
        return String::new();
    }
    let filled = ((value / max).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

/// One-line summary shown above every view
pub fn render_status(state: &SimulationState) -> String {
    format!(
        "Turn: {} | Completed Subtasks: {} / {} | Mode: {} | Score: {:.3} | Entropy: {:.3}",
        state.turn,
        state.completed_subtasks.len(),
        state.subtasks.len(),
        state.mode,
        state.latest_score(),
        state.entropy
    )
}

pub fn render_introduction(state: &SimulationState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "The team has {} members, each with their own KSAOs.", state.member_count());
    let _ = writeln!(
        out,
        "There are {} subtasks to complete, each requiring specific KSAOs.",
        state.subtasks.len()
    );
    let _ = writeln!(out, "Each turn one member attempts a subtask with what they know.");
    let _ = writeln!(out, "Leadership perceptions shift with every success and failure.");
    let _ = writeln!(out);
    let _ = writeln!(out, "Leadership entropy is low when a few subtasks with clear, agreed-upon");
    let _ = writeln!(out, "leaders carry the remaining work, and high when perceived leadership is");
    let _ = writeln!(out, "spread evenly or contested.");
    let _ = writeln!(out);
    let _ = writeln!(out, "Commands:");
    let _ = writeln!(out, "  step / s              - Run one simulation step");
    let _ = writeln!(out, "  run <n>               - Run n steps (stops when done)");
    let _ = writeln!(out, "  reset [shared|trad]   - Reset, optionally switching mode");
    let _ = writeln!(out, "  mode <shared|trad>    - Switch mode for the following turns");
    let _ = writeln!(out, "  status                - Show the status line");
    let _ = writeln!(out, "  perf | p | k | t | e  - Performance, perceptions, KSAOs, subtasks, entropy");
    let _ = writeln!(out, "  log [n]               - Show the last n log lines");
    let _ = writeln!(out, "  help / h              - Show this text");
    let _ = write!(out, "  quit / q              - Exit");
    out
}

pub fn render_performance(state: &SimulationState, max_entropy: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>5}  {:>7}  {:>7}  {:<8}  Task", "Turn", "Score", "Entropy", "Member");
    for sample in &state.performance {
        let _ = writeln!(
            out,
            "{:>5}  {:>7.3}  {:>7.3}  {:<8}  {}",
            sample.turn,
            sample.score,
            sample.entropy,
            format!("Member {}", sample.completed_by + 1),
            sample.task_description
        );
    }
    if state.performance.is_empty() {
        let _ = writeln!(out, "  (no turns yet)");
    }
    let _ = write!(out, "Max entropy reference: {:.3}", max_entropy);
    out
}

pub fn render_entropy(state: &SimulationState, max_entropy: f64) -> String {
    let mut out = String::new();
    for sample in &state.performance {
        let _ = writeln!(
            out,
            "{:>5} {:>6.3} |{}",
            sample.turn,
            sample.entropy,
            bar(sample.entropy, 1.0)
        );
    }
    if state.performance.is_empty() {
        let _ = writeln!(out, "  (no turns yet)");
    }
    let _ = write!(
        out,
        "Current entropy {:.3}; max entropy reference {:.3}",
        state.entropy, max_entropy
    );
    out
}

pub fn render_perceptions(state: &SimulationState) -> String {
    let n = state.member_count();
    let mut out = String::new();

    let _ = write!(out, "{:<12}", "Team Member");
    for j in 0..n {
        let _ = write!(out, "{:>10}", format!("Member {}", j + 1));
    }
    let _ = writeln!(out);
    for (i, row) in state.perceptions.rows().iter().enumerate() {
        let _ = write!(out, "{:<12}", format!("Member {}", i + 1));
        for value in row {
            let _ = write!(out, "{:>10.2}", value);
        }
        let _ = writeln!(out);
    }

    let totals = state.perceptions.totals();
    let max_total = totals.iter().copied().fold(0.0, f64::max);
    let _ = writeln!(out);
    let _ = writeln!(out, "Total Leadership Perceptions");
    for (j, total) in totals.iter().enumerate() {
        let _ = writeln!(
            out,
            "Member {} {:>6.2} p={:.3} |{}",
            j + 1,
            total,
            state.participation.get(j),
            bar(*total, max_total)
        );
    }
    out.trim_end().to_string()
}

pub fn render_ksaos(state: &SimulationState) -> String {
    let mut out = String::new();
    for member in &state.members {
        let _ = writeln!(
            out,
            "Member {}: {}  (values {})",
            member.display_number(),
            join_ksaos(&member.ksaos),
            join_ksaos(&member.preferences)
        );
    }
    let _ = write!(out, "Dominant KSAOs: {}", join_ksaos(&state.dominant_ksaos));
    out
}

pub fn render_subtasks(state: &SimulationState) -> String {
    let mut out = String::new();
    for task in &state.subtasks {
        let marks: Vec<String> = task
            .required_ksaos
            .iter()
            .map(|k| {
                if task.completed_ksaos.contains(k) {
                    format!("[{}]", k)
                } else {
                    format!(" {} ", k)
                }
            })
            .collect();
        let completed = if task.completed_ksaos.is_empty() {
            "None".to_string()
        } else {
            join_ksaos(&task.completed_ksaos)
        };
        let _ = writeln!(
            out,
            "{} {:<22} {}  completed: {}",
            if task.is_complete() { "✓" } else { " " },
            task.description,
            marks.join(""),
            completed
        );
    }
    out.trim_end().to_string()
}

pub fn render_log(state: &SimulationState, tail: usize) -> String {
    let skip = state.log.len().saturating_sub(tail);
    state.log[skip..].join("\n")
}

pub fn render_tab(tab: Tab, state: &SimulationState, view: &ViewState, max_entropy: f64) -> String {
    let body = match tab {
        Tab::Introduction => render_introduction(state),
        Tab::Performance => render_performance(state, max_entropy),
        Tab::Perceptions => render_perceptions(state),
        Tab::Ksaos => render_ksaos(state),
        Tab::Subtasks => render_subtasks(state),
        Tab::Log => render_log(state, view.log_tail),
        Tab::Entropy => render_entropy(state, max_entropy),
    };
    format!("=== {} ===\n{}", tab.title(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::simulation::engine::SimulationEngine;

    fn engine_after(turns: u32) -> SimulationEngine {
        let mut engine = SimulationEngine::with_seed(SimulationConfig::default(), 9).unwrap();
        engine.run(turns);
        engine
    }

    #[test]
    fn test_status_line() {
        let engine = engine_after(0);
        let status = render_status(engine.get_state());
        assert!(status.starts_with("Turn: 0 | Completed Subtasks: 0 / 8"));
    }

    #[test]
    fn test_perception_table_has_header_and_rows() {
        let engine = engine_after(3);
        let text = render_perceptions(engine.get_state());
        assert!(text.contains("Member 4"));
        assert!(text.contains("Total Leadership Perceptions"));
        // Header, 4 rows, blank, title, 4 bars
        assert_eq!(text.lines().count(), 11);
    }

    #[test]
    fn test_subtasks_mark_completed_tags() {
        let engine = engine_after(0);
        let text = render_subtasks(engine.get_state());
        assert!(text.contains("Analyze Data"));
        assert!(text.contains("completed: None"));
        assert!(!text.contains('['));
    }

    #[test]
    fn test_log_tail() {
        let engine = engine_after(10);
        let state = engine.get_state();
        let text = render_log(state, 3);
        assert_eq!(text.lines().count(), 3.min(state.log.len()));
        assert_eq!(text.lines().last(), state.log.last().map(String::as_str));
    }

    #[test]
    fn test_every_tab_renders_with_title() {
        let engine = engine_after(4);
        let view = ViewState::new();
        for tab in Tab::all() {
            let text = render_tab(*tab, engine.get_state(), &view, engine.max_entropy_reference());
            assert!(text.starts_with(&format!("=== {} ===", tab.title())));
        }
    }

    #[test]
    fn test_bar_scales() {
        assert_eq!(bar(1.0, 1.0).len(), BAR_WIDTH);
        assert_eq!(bar(0.0, 1.0), "");
        assert_eq!(bar(5.0, 0.0), "");
    }
}
