//! UI state for the terminal front end

/// Default number of log lines shown
const DEFAULT_LOG_TAIL: usize = 15;

/// Views of the simulation a user can switch between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Introduction,
    Performance,
    Perceptions,
    Ksaos,
    Subtasks,
    Log,
    Entropy,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Introduction,
            Tab::Performance,
            Tab::Perceptions,
            Tab::Ksaos,
            Tab::Subtasks,
            Tab::Log,
            Tab::Entropy,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Introduction => "Introduction",
            Tab::Performance => "Team Performance Over Time",
            Tab::Perceptions => "Leadership Perceptions",
            Tab::Ksaos => "Team KSAOs",
            Tab::Subtasks => "Subtasks and Required KSAOs",
            Tab::Log => "Simulation Log",
            Tab::Entropy => "Leadership Entropy Over Time",
        }
    }

    /// Command words that open this tab
    pub fn parse(word: &str) -> Option<Tab> {
        match word {
            "intro" | "introduction" | "help" | "h" => Some(Tab::Introduction),
            "performance" | "perf" => Some(Tab::Performance),
            "perceptions" | "p" => Some(Tab::Perceptions),
            "ksaos" | "k" => Some(Tab::Ksaos),
            "subtasks" | "t" => Some(Tab::Subtasks),
            "log" | "l" => Some(Tab::Log),
            "entropy" | "e" => Some(Tab::Entropy),
            _ => None,
        }
    }
}

/// What the front end is currently showing
#[derive(Debug)]
pub struct ViewState {
    pub current_tab: Tab,
    /// Number of most recent log lines the log tab shows
    pub log_tail: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            current_tab: Tab::Introduction,
            log_tail: DEFAULT_LOG_TAIL,
        }
    }

    pub fn open(&mut self, tab: Tab) {
        self.current_tab = tab;
    }

    pub fn set_log_tail(&mut self, lines: usize) {
        self.log_tail = lines.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tab_has_a_command() {
        let words = ["intro", "perf", "p", "k", "t", "log", "e"];
        let parsed: Vec<Tab> = words.iter().filter_map(|w| Tab::parse(w)).collect();
        assert_eq!(parsed, Tab::all().to_vec());
        assert_eq!(Tab::parse("bogus"), None);
    }

    #[test]
    fn test_log_tail_never_zero() {
        let mut view = ViewState::new();
        view.set_log_tail(0);
        assert_eq!(view.log_tail, 1);
    }
}
