// Page-wide plot containers, plot counter and instructions visibility
use crate::domain::chart::ChartData;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;

pub const PLOT_CONTAINER_CLASS: &str = "full_report_plot";

/// Container id for a visualization id: `<id>_full_report_plot`
pub fn plot_container_id(visualization_id: &str) -> String {
    format!("{}_{}", visualization_id, PLOT_CONTAINER_CLASS)
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerContent {
    Empty,
    Chart { chart: ChartData },
    Placeholder { text: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PlotContainer {
    pub id: String,
    pub content: ContainerContent,
}

#[derive(Debug)]
struct RegistryState {
    // newest first
    containers: VecDeque<PlotContainer>,
    number_of_plots: usize,
    instructions_visible: bool,
}

/// Shared rendering surface for every visualization on a report page.
///
/// One instance lives for the whole page session. The lock is never held
/// across an await point.
#[derive(Debug)]
pub struct PlotRegistry {
    state: Mutex<RegistryState>,
}

impl Default for PlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotRegistry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                containers: VecDeque::new(),
                number_of_plots: 0,
                instructions_visible: true,
            }),
        }
    }

    /// Inserts an empty container at the front. Returns false if one with
    /// the same id already exists, leaving it untouched.
    pub fn insert_container(&self, container_id: &str) -> bool {
        let mut state = self.state.lock();
        if state.containers.iter().any(|c| c.id == container_id) {
            return false;
        }
        state.containers.push_front(PlotContainer {
            id: container_id.to_string(),
            content: ContainerContent::Empty,
        });
        true
    }

    pub fn set_content(&self, container_id: &str, content: ContainerContent) -> bool {
        let mut state = self.state.lock();
        match state.containers.iter_mut().find(|c| c.id == container_id) {
            Some(container) => {
                container.content = content;
                true
            }
            None => false,
        }
    }

    pub fn remove_container(&self, container_id: &str) -> Option<PlotContainer> {
        let mut state = self.state.lock();
        let index = state.containers.iter().position(|c| c.id == container_id)?;
        state.containers.remove(index)
    }

    pub fn container(&self, container_id: &str) -> Option<PlotContainer> {
        self.state
            .lock()
            .containers
            .iter()
            .find(|c| c.id == container_id)
            .cloned()
    }

    pub fn container_ids(&self) -> Vec<String> {
        self.state.lock().containers.iter().map(|c| c.id.clone()).collect()
    }

    /// Counts a newly rendered plot; the first one hides the instructions.
    pub fn plot_added(&self) -> usize {
        let mut state = self.state.lock();
        state.number_of_plots += 1;
        if state.number_of_plots == 1 {
            state.instructions_visible = false;
            tracing::debug!("First plot displayed, hiding instructions");
        }
        state.number_of_plots
    }

    /// Counts a removed plot; removing the last one shows the instructions again.
    pub fn plot_removed(&self) -> usize {
        let mut state = self.state.lock();
        if state.number_of_plots == 0 {
            tracing::warn!("Plot removal reported with no plots displayed");
            return 0;
        }
        state.number_of_plots -= 1;
        if state.number_of_plots == 0 {
            state.instructions_visible = true;
            tracing::debug!("No plots remain, showing instructions");
        }
        state.number_of_plots
    }

    pub fn number_of_plots(&self) -> usize {
        self.state.lock().number_of_plots
    }

    pub fn instructions_visible(&self) -> bool {
        self.state.lock().instructions_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_id() {
        assert_eq!(plot_container_id("tp/load_annual"), "tp/load_annual_full_report_plot");
    }

    #[test]
    fn test_containers_are_deduplicated_and_prepended() {
        let registry = PlotRegistry::new();
        assert!(registry.insert_container("a"));
        assert!(registry.insert_container("b"));
        assert!(!registry.insert_container("a"));
        assert_eq!(registry.container_ids(), vec!["b".to_string(), "a".to_string()]);

        assert!(registry.set_content("a", ContainerContent::Placeholder { text: "a".to_string() }));
        assert!(!registry.set_content("missing", ContainerContent::Empty));

        let removed = registry.remove_container("a").unwrap();
        assert!(matches!(removed.content, ContainerContent::Placeholder { .. }));
        assert!(registry.container("a").is_none());
        assert!(registry.remove_container("a").is_none());
    }

    #[test]
    fn test_instructions_toggle_on_first_and_last_plot() {
        let registry = PlotRegistry::new();
        assert!(registry.instructions_visible());

        assert_eq!(registry.plot_added(), 1);
        assert!(!registry.instructions_visible());
        assert_eq!(registry.plot_added(), 2);

        assert_eq!(registry.plot_removed(), 1);
        assert!(!registry.instructions_visible());
        assert_eq!(registry.plot_removed(), 0);
        assert!(registry.instructions_visible());

        assert_eq!(registry.plot_removed(), 0);
        assert_eq!(registry.number_of_plots(), 0);
    }
}
