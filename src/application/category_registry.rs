// Static per-category customization of visualizations
use crate::application::plotter::{ChartPlotter, Plotter};
use crate::domain::customization::{
    AncillaryDescriptor, Category, IdComponents, TKN_DISCRETE_PROPERTY, TKN_PROCEDURE,
};
use crate::domain::range_strategy::RangeStrategy;
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a category decides about its visualizations
#[derive(Debug, Clone)]
pub struct Customization {
    /// `None` renders a textual placeholder instead of a plot
    pub plotter: Option<Arc<dyn Plotter>>,
    pub ranger: RangeStrategy,
    pub ancillary: Vec<AncillaryDescriptor>,
    pub allow_time_slider: bool,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            plotter: None,
            ranger: RangeStrategy::Unimplemented,
            ancillary: Vec::new(),
            allow_time_slider: true,
        }
    }
}

/// Read-only mapping from category to customization, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: HashMap<Category, Customization>,
}

impl CategoryRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Discrete samples, loads and streamflow
    pub fn standard() -> Self {
        Self::empty()
            .register(
                Category::Discrete,
                Customization {
                    plotter: Some(Arc::new(ChartPlotter::sample_concentration())),
                    ranger: RangeStrategy::DataAvailability,
                    ancillary: Vec::new(),
                    allow_time_slider: true,
                },
            )
            .register(
                Category::Load,
                Customization {
                    plotter: Some(Arc::new(ChartPlotter::load())),
                    ranger: RangeStrategy::DataAvailability,
                    ancillary: Vec::new(),
                    allow_time_slider: true,
                },
            )
            .register(
                Category::Flow,
                Customization {
                    plotter: Some(Arc::new(ChartPlotter::flow())),
                    ranger: RangeStrategy::MostRecentWaterYear,
                    ancillary: vec![AncillaryDescriptor::new(TKN_PROCEDURE, TKN_DISCRETE_PROPERTY)],
                    allow_time_slider: false,
                },
            )
    }

    pub fn register(mut self, category: Category, customization: Customization) -> Self {
        self.categories.insert(category, customization);
        self
    }

    pub fn resolve(&self, components: &IdComponents) -> Customization {
        components
            .category()
            .and_then(|category| self.categories.get(&category))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl CategoryRegistry {
    pub fn resolve_id(&self, id: &str) -> Customization {
        self.resolve(&IdComponents::parse(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_categories() {
        let registry = CategoryRegistry::standard();

        let discrete = registry.resolve_id("nh3/discrete_concentration");
        assert!(discrete.plotter.is_some());
        assert_eq!(discrete.ranger, RangeStrategy::DataAvailability);
        assert!(discrete.ancillary.is_empty());
        assert!(discrete.allow_time_slider);

        let load = registry.resolve_id("tp/load");
        assert_eq!(load.ranger, RangeStrategy::DataAvailability);
        assert!(load.allow_time_slider);

        let flow = registry.resolve_id("q/flow");
        assert_eq!(flow.ranger, RangeStrategy::MostRecentWaterYear);
        assert!(!flow.allow_time_slider);
        assert_eq!(flow.ancillary, vec![AncillaryDescriptor::new(TKN_PROCEDURE, TKN_DISCRETE_PROPERTY)]);
    }

    #[test]
    fn test_unknown_ids_fall_back_to_defaults() {
        let registry = CategoryRegistry::standard();
        for id in ["", "tp", "tp/mystery", "zzz/Flow"] {
            let customization = registry.resolve_id(id);
            assert!(customization.plotter.is_none(), "{id}");
            assert_eq!(customization.ranger, RangeStrategy::Unimplemented);
            assert!(customization.ancillary.is_empty());
            assert!(customization.allow_time_slider);
        }
    }
}
