use crate::aggregate::{StateLabelSeries, aggregate_states};
use crate::dataset::RecipeDataset;
use crate::filter::{FilterSelection, FilteredView, apply_filters};
use crate::projection::{ChartPayloads, project_charts};
use serde::Serialize;

/// Result of one recomputation cycle. Owned and discarded by the caller.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct DashboardUpdate {
    pub view: FilteredView,
    pub state_labels: StateLabelSeries,
    pub charts: ChartPayloads,
}

/// Filter, aggregate, project. The default overview is just an empty selection.
///
/// # Examples
/// ```
/// use recipe_dashboard::dashboard::update_dashboard;
/// use recipe_dashboard::dataset::RecipeDataset;
/// use recipe_dashboard::filter::FilterSelection;
///
/// let dataset = RecipeDataset::default();
/// let update = update_dashboard(&dataset, &FilterSelection::default());
/// assert!(update.view.is_empty());
/// assert!(update.charts.is_empty());
/// ```
pub fn update_dashboard(dataset: &RecipeDataset, selection: &FilterSelection) -> DashboardUpdate {
    let view = apply_filters(dataset, selection);
    let state_labels = aggregate_states(&view);
    let charts = project_charts(&view, &state_labels);

    log::debug!(
        "dashboard update: {:?} -> {} rows, {} map markers",
        selection,
        view.len(),
        charts.choropleth.len()
    );

    DashboardUpdate {
        view,
        state_labels,
        charts,
    }
}
