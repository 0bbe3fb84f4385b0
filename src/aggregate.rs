use crate::filter::FilteredView;
use std::collections::HashMap;

/// Joins dish names that share one map marker; rendered as a line break in tooltips.
pub const LABEL_SEPARATOR: &str = "<br>";

/// Per-row map labels, aligned by position with the [`FilteredView`] they came from.
pub type StateLabelSeries = Vec<Option<String>>;

/// Collapses rows that share a state to one map marker per state.
///
/// Rows are grouped by state in one pass. Each group's marker goes on its
/// last row, labelled with every dish name in the group (view order, joined
/// with [`LABEL_SEPARATOR`]). All other rows of the group, and rows without a
/// state, get `None`. A state seen once is labelled with that dish's name.
///
/// # Examples
/// ```
/// use recipe_dashboard::aggregate::aggregate_states;
/// use recipe_dashboard::filter::FilteredView;
/// use recipe_dashboard::recipe::Recipe;
///
/// let row = |name: &str, state: Option<&str>| {
///     Recipe::new(name, "Vegetarian", "Snack", 5.0, 5.0)
///         .with_state(state.map(String::from), None)
/// };
/// let view = FilteredView::from_rows(vec![
///     row("A", Some("Kerala")),
///     row("B", Some("Goa")),
///     row("C", Some("Kerala")),
///     row("D", None),
///     row("E", Some("Goa")),
/// ]);
///
/// let labels = aggregate_states(&view);
/// assert_eq!(
///     labels,
///     vec![None, None, Some("A<br>C".to_string()), None, Some("B<br>E".to_string())]
/// );
/// ```
pub fn aggregate_states(view: &FilteredView) -> StateLabelSeries {
    let rows = view.rows();

    // state -> (last row seen, dish names so far)
    let mut groups: HashMap<&str, (usize, Vec<&str>)> = HashMap::new();
    for (index, recipe) in rows.iter().enumerate() {
        if let Some(state) = recipe.state.as_deref() {
            let group = groups.entry(state).or_insert((index, Vec::new()));
            group.0 = index;
            group.1.push(recipe.name.as_str());
        }
    }

    let mut labels: StateLabelSeries = vec![None; rows.len()];
    for (representative, names) in groups.into_values() {
        labels[representative] = Some(names.join(LABEL_SEPARATOR));
    }

    labels
}
