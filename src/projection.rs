//! Reshapes a filtered view into the flat records each chart renderer takes.
//!
//! Nothing here filters or aggregates; the map records come straight from
//! the aggregated state labels.

use crate::aggregate::StateLabelSeries;
use crate::filter::FilteredView;
use serde::Serialize;

/// Horizontal bar: popularity per dish, with time and servings on hover.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct RankedBarRecord {
    pub dish: String,
    pub content_view: f64,
    pub total_time_min: f64,
    pub servings: f64,
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeSeries {
    Preparation,
    Cooking,
    Total,
}

impl TimeSeries {
    pub const ALL: [TimeSeries; 3] = [TimeSeries::Preparation, TimeSeries::Cooking, TimeSeries::Total];

    pub fn label(self) -> &'static str {
        match self {
            TimeSeries::Preparation => "preparation time(min)",
            TimeSeries::Cooking => "cooking time(min)",
            TimeSeries::Total => "total time(min)",
        }
    }
}

/// One point of the preparation/cooking/total time lines.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct TimeLineRecord {
    pub position: usize,
    pub dish: String,
    pub tick: String,
    pub series: TimeSeries,
    pub minutes: f64,
}

/// One marker on the map. `row` points back into the filtered view.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct ChoroplethRecord {
    pub row: usize,
    pub state: String,
    pub state_id: Option<String>,
    pub dish_names: String,
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Protein,
    Carb,
    Fat,
    Fibre,
}

impl Nutrient {
    pub const ALL: [Nutrient; 4] = [Nutrient::Protein, Nutrient::Carb, Nutrient::Fat, Nutrient::Fibre];

    pub fn label(self) -> &'static str {
        match self {
            Nutrient::Protein => "protein",
            Nutrient::Carb => "carb",
            Nutrient::Fat => "fat",
            Nutrient::Fibre => "fibre",
        }
    }
}

/// One bubble; the renderer sizes it by `grams`.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct NutrientBubbleRecord {
    pub position: usize,
    pub dish: String,
    pub tick: String,
    pub nutrient: Nutrient,
    pub grams: f64,
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct EnergyBarRecord {
    pub position: usize,
    pub dish: String,
    pub tick: String,
    pub energy_kcal: f64,
}

/// Everything the five charts need for one filter state.
#[derive(Clone, Serialize, Debug, Default, PartialEq)]
pub struct ChartPayloads {
    pub ranked_bar: Vec<RankedBarRecord>,
    pub time_line: Vec<TimeLineRecord>,
    pub choropleth: Vec<ChoroplethRecord>,
    pub nutrient_bubble: Vec<NutrientBubbleRecord>,
    pub energy_bar: Vec<EnergyBarRecord>,
    /// First word of each dish name, by view position.
    pub ticks: Vec<String>,
    /// Full dish names, by view position, for hover text.
    pub dish_names: Vec<String>,
}

impl ChartPayloads {
    pub fn is_empty(&self) -> bool {
        self.ranked_bar.is_empty()
    }
}

pub fn project_charts(view: &FilteredView, labels: &StateLabelSeries) -> ChartPayloads {
    let rows = view.rows();
    let ticks: Vec<String> = rows.iter().map(|r| r.short_name().to_string()).collect();
    let dish_names: Vec<String> = rows.iter().map(|r| r.name.clone()).collect();

    let ranked_bar = rows
        .iter()
        .map(|r| RankedBarRecord {
            dish: r.name.clone(),
            content_view: r.content_view,
            total_time_min: r.total_time_min(),
            servings: r.servings,
        })
        .collect();

    let mut time_line = Vec::with_capacity(rows.len() * TimeSeries::ALL.len());
    for series in TimeSeries::ALL {
        for (position, r) in rows.iter().enumerate() {
            let minutes = match series {
                TimeSeries::Preparation => r.prep_time_min(),
                TimeSeries::Cooking => r.cook_time_min(),
                TimeSeries::Total => r.total_time_min(),
            };
            time_line.push(TimeLineRecord {
                position,
                dish: r.name.clone(),
                tick: ticks[position].clone(),
                series,
                minutes,
            });
        }
    }

    let choropleth = rows
        .iter()
        .zip(labels.iter())
        .enumerate()
        .filter_map(|(row, (r, label))| {
            let dish_names = label.clone()?;
            let state = r.state.clone()?;
            Some(ChoroplethRecord {
                row,
                state,
                state_id: r.state_id.clone(),
                dish_names,
            })
        })
        .collect();

    let mut nutrient_bubble = Vec::with_capacity(rows.len() * Nutrient::ALL.len());
    for nutrient in Nutrient::ALL {
        for (position, r) in rows.iter().enumerate() {
            let grams = match nutrient {
                Nutrient::Protein => r.nutrients.protein_g,
                Nutrient::Carb => r.nutrients.carb_g,
                Nutrient::Fat => r.nutrients.fat_g,
                Nutrient::Fibre => r.nutrients.fibre_g,
            };
            nutrient_bubble.push(NutrientBubbleRecord {
                position,
                dish: r.name.clone(),
                tick: ticks[position].clone(),
                nutrient,
                grams,
            });
        }
    }

    let energy_bar = rows
        .iter()
        .enumerate()
        .map(|(position, r)| EnergyBarRecord {
            position,
            dish: r.name.clone(),
            tick: ticks[position].clone(),
            energy_kcal: r.nutrients.energy_kcal,
        })
        .collect();

    ChartPayloads {
        ranked_bar,
        time_line,
        choropleth,
        nutrient_bubble,
        energy_bar,
        ticks,
        dish_names,
    }
}
