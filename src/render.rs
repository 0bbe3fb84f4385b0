#![cfg(feature = "web")]
use crate::geo::{StateBoundaries, ring_centre};
use crate::projection::{
    ChartPayloads, ChoroplethRecord, EnergyBarRecord, Nutrient, NutrientBubbleRecord,
    RankedBarRecord, TimeLineRecord, TimeSeries,
};
use plotters::prelude::*;
use std::error::Error;

/// The five dashboard charts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    /// Horizontal bars of content views, most popular dish on top
    RankedBar,

    /// Preparation, cooking and total time per dish as three lines
    TimeLine,

    /// State map with one labelled marker per state
    Choropleth,

    /// Protein, carb, fat and fibre as bubbles sized by grams
    NutrientBubble,

    /// Vertical bars of energy per dish
    EnergyBar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::RankedBar,
        ChartKind::TimeLine,
        ChartKind::Choropleth,
        ChartKind::NutrientBubble,
        ChartKind::EnergyBar,
    ];

    /// Parses the short name used in chart URLs (`bar`, `line`, `map`, `bubble`, `energy`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "bar" => Some(ChartKind::RankedBar),
            "line" => Some(ChartKind::TimeLine),
            "map" => Some(ChartKind::Choropleth),
            "bubble" => Some(ChartKind::NutrientBubble),
            "energy" => Some(ChartKind::EnergyBar),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::RankedBar => "bar",
            ChartKind::TimeLine => "line",
            ChartKind::Choropleth => "map",
            ChartKind::NutrientBubble => "bubble",
            ChartKind::EnergyBar => "energy",
        }
    }
}

/// Configuration options for chart rendering
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: "dish names".to_string(),
            y_label: String::new(),
            width: 640,
            height: 400,
        }
    }
}

impl ChartOptions {
    /// Titles and axis labels the dashboard uses for each chart.
    pub fn for_kind(kind: ChartKind) -> Self {
        let base = Self::default();
        match kind {
            ChartKind::RankedBar => Self {
                title: "Top 10 Food Recipe's".to_string(),
                x_label: "content views".to_string(),
                y_label: "dish names".to_string(),
                width: 900,
                ..base
            },
            ChartKind::TimeLine => Self {
                title: "Preparation vs Cooking vs Total time".to_string(),
                y_label: "time(min)".to_string(),
                ..base
            },
            ChartKind::Choropleth => Self {
                title: "Location of Recipe State wise".to_string(),
                x_label: String::new(),
                ..base
            },
            ChartKind::NutrientBubble => Self {
                title: "Protein vs Carb vs Fat vs Fibre of Recipe's".to_string(),
                y_label: "grams".to_string(),
                ..base
            },
            ChartKind::EnergyBar => Self {
                title: "Energy Content in Recipe's".to_string(),
                y_label: "energy(Kcal)".to_string(),
                ..base
            },
        }
    }
}

/// Renders one chart of a dashboard update as an SVG document
///
/// # Arguments
/// * `kind` - Which of the five charts to draw
/// * `payloads` - Projection output for the current filter state
/// * `boundaries` - State polygons, only read by the map
/// * `options` - Title, axis labels and size
///
/// # Returns
/// * A Result containing the SVG text or a drawing error
///
/// # Notes
/// * Empty payloads produce an empty but valid chart
pub fn render_chart(
    kind: ChartKind,
    payloads: &ChartPayloads,
    boundaries: &StateBoundaries,
    options: &ChartOptions,
) -> Result<String, Box<dyn Error>> {
    match kind {
        ChartKind::RankedBar => render_ranked_bar(&payloads.ranked_bar, options),
        ChartKind::TimeLine => render_time_line(&payloads.time_line, &payloads.ticks, options),
        ChartKind::Choropleth => render_choropleth(&payloads.choropleth, boundaries, options),
        ChartKind::NutrientBubble => {
            render_nutrient_bubble(&payloads.nutrient_bubble, &payloads.ticks, options)
        }
        ChartKind::EnergyBar => render_energy_bar(&payloads.energy_bar, &payloads.ticks, options),
    }
}

// Upper axis bound with some headroom; never an empty range
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max);
    if max <= 0.0 { 1.0 } else { max * 1.15 }
}

// Label for a category axis value; non-integral ticks stay blank
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn palette_color(index: usize) -> RGBAColor {
    Palette99::pick(index).to_rgba()
}

// Numeric state ids map straight onto the palette, anything else is hashed by bytes
fn state_color(state_id: Option<&str>, fallback: usize) -> RGBAColor {
    let index = match state_id {
        Some(id) => id
            .trim()
            .parse::<f64>()
            .map(|v| v.abs() as usize)
            .unwrap_or_else(|_| id.bytes().map(usize::from).sum()),
        None => fallback,
    };
    palette_color(index)
}

fn ranked_bar_note(record: &RankedBarRecord) -> String {
    format!(
        "{} min, serves {}",
        record.total_time_min, record.servings
    )
}

fn render_ranked_bar(
    records: &[RankedBarRecord],
    options: &ChartOptions,
) -> Result<String, Box<dyn Error>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let n = records.len();
        // rank 0 is drawn on top, so the axis runs bottom-up through the reversed list
        let names: Vec<String> = records.iter().rev().map(|r| r.dish.clone()).collect();
        let x_max = axis_max(records.iter().map(|r| r.content_view));

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 20).into_font())
            .margin(5)
            .x_label_area_size(35)
            .y_label_area_size(180)
            .build_cartesian_2d(0f64..x_max, -0.5f64..(n.max(1) as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n.max(1))
            .y_label_formatter(&|y| category_label(&names, *y))
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()?;

        chart.draw_series(records.iter().enumerate().map(|(i, r)| {
            let y = (n - 1 - i) as f64;
            Rectangle::new([(0.0, y - 0.4), (r.content_view, y + 0.4)], BLUE.filled())
        }))?;

        // time and servings at the end of each bar
        chart.draw_series(records.iter().enumerate().map(|(i, r)| {
            let y = (n - 1 - i) as f64;
            EmptyElement::at((r.content_view, y))
                + Text::new(
                    ranked_bar_note(r),
                    (4, -5),
                    ("sans-serif", 10).into_font(),
                )
        }))?;

        root.present()?;
    }
    Ok(svg)
}

fn render_time_line(
    records: &[TimeLineRecord],
    ticks: &[String],
    options: &ChartOptions,
) -> Result<String, Box<dyn Error>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let n = ticks.len();
        let y_max = axis_max(records.iter().map(|r| r.minutes));

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(-0.5f64..(n.max(1) as f64 - 0.5), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n.max(1))
            .x_label_formatter(&|x| category_label(ticks, *x))
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()?;

        for (i, series) in TimeSeries::ALL.into_iter().enumerate() {
            let color = palette_color(i);
            let points: Vec<(f64, f64)> = records
                .iter()
                .filter(|r| r.series == series)
                .map(|r| (r.position as f64, r.minutes))
                .collect();

            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                .label(series.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

            chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, 3, color.filled())),
            )?;

            chart.draw_series(points.iter().map(|&(x, y)| {
                EmptyElement::at((x, y))
                    + Text::new(format!("{}", y), (4, 4), ("sans-serif", 10).into_font())
            }))?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }
    Ok(svg)
}

fn render_choropleth(
    records: &[ChoroplethRecord],
    boundaries: &StateBoundaries,
    options: &ChartOptions,
) -> Result<String, Box<dyn Error>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        // fit the view to the plotted states; India's extent when nothing is known
        let (lon_range, lat_range) = match boundaries.bounds(records.iter().map(|r| r.state.as_str())) {
            Some(b) => {
                let pad_lon = ((b.max_lon - b.min_lon) * 0.1).max(0.5);
                let pad_lat = ((b.max_lat - b.min_lat) * 0.1).max(0.5);
                (
                    (b.min_lon - pad_lon)..(b.max_lon + pad_lon),
                    (b.min_lat - pad_lat)..(b.max_lat + pad_lat),
                )
            }
            None => (68.0..98.0, 6.0..38.0),
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 20).into_font())
            .margin(10)
            .build_cartesian_2d(lon_range, lat_range)?;

        chart.draw_series(
            boundaries
                .iter()
                .flat_map(|(_, rings)| rings.iter())
                .map(|ring| PathElement::new(ring.clone(), BLACK.mix(0.3).stroke_width(1))),
        )?;

        for (i, record) in records.iter().enumerate() {
            let Some(rings) = boundaries.polygons(&record.state) else {
                log::debug!("no boundary for state '{}', skipping marker", record.state);
                continue;
            };
            let color = state_color(record.state_id.as_deref(), i);

            chart.draw_series(
                rings
                    .iter()
                    .map(|ring| Polygon::new(ring.clone(), color.mix(0.7).filled())),
            )?;

            let Some(centre) = rings.first().and_then(|ring| ring_centre(ring)) else {
                continue;
            };
            chart.draw_series(record.dish_names.split(crate::aggregate::LABEL_SEPARATOR).enumerate().map(
                |(line, name)| {
                    EmptyElement::at(centre)
                        + Text::new(
                            name.to_string(),
                            (0, line as i32 * 12),
                            ("sans-serif", 11).into_font(),
                        )
                },
            ))?;
        }

        root.present()?;
    }
    Ok(svg)
}

fn render_nutrient_bubble(
    records: &[NutrientBubbleRecord],
    ticks: &[String],
    options: &ChartOptions,
) -> Result<String, Box<dyn Error>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let n = ticks.len();
        let y_max = axis_max(records.iter().map(|r| r.grams));
        let largest = records.iter().map(|r| r.grams).fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(-0.5f64..(n.max(1) as f64 - 0.5), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n.max(1))
            .x_label_formatter(&|x| category_label(ticks, *x))
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()?;

        for (i, nutrient) in Nutrient::ALL.into_iter().enumerate() {
            let color = palette_color(i);
            chart
                .draw_series(records.iter().filter(|r| r.nutrient == nutrient).map(|r| {
                    let radius = if largest > 0.0 {
                        3 + (r.grams / largest * 17.0) as i32
                    } else {
                        3
                    };
                    Circle::new((r.position as f64, r.grams), radius, color.mix(0.6).filled())
                }))?
                .label(nutrient.label())
                .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }
    Ok(svg)
}

fn render_energy_bar(
    records: &[EnergyBarRecord],
    ticks: &[String],
    options: &ChartOptions,
) -> Result<String, Box<dyn Error>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let n = ticks.len();
        let y_max = axis_max(records.iter().map(|r| r.energy_kcal));

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(-0.5f64..(n.max(1) as f64 - 0.5), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n.max(1))
            .x_label_formatter(&|x| category_label(ticks, *x))
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()?;

        chart.draw_series(records.iter().map(|r| {
            let x = r.position as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, r.energy_kcal)], BLUE.filled())
        }))?;

        // value printed just above each bar
        chart.draw_series(records.iter().map(|r| {
            EmptyElement::at((r.position as f64, r.energy_kcal))
                + Text::new(format!("{}", r.energy_kcal), (-8, -14), ("sans-serif", 10).into_font())
        }))?;

        root.present()?;
    }
    Ok(svg)
}
