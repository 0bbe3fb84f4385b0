/*!
# Recipe Dashboard

An interactive dashboard over a table of Indian recipes, built in Rust.

## Overview

The dashboard shows a handful of popular dishes at a time through five linked
charts: a ranked bar chart of content views, a preparation/cooking/total time
line chart, a state choropleth map, a nutrient bubble chart and an energy bar
chart. Four controls narrow down what is shown: a top-N rank bucket, diet
types, meal courses and a time bucket.

## Architecture

Every control change runs one synchronous cycle:

### Dataset Store
- Immutable recipe table loaded once at startup (CSV or Excel)
- Total time derived from preparation and cooking time at load
- Installed as a read-only process-wide singleton

### Filter Engine
- Diet and course set membership, time threshold, rank-bucket slice
- Truncates to ten rows and drops repeated dish names
- The default overview is the same path with an empty selection

### State Aggregator
- One map marker per state, placed on the state's last row
- Marker label lists every dish from that state

### Chart Projection and Rendering
- Flat record sets per chart, served as JSON
- SVG rendering with plotters (feature `web`)

## Modules

- **recipe**: Recipe row and nutrient values
- **dataset**: Immutable recipe table and dropdown vocabularies
- **loader**: CSV and Excel import
- **filter**: Filter controls and the filtered view
- **aggregate**: State collapsing for the map
- **projection**: Chart record shapes
- **dashboard**: One recomputation cycle
- **geo**: State boundary polygons from GeoJSON
- **config**: Paths, bind address and logging setup
- **error**: Error type for boundary failures
- **render**: SVG charts (feature `web`)
- **app**: HTTP routes (feature `web`)

## REST API Endpoints

- `/` - Dashboard page
- `/api/options` - Dropdown vocabularies
- `/api/dashboard?top=&diet=&course=&time=` - Chart payloads as JSON
- `/api/charts?...` - All five charts as SVG from one update
- `/api/chart/{kind}?...` - One chart as SVG (`bar`, `line`, `map`, `bubble`, `energy`)
*/

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod projection;
pub mod recipe;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod render;

/// Re-export the everyday types so callers can `use recipe_dashboard::*`
pub use aggregate::*;
pub use dashboard::*;
pub use dataset::*;
pub use error::DashboardError;
pub use filter::*;
pub use projection::*;
pub use recipe::*;
