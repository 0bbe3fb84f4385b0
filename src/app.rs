#![cfg(not(tarpaulin_include))]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::DashboardConfig;
use crate::dashboard::update_dashboard;
use crate::dataset::RecipeDataset;
use crate::filter::{FilterSelection, RankBucket, TIME_BUCKETS};
use crate::geo::StateBoundaries;
use crate::loader;
use crate::render::{ChartKind, ChartOptions, render_chart};

/// Read-only state shared by every request. Nothing here is mutated after
/// startup, so handlers need no locking.
pub struct AppState {
    dataset: &'static RecipeDataset,
    boundaries: Arc<StateBoundaries>,
}

#[derive(Deserialize, Debug, Default)]
struct FilterQuery {
    top: Option<String>,
    diet: Option<String>,
    course: Option<String>,
    time: Option<String>,
}

impl FilterQuery {
    fn selection(&self) -> crate::error::Result<FilterSelection> {
        FilterSelection::from_controls(
            self.top.as_deref(),
            self.diet.as_deref(),
            self.course.as_deref(),
            self.time.as_deref(),
        )
    }
}

#[derive(Serialize)]
struct DropdownOption {
    label: String,
    value: String,
}

#[derive(Serialize)]
struct OptionsResponse {
    top: Vec<DropdownOption>,
    diet: Vec<String>,
    course: Vec<String>,
    time: Vec<DropdownOption>,
}

#[derive(Serialize)]
struct RenderedChart {
    kind: &'static str,
    svg: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: String,
    message: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            status: "error".to_string(),
            message,
        }),
    )
        .into_response()
}

/// Build the router over an already loaded dataset and boundary set.
pub fn router(dataset: &'static RecipeDataset, boundaries: Arc<StateBoundaries>) -> Router {
    let app_state = Arc::new(AppState {
        dataset,
        boundaries,
    });

    Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/options", get(get_options))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/charts", get(get_charts))
        .route("/api/chart/:kind", get(get_chart))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub async fn run(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = loader::load_dataset(&config.data_path)?.install_global();

    // Without boundaries the map comes out blank, the other four charts are unaffected
    let boundaries = match StateBoundaries::load(&config.geojson_path) {
        Ok(boundaries) => boundaries,
        Err(e) => {
            log::warn!(
                "could not load state boundaries from {}: {}",
                config.geojson_path.display(),
                e
            );
            StateBoundaries::default()
        }
    };

    let app = router(dataset, Arc::new(boundaries));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    log::info!("dashboard listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(include_str!("./static/dashboard.html"))
}

async fn get_options(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let top = RankBucket::standard_buckets()
        .into_iter()
        .map(|(label, bucket)| DropdownOption {
            label: label.to_string(),
            value: bucket.to_string(),
        })
        .collect();

    let time = TIME_BUCKETS
        .iter()
        .map(|(label, minutes)| DropdownOption {
            label: label.to_string(),
            value: minutes.to_string(),
        })
        .collect();

    Json(OptionsResponse {
        top,
        diet: state.dataset.diet_types().into_iter().map(String::from).collect(),
        course: state.dataset.meal_courses().into_iter().map(String::from).collect(),
        time,
    })
}

async fn get_dashboard(
    Query(params): Query<FilterQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let selection = match params.selection() {
        Ok(selection) => selection,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let update = update_dashboard(state.dataset, &selection);
    Json(update).into_response()
}

// One cycle for the whole page: every chart is rendered from the same update
async fn get_charts(
    Query(params): Query<FilterQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let selection = match params.selection() {
        Ok(selection) => selection,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let update = update_dashboard(state.dataset, &selection);
    let mut charts = Vec::with_capacity(ChartKind::ALL.len());
    for kind in ChartKind::ALL {
        match render_chart(
            kind,
            &update.charts,
            &state.boundaries,
            &ChartOptions::for_kind(kind),
        ) {
            Ok(svg) => charts.push(RenderedChart {
                kind: kind.name(),
                svg,
            }),
            Err(e) => {
                log::warn!("failed to render {} chart: {}", kind.name(), e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
            }
        }
    }

    Json(charts).into_response()
}

async fn get_chart(
    Path(kind): Path<String>,
    Query(params): Query<FilterQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(kind) = ChartKind::from_name(kind.trim_end_matches(".svg")) else {
        return error_response(StatusCode::NOT_FOUND, format!("unknown chart '{}'", kind));
    };

    let selection = match params.selection() {
        Ok(selection) => selection,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let update = update_dashboard(state.dataset, &selection);
    match render_chart(
        kind,
        &update.charts,
        &state.boundaries,
        &ChartOptions::for_kind(kind),
    ) {
        Ok(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Err(e) => {
            log::warn!("failed to render {} chart: {}", kind.name(), e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Recipe;
    use axum::body::to_bytes;
    use serde_json::Value;

    fn test_state() -> Arc<AppState> {
        let dataset = RecipeDataset::from_recipes(vec![
            Recipe::new("Masala Dosa", "Vegetarian", "Breakfast", 30.0, 20.0)
                .with_state(Some("Karnataka".to_string()), None),
            Recipe::new("Butter Chicken", "Non Vegeterian", "Main Course", 20.0, 40.0)
                .with_state(Some("Punjab".to_string()), None),
            Recipe::new("Egg Bhurji", "Eggetarian", "Breakfast", 5.0, 10.0),
        ]);
        Arc::new(AppState {
            dataset: Box::leak(Box::new(dataset)),
            boundaries: Arc::new(StateBoundaries::default()),
        })
    }

    fn query(top: Option<&str>, diet: Option<&str>, time: Option<&str>) -> Query<FilterQuery> {
        Query(FilterQuery {
            top: top.map(String::from),
            diet: diet.map(String::from),
            course: None,
            time: time.map(String::from),
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn dashboard_returns_filtered_payloads() {
        let response = get_dashboard(query(None, Some("Vegetarian,Eggetarian"), Some("60")), State(test_state())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let dishes: Vec<&str> = body["charts"]["dish_names"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(dishes, vec!["Masala Dosa", "Egg Bhurji"]);
    }

    #[tokio::test]
    async fn malformed_top_is_a_bad_request() {
        let response = get_dashboard(query(Some("first ten"), None, None), State(test_state())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("first ten"));
    }

    #[tokio::test]
    async fn malformed_time_is_a_bad_request() {
        let response = get_dashboard(query(None, None, Some("an hour")), State(test_state())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("an hour"));

        let response = get_charts(query(None, None, Some("soon")), State(test_state())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_chart_kind_is_not_found() {
        let response = get_chart(Path("pie".to_string()), query(None, None, None), State(test_state())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("pie"));
    }

    #[tokio::test]
    async fn single_chart_is_served_as_svg() {
        let response = get_chart(Path("bar.svg".to_string()), query(None, None, None), State(test_state())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("<svg"));
    }

    #[tokio::test]
    async fn all_charts_come_from_one_request() {
        let response = get_charts(query(Some("0-10"), None, None), State(test_state())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let charts = body.as_array().unwrap();
        let kinds: Vec<&str> = charts.iter().filter_map(|c| c["kind"].as_str()).collect();
        assert_eq!(kinds, vec!["bar", "line", "map", "bubble", "energy"]);
        assert!(charts.iter().all(|c| c["svg"].as_str().unwrap().contains("<svg")));
    }

    #[tokio::test]
    async fn page_fetches_every_chart_in_one_call() {
        let Html(page) = serve_dashboard().await;
        assert!(page.contains("/api/charts?"));
        assert!(!page.contains("/api/chart/"));
        assert!(!page.contains("/api/dashboard?"));
    }

    #[tokio::test]
    async fn options_list_vocabularies_and_buckets() {
        let response = get_options(State(test_state())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["diet"], serde_json::json!(["Eggetarian", "Non Vegeterian", "Vegetarian"]));
        assert_eq!(body["course"], serde_json::json!(["Breakfast", "Main Course"]));

        let top = body["top"].as_array().unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0]["label"], "topmost");
        assert_eq!(top[0]["value"], "0-10");
        assert_eq!(top[9]["value"], "99-109");

        let time = body["time"].as_array().unwrap();
        assert_eq!(time.len(), 10);
        assert_eq!(time[0]["value"], "20");
        assert_eq!(time[9]["label"], "greater_than_4h");
        assert_eq!(time[9]["value"], "240");
    }
}
