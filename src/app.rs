use axum::{
    Json, Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::chart::{self, ChartSpec, ChartStyle};
use crate::config::{Config, PageConfig};
use crate::dataset::Dataset;
use crate::loader::load_dataset;
use crate::selection::Selection;

/// Cookie holding the session's selected institution
pub const SELECTION_COOKIE: &str = "institution";

/// Shared, read-only server state
///
/// Nothing in here changes after startup; per-viewer state travels in the
/// selection cookie.
pub struct AppState {
    dataset: Arc<Dataset>,
    page: PageConfig,
    style: ChartStyle,
}

impl AppState {
    pub fn new(dataset: Dataset, page: PageConfig, style: ChartStyle) -> Self {
        Self {
            dataset: Arc::new(dataset),
            page,
            style,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[derive(Deserialize)]
struct ChartQuery {
    institution: Option<String>,
}

/// Data injected into the page for the dropdown and headings
#[derive(Serialize)]
struct PageData<'a> {
    title: &'a str,
    description: &'a str,
    institutions: &'a [String],
    selected: Option<&'a str>,
}

/// Build the dashboard router
///
/// * `GET /` - the page with the institution dropdown and chart area
/// * `GET /api/chart?institution=NAME` - chart for one institution
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/chart", get(chart_data))
        .with_state(state)
}

/// Load the configured dataset, then serve it until the process is killed
///
/// The listener is only bound once the dataset has loaded, so a bad input
/// file never leaves a port open.
pub async fn launch(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_dataset(&config.data, &config.schema)?;
    run(config, dataset).await
}

/// Serve an already loaded dataset
pub async fn run(config: &Config, dataset: Dataset) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = Arc::new(AppState::new(
        dataset,
        config.page.clone(),
        config.style.clone(),
    ));
    let app = router(app_state);

    let listener = TcpListener::bind(config.addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn remembered_selection(jar: &CookieJar) -> Option<String> {
    // the jar percent-decodes values, so non-ASCII names survive
    jar.get(SELECTION_COOKIE).map(|cookie| cookie.value().to_string())
}

fn selection_cookie(selection: &Selection) -> Cookie<'static> {
    Cookie::build((SELECTION_COOKIE, selection.as_str().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

async fn serve_dashboard(jar: CookieJar, State(state): State<Arc<AppState>>) -> Html<String> {
    let remembered = remembered_selection(&jar);
    let selection = Selection::resolve(&state.dataset, remembered.as_deref());

    let data = PageData {
        title: &state.page.title,
        description: &state.page.description,
        institutions: state.dataset.institutions(),
        selected: selection.as_ref().map(Selection::as_str),
    };

    // "</" would end the script element early
    let data_json = serde_json::to_string(&data)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    let page = include_str!("./static/dashboard.html").replacen(
        "</head>",
        &format!("    <script>const DASHBOARD = {};</script>\n</head>", data_json),
        1,
    );
    Html(page)
}

async fn chart_data(
    jar: CookieJar,
    Query(params): Query<ChartQuery>,
    State(state): State<Arc<AppState>>,
) -> (CookieJar, Json<ChartSpec>) {
    let selection = match params.institution {
        Some(name) => Selection::choose(&state.dataset, &name).ok_or(name),
        None => {
            let remembered = remembered_selection(&jar);
            Selection::resolve(&state.dataset, remembered.as_deref()).ok_or_else(String::new)
        }
    };

    match selection {
        Ok(selection) => {
            let spec = chart::build(&state.dataset, selection.as_str(), &state.style);
            (jar.add(selection_cookie(&selection)), Json(spec))
        }
        Err(unknown) => {
            debug!("chart requested for unknown institution '{unknown}'");
            (jar, Json(chart::build(&state.dataset, &unknown, &state.style)))
        }
    }
}
