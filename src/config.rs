use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "recipe_final_list.xlsx";
pub const DEFAULT_GEOJSON_PATH: &str = "states_india.geojson";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8050";

const DATA_ENV: &str = "RECIPE_DATA";
const GEOJSON_ENV: &str = "RECIPE_GEOJSON";
const BIND_ENV: &str = "RECIPE_BIND";

/// Where the dashboard reads its inputs from and where it listens.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub geojson_path: PathBuf,
    pub bind_addr: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            geojson_path: PathBuf::from(DEFAULT_GEOJSON_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Defaults, then `RECIPE_DATA` / `RECIPE_GEOJSON` / `RECIPE_BIND`, then
    /// positional arguments `<data> [geojson] [bind]` (program name excluded).
    pub fn from_sources<I>(env: impl Fn(&str) -> Option<String>, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();

        if let Some(path) = env(DATA_ENV) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = env(GEOJSON_ENV) {
            config.geojson_path = PathBuf::from(path);
        }
        if let Some(addr) = env(BIND_ENV) {
            config.bind_addr = addr;
        }

        let mut args = args.into_iter();
        if let Some(path) = args.next() {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = args.next() {
            config.geojson_path = PathBuf::from(path);
        }
        if let Some(addr) = args.next() {
            config.bind_addr = addr;
        }

        config
    }

    pub fn from_env_and_args() -> Self {
        Self::from_sources(|key| std::env::var(key).ok(), std::env::args().skip(1))
    }
}

/// Starts `env_logger` at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
