use crate::dataset::RecipeDataset;
use crate::error::{DashboardError, Result};
use crate::recipe::Recipe;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref RANK_BUCKET_REGEX: Regex = Regex::new(r"^\s*(\d+)\s*-\s*(\d+)\s*$").unwrap();
}

/// Maximum number of rows any chart shows.
pub const VIEW_LIMIT: usize = 10;

/// The largest time bucket. Selecting it means "at least this long"; every
/// other bucket means "at most this long".
pub const OVERFLOW_TIME_BUCKET: u32 = 240;

/// Time dropdown entries as (label, minutes).
pub const TIME_BUCKETS: [(&str, u32); 10] = [
    ("20min", 20),
    ("30min", 30),
    ("50min", 50),
    ("1h", 60),
    ("1.5h", 90),
    ("2h", 120),
    ("2.5h", 150),
    ("3h", 180),
    ("3.5h", 210),
    ("greater_than_4h", OVERFLOW_TIME_BUCKET),
];

const RANK_BUCKET_LABELS: [&str; 10] = [
    "topmost",
    "2nd topmost",
    "3rd topmost",
    "4th topmost",
    "5th topmost",
    "6th topmost",
    "7th topmost",
    "8th topmost",
    "9th topmost",
    "10th topmost",
];

/// A `[start, end)` range of row positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RankBucket {
    pub start: usize,
    pub end: usize,
}

impl RankBucket {
    pub fn new(start: usize, end: usize) -> Self {
        RankBucket { start, end }
    }

    /// The ten rank buckets offered by the top-N dropdown, as (label, bucket).
    ///
    /// Bucket `k` covers positions `11k .. 11k + 10`.
    pub fn standard_buckets() -> Vec<(&'static str, RankBucket)> {
        RANK_BUCKET_LABELS
            .iter()
            .enumerate()
            .map(|(k, label)| (*label, RankBucket::new(k * 11, k * 11 + 10)))
            .collect()
    }

    /// Positional slice; out-of-range bounds are clamped like a list slice.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = self.start.min(rows.len());
        let end = self.end.min(rows.len()).max(start);
        &rows[start..end]
    }
}

impl FromStr for RankBucket {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = RANK_BUCKET_REGEX
            .captures(s)
            .ok_or_else(|| DashboardError::InvalidRankBucket(s.to_string()))?;
        let start = caps[1]
            .parse()
            .map_err(|_| DashboardError::InvalidRankBucket(s.to_string()))?;
        let end = caps[2]
            .parse()
            .map_err(|_| DashboardError::InvalidRankBucket(s.to_string()))?;
        Ok(RankBucket { start, end })
    }
}

impl fmt::Display for RankBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parses a time dropdown value in minutes.
pub fn parse_time_bucket(s: &str) -> Result<u32> {
    s.trim()
        .parse()
        .map_err(|_| DashboardError::InvalidTimeBucket(s.to_string()))
}

/// The four filter controls. Empty sets and `None` mean "no filter".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSelection {
    pub diets: Vec<String>,
    pub courses: Vec<String>,
    pub time_limit: Option<u32>,
    pub rank: Option<RankBucket>,
}

impl FilterSelection {
    pub fn with_diets<I, S>(mut self, diets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.diets = diets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_courses<I, S>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.courses = courses.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit = Some(minutes);
        self
    }

    pub fn with_rank(mut self, bucket: RankBucket) -> Self {
        self.rank = Some(bucket);
        self
    }

    /// Builds a selection from raw control values as they arrive from the UI:
    /// `top` as `start-end`, diet and course as comma-separated lists, time in
    /// minutes. Blank values count as unset; malformed rank or time is an error.
    ///
    /// # Examples
    /// ```
    /// use recipe_dashboard::filter::{FilterSelection, RankBucket};
    ///
    /// let selection =
    ///     FilterSelection::from_controls(Some("11-21"), Some("Vegetarian, Eggetarian"), None, Some("60"))
    ///         .unwrap();
    /// assert_eq!(selection.rank, Some(RankBucket::new(11, 21)));
    /// assert_eq!(selection.diets, vec!["Vegetarian", "Eggetarian"]);
    /// assert_eq!(selection.time_limit, Some(60));
    ///
    /// assert!(FilterSelection::from_controls(Some("top ten"), None, None, None).is_err());
    /// ```
    pub fn from_controls(
        top: Option<&str>,
        diets: Option<&str>,
        courses: Option<&str>,
        time: Option<&str>,
    ) -> Result<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }
        fn list(value: Option<&str>) -> Vec<String> {
            present(value)
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default()
        }

        Ok(FilterSelection {
            diets: list(diets),
            courses: list(courses),
            time_limit: present(time).map(parse_time_bucket).transpose()?,
            rank: present(top).map(str::parse::<RankBucket>).transpose()?,
        })
    }

    /// True when no control is set, i.e. the default overview.
    pub fn is_empty(&self) -> bool {
        self.diets.is_empty()
            && self.courses.is_empty()
            && self.time_limit.is_none()
            && self.rank.is_none()
    }

    fn keeps(&self, recipe: &Recipe) -> bool {
        (self.diets.is_empty() || self.diets.iter().any(|d| *d == recipe.diet_type))
            && (self.courses.is_empty() || self.courses.iter().any(|c| *c == recipe.meal_course))
            && self
                .time_limit
                .is_none_or(|limit| time_matches(recipe.total_time_min(), limit))
    }
}

/// Overflow bucket keeps `total >= limit`, all others keep `total <= limit`.
pub fn time_matches(total_time_min: f64, limit: u32) -> bool {
    if limit == OVERFLOW_TIME_BUCKET {
        total_time_min >= limit as f64
    } else {
        total_time_min <= limit as f64
    }
}

/// Filtered copy of at most [`VIEW_LIMIT`] recipes with unique names, in
/// dataset order.
#[derive(Clone, Serialize, Debug, Default, PartialEq)]
pub struct FilteredView {
    rows: Vec<Recipe>,
}

impl FilteredView {
    pub fn rows(&self) -> &[Recipe] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.name.as_str()).collect()
    }

    /// Builds a view directly from rows, enforcing the cap and name uniqueness.
    pub fn from_rows(rows: Vec<Recipe>) -> Self {
        let mut seen = HashSet::new();
        let rows = rows
            .into_iter()
            .take(VIEW_LIMIT)
            .filter(|r| seen.insert(r.name.clone()))
            .collect();
        FilteredView { rows }
    }
}

/// Runs diet, course and time predicates, then the rank slice over the
/// survivors, then truncates to [`VIEW_LIMIT`] and drops repeated names
/// (first occurrence wins).
///
/// An empty selection takes the same path and yields the first ten rows.
///
/// # Examples
/// ```
/// use recipe_dashboard::dataset::RecipeDataset;
/// use recipe_dashboard::filter::{apply_filters, FilterSelection};
/// use recipe_dashboard::recipe::Recipe;
///
/// let dataset = RecipeDataset::from_recipes(vec![
///     Recipe::new("Masala Dosa", "Vegetarian", "Breakfast", 20.0, 15.0),
///     Recipe::new("Chicken Biryani", "Non Vegeterian", "Main Course", 30.0, 60.0),
/// ]);
///
/// let selection = FilterSelection::default().with_diets(["Vegetarian"]);
/// let view = apply_filters(&dataset, &selection);
/// assert_eq!(view.names(), vec!["Masala Dosa"]);
/// ```
pub fn apply_filters(dataset: &RecipeDataset, selection: &FilterSelection) -> FilteredView {
    let survivors: Vec<&Recipe> = dataset
        .recipes()
        .iter()
        .filter(|r| selection.keeps(r))
        .collect();

    let ranked = match selection.rank {
        Some(bucket) => bucket.slice(&survivors),
        None => &survivors[..],
    };

    FilteredView::from_rows(
        ranked
            .iter()
            .take(VIEW_LIMIT)
            .map(|r| (*r).clone())
            .collect(),
    )
}
