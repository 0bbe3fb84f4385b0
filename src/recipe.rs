use serde::Serialize;

/// Nutrient content of one recipe, in grams (energy in kcal).
#[derive(Clone, Copy, Serialize, Debug, Default, PartialEq)]
pub struct Nutrients {
    pub protein_g: f64,
    pub carb_g: f64,
    pub fat_g: f64,
    pub fibre_g: f64,
    pub energy_kcal: f64,
}

/// One row of the recipe table.
///
/// The total time is derived once from the preparation and cooking times and
/// can only change through [`Recipe::set_times`], so it always equals their sum.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Recipe {
    pub name: String,
    pub diet_type: String,
    pub meal_course: String,
    prep_time_min: f64,
    cook_time_min: f64,
    total_time_min: f64,
    pub servings: f64,
    pub content_view: f64,
    pub state: Option<String>,
    pub state_id: Option<String>,
    pub nutrients: Nutrients,
}

impl Recipe {
    pub fn new(
        name: impl Into<String>,
        diet_type: impl Into<String>,
        meal_course: impl Into<String>,
        prep_time_min: f64,
        cook_time_min: f64,
    ) -> Self {
        Recipe {
            name: name.into(),
            diet_type: diet_type.into(),
            meal_course: meal_course.into(),
            prep_time_min,
            cook_time_min,
            total_time_min: prep_time_min + cook_time_min,
            servings: 0.0,
            content_view: 0.0,
            state: None,
            state_id: None,
            nutrients: Nutrients::default(),
        }
    }

    pub fn with_state(mut self, state: Option<String>, state_id: Option<String>) -> Self {
        self.state = state;
        self.state_id = state_id;
        self
    }

    pub fn with_popularity(mut self, content_view: f64, servings: f64) -> Self {
        self.content_view = content_view;
        self.servings = servings;
        self
    }

    pub fn with_nutrients(mut self, nutrients: Nutrients) -> Self {
        self.nutrients = nutrients;
        self
    }

    pub fn prep_time_min(&self) -> f64 {
        self.prep_time_min
    }

    pub fn cook_time_min(&self) -> f64 {
        self.cook_time_min
    }

    pub fn total_time_min(&self) -> f64 {
        self.total_time_min
    }

    pub fn set_times(&mut self, prep_time_min: f64, cook_time_min: f64) {
        self.prep_time_min = prep_time_min;
        self.cook_time_min = cook_time_min;
        self.total_time_min = prep_time_min + cook_time_min;
    }

    /// First whitespace-separated word of the dish name, used as a short axis tick.
    pub fn short_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}
