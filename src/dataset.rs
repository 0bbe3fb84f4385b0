use crate::recipe::Recipe;
use serde::Serialize;
use std::collections::BTreeSet; // sorted, unique dropdown vocabularies
use std::sync::OnceLock;

static GLOBAL_DATASET: OnceLock<RecipeDataset> = OnceLock::new();

/// Immutable recipe table, ordered by popularity (most viewed first).
///
/// Row order is meaningful: rank buckets slice by position, so the table is
/// never re-sorted after loading.
#[derive(Clone, Serialize, Debug, Default)]
pub struct RecipeDataset {
    recipes: Vec<Recipe>,
}

impl RecipeDataset {
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        RecipeDataset { recipes }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    /// Sorted unique diet types, as offered by the diet dropdown.
    pub fn diet_types(&self) -> BTreeSet<&str> {
        self.recipes.iter().map(|r| r.diet_type.as_str()).collect()
    }

    /// Sorted unique meal courses, as offered by the course dropdown.
    pub fn meal_courses(&self) -> BTreeSet<&str> {
        self.recipes.iter().map(|r| r.meal_course.as_str()).collect()
    }

    /// Installs the process-wide dataset. The first call wins; later calls
    /// get the already installed table back and their argument is dropped.
    pub fn install_global(self) -> &'static RecipeDataset {
        if GLOBAL_DATASET.get().is_some() {
            log::warn!("recipe dataset already installed, ignoring reload");
        }
        GLOBAL_DATASET.get_or_init(|| self)
    }
}
