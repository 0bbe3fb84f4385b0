#![cfg(not(tarpaulin_include))]

use crate::dataset::RecipeDataset;
use crate::error::{DashboardError, Result};
use crate::recipe::{Nutrients, Recipe};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Accepted header spellings per column, after normalisation
/// (trimmed, lowercased, spaces replaced by underscores).
const NAME_HEADERS: &[&str] = &["name_of_the_dish", "name"];
const DIET_HEADERS: &[&str] = &["type_of_diet", "diet_type"];
const COURSE_HEADERS: &[&str] = &["course_of_meal", "meal_course"];
const PREP_HEADERS: &[&str] = &["preparation_time(min)", "prep_time_min"];
const COOK_HEADERS: &[&str] = &["cooking_time(min)", "cook_time_min"];
const SERVINGS_HEADERS: &[&str] = &["servings"];
const VIEW_HEADERS: &[&str] = &["content_view", "content_views"];
const STATE_HEADERS: &[&str] = &["state"];
const STATE_ID_HEADERS: &[&str] = &["state_id"];
const PROTEIN_HEADERS: &[&str] = &["protein_gms", "protein_g"];
const CARB_HEADERS: &[&str] = &["carb_gms", "carb_g"];
const FAT_HEADERS: &[&str] = &["fat_gms", "fat_g"];
const FIBRE_HEADERS: &[&str] = &["fibre_gms", "fibre_g", "fiber_gms"];
const ENERGY_HEADERS: &[&str] = &["energy_kcal"];

/// Column positions resolved from the header row.
struct ColumnMap {
    name: usize,
    diet: usize,
    course: usize,
    prep: usize,
    cook: usize,
    servings: Option<usize>,
    content_view: Option<usize>,
    state: Option<usize>,
    state_id: Option<usize>,
    protein: Option<usize>,
    carb: Option<usize>,
    fat: Option<usize>,
    fibre: Option<usize>,
    energy: Option<usize>,
}

fn normalise_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| aliases.contains(&h.as_str()))
}

fn require_column(headers: &[String], aliases: &[&'static str]) -> Result<usize> {
    find_column(headers, aliases).ok_or(DashboardError::MissingColumn(aliases[0]))
}

impl ColumnMap {
    fn resolve(raw_headers: &[String]) -> Result<Self> {
        let headers: Vec<String> = raw_headers.iter().map(|h| normalise_header(h)).collect();
        Ok(ColumnMap {
            name: require_column(&headers, NAME_HEADERS)?,
            diet: require_column(&headers, DIET_HEADERS)?,
            course: require_column(&headers, COURSE_HEADERS)?,
            prep: require_column(&headers, PREP_HEADERS)?,
            cook: require_column(&headers, COOK_HEADERS)?,
            servings: find_column(&headers, SERVINGS_HEADERS),
            content_view: find_column(&headers, VIEW_HEADERS),
            state: find_column(&headers, STATE_HEADERS),
            state_id: find_column(&headers, STATE_ID_HEADERS),
            protein: find_column(&headers, PROTEIN_HEADERS),
            carb: find_column(&headers, CARB_HEADERS),
            fat: find_column(&headers, FAT_HEADERS),
            fibre: find_column(&headers, FIBRE_HEADERS),
            energy: find_column(&headers, ENERGY_HEADERS),
        })
    }
}

fn cell_text(cells: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| cells.get(i))
        .map(|s| s.trim())
        .unwrap_or("")
}

fn optional_text(cells: &[String], index: Option<usize>) -> Option<String> {
    let text = cell_text(cells, index);
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// Empty numeric cells read as zero; anything else must be a finite, non-negative number
fn number(cells: &[String], index: Option<usize>, row: usize, column: &'static str) -> Result<f64> {
    let text = cell_text(cells, index);
    if text.is_empty() {
        return Ok(0.0);
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(DashboardError::InvalidValue {
            row,
            column,
            value: text.to_string(),
        }),
    }
}

/// Turns a header row plus data rows into a dataset, keeping row order.
///
/// `first_row` is the 1-based source line of the first data row and is only
/// used in error messages.
fn build_dataset(
    headers: &[String],
    rows: impl IntoIterator<Item = Vec<String>>,
    first_row: usize,
) -> Result<RecipeDataset> {
    let columns = ColumnMap::resolve(headers)?;
    let mut recipes = Vec::new();

    for (offset, cells) in rows.into_iter().enumerate() {
        let row = first_row + offset;
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let name = cell_text(&cells, Some(columns.name));
        if name.is_empty() {
            log::warn!("skipping recipe row {} without a dish name", row);
            continue;
        }

        let prep = number(&cells, Some(columns.prep), row, "preparation time(min)")?;
        let cook = number(&cells, Some(columns.cook), row, "cooking time(min)")?;
        let nutrients = Nutrients {
            protein_g: number(&cells, columns.protein, row, "protein gms")?,
            carb_g: number(&cells, columns.carb, row, "carb gms")?,
            fat_g: number(&cells, columns.fat, row, "fat gms")?,
            fibre_g: number(&cells, columns.fibre, row, "fibre gms")?,
            energy_kcal: number(&cells, columns.energy, row, "energy Kcal")?,
        };

        let recipe = Recipe::new(
            name,
            cell_text(&cells, Some(columns.diet)),
            cell_text(&cells, Some(columns.course)),
            prep,
            cook,
        )
        .with_popularity(
            number(&cells, columns.content_view, row, "content view")?,
            number(&cells, columns.servings, row, "servings")?,
        )
        .with_state(
            optional_text(&cells, columns.state),
            optional_text(&cells, columns.state_id),
        )
        .with_nutrients(nutrients);

        recipes.push(recipe);
    }

    Ok(RecipeDataset::from_recipes(recipes))
}

/// Load the recipe table from CSV text
///
/// The first non-empty line is the header row. Fields may be double-quoted,
/// with `""` standing for a literal quote.
///
/// # Examples
/// ```
/// use recipe_dashboard::loader::from_csv_str;
///
/// let csv = "name of the dish,type of diet,course of meal,preparation time(min),cooking time(min),state\n\
///            Masala Dosa,Vegetarian,Breakfast,20,15,Karnataka\n";
/// let dataset = from_csv_str(csv).unwrap();
/// assert_eq!(dataset.len(), 1);
/// assert_eq!(dataset.recipes()[0].total_time_min(), 35.0);
/// ```
pub fn from_csv_str(content: &str) -> Result<RecipeDataset> {
    let lines: Vec<&str> = content.lines().collect();
    from_csv_lines(&lines)
}

/// Load the recipe table from a CSV file
///
/// # Examples
/// ```no_run
/// use recipe_dashboard::loader::from_csv;
///
/// match from_csv("recipes.csv") {
///     Ok(dataset) => println!("Loaded {} recipes", dataset.len()),
///     Err(e) => eprintln!("Error loading CSV: {}", e),
/// }
/// ```
pub fn from_csv(filepath: impl AsRef<Path>) -> Result<RecipeDataset> {
    let file = File::open(filepath)?;
    let reader = BufReader::new(file);
    let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    from_csv_lines(&lines)
}

fn from_csv_lines(lines: &[&str]) -> Result<RecipeDataset> {
    let header_index = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .ok_or(DashboardError::EmptySource)?;

    let headers = parse_csv_row(lines[header_index], header_index + 1)?;
    let mut rows = Vec::with_capacity(lines.len() - header_index - 1);
    for (i, line) in lines.iter().enumerate().skip(header_index + 1) {
        rows.push(parse_csv_row(line, i + 1)?);
    }

    build_dataset(&headers, rows, header_index + 2)
}

// Parse a CSV row into a vector of strings
fn parse_csv_row(line: &str, line_number: usize) -> Result<Vec<String>> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Escaped quote inside a quoted field
                    current_field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                result.push(std::mem::take(&mut current_field));
            }
            _ => {
                current_field.push(c);
            }
        }
    }

    if in_quotes {
        return Err(DashboardError::Csv {
            line: line_number,
            message: "unterminated quoted field".to_string(),
        });
    }

    result.push(current_field);
    Ok(result)
}

/// Load the recipe table from the first sheet of an Excel workbook
///
/// # Examples
/// ```no_run
/// use recipe_dashboard::loader::from_excel;
///
/// match from_excel("recipe_final_list.xlsx") {
///     Ok(dataset) => println!("Loaded {} recipes", dataset.len()),
///     Err(e) => eprintln!("Error loading Excel: {}", e),
/// }
/// ```
#[cfg(feature = "web")]
pub fn from_excel(filepath: impl AsRef<Path>) -> Result<RecipeDataset> {
    use calamine::{Reader, Xlsx, open_workbook};

    let mut workbook: Xlsx<_> =
        open_workbook(filepath).map_err(|e| DashboardError::Excel(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DashboardError::Excel("no sheets found in workbook".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DashboardError::Excel(e.to_string()))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());

    let headers = rows.next().ok_or(DashboardError::EmptySource)?;
    build_dataset(&headers, rows, 2)
}

/// Detect file type and load the recipe table
///
/// # Examples
/// ```no_run
/// use recipe_dashboard::loader::load_dataset;
///
/// match load_dataset("recipes.csv") {
///     Ok(dataset) => println!("Loaded {} recipes", dataset.len()),
///     Err(e) => eprintln!("Error loading file: {}", e),
/// }
/// ```
pub fn load_dataset(filepath: impl AsRef<Path>) -> Result<RecipeDataset> {
    let path = filepath.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    let dataset = match extension.as_deref() {
        Some("csv") => from_csv(path)?,
        #[cfg(feature = "web")]
        Some("xlsx") | Some("xls") => from_excel(path)?,
        #[cfg(not(feature = "web"))]
        Some("xlsx") | Some("xls") => {
            return Err(DashboardError::UnsupportedFormat(
                "excel support requires the 'web' feature".to_string(),
            ));
        }
        Some(ext) => return Err(DashboardError::UnsupportedFormat(ext.to_string())),
        None => return Err(DashboardError::UnsupportedFormat("no extension".to_string())),
    };

    log::info!("loaded {} recipes from {}", dataset.len(), path.display());
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let row = parse_csv_row(r#"a,"b, c","say ""hi""",,"#, 1).unwrap();
        assert_eq!(row, vec!["a", "b, c", "say \"hi\"", "", ""]);
    }

    #[test]
    fn unterminated_quote_is_reported_with_line() {
        match parse_csv_row(r#"a,"b"#, 7) {
            Err(DashboardError::Csv { line, .. }) => assert_eq!(line, 7),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn headers_are_normalised() {
        assert_eq!(normalise_header(" Name of the Dish "), "name_of_the_dish");
        assert_eq!(normalise_header("energy Kcal"), "energy_kcal");
    }
}
