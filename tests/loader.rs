use recipe_dashboard::error::DashboardError;
use recipe_dashboard::loader::{from_csv, from_csv_str, load_dataset};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

const RECIPE_CSV: &str = "\
name of the dish,type of diet,course of meal,preparation time(min),cooking time(min),total time(min),servings,content view,state,state_id,protein gms,carb gms,fat gms,fibre gms,energy Kcal
Butter Chicken,Non Vegeterian,Main Course,20,40,999,4,12000,Punjab,PB,28.5,10,22,1.5,410
\"Dal Makhani, Restaurant Style\",Vegetarian,Main Course,480,60,,4,11000,Punjab,PB,12,30,14,8,300
Masala Dosa,Vegetarian,Breakfast,30,20,,2,9000,Karnataka,KA,6,48,9,3,290
Gulab Jamun,Vegetarian,Dessert,15,25,,6,8000,,,4,55,12,0.5,380
";

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_rows_in_file_order() {
    let file = csv_file(RECIPE_CSV);
    let dataset = load_dataset(file.path()).unwrap();

    let names: Vec<&str> = dataset.recipes().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Butter Chicken", "Dal Makhani, Restaurant Style", "Masala Dosa", "Gulab Jamun"]
    );
}

#[test]
fn total_time_is_derived_not_read() {
    let dataset = from_csv_str(RECIPE_CSV).unwrap();
    let butter_chicken = &dataset.recipes()[0];
    assert_eq!(butter_chicken.prep_time_min(), 20.0);
    assert_eq!(butter_chicken.cook_time_min(), 40.0);
    assert_eq!(butter_chicken.total_time_min(), 60.0);

    assert_eq!(dataset.recipes()[1].total_time_min(), 540.0);
}

#[test]
fn optional_columns_are_parsed() {
    let dataset = from_csv_str(RECIPE_CSV).unwrap();
    let r = &dataset.recipes()[0];
    assert_eq!(r.servings, 4.0);
    assert_eq!(r.content_view, 12000.0);
    assert_eq!(r.state.as_deref(), Some("Punjab"));
    assert_eq!(r.state_id.as_deref(), Some("PB"));
    assert_eq!(r.nutrients.protein_g, 28.5);
    assert_eq!(r.nutrients.fibre_g, 1.5);
    assert_eq!(r.nutrients.energy_kcal, 410.0);
    assert_eq!(r.short_name(), "Butter");
}

#[test]
fn empty_state_reads_as_none() {
    let dataset = from_csv_str(RECIPE_CSV).unwrap();
    let gulab_jamun = &dataset.recipes()[3];
    assert_eq!(gulab_jamun.state, None);
    assert_eq!(gulab_jamun.state_id, None);
}

#[test]
fn dropdown_vocabularies_are_sorted_and_unique() {
    let dataset = from_csv_str(RECIPE_CSV).unwrap();
    let diets: Vec<&str> = dataset.diet_types().into_iter().collect();
    assert_eq!(diets, vec!["Non Vegeterian", "Vegetarian"]);
    let courses: Vec<&str> = dataset.meal_courses().into_iter().collect();
    assert_eq!(courses, vec!["Breakfast", "Dessert", "Main Course"]);
}

#[test]
fn minimal_columns_are_enough() {
    let csv = "Name,Diet Type,Meal Course,Prep Time Min,Cook Time Min\nIdli,Vegetarian,Breakfast,10,12\n";
    let dataset = from_csv_str(csv).unwrap();
    assert_eq!(dataset.len(), 1);
    let idli = &dataset.recipes()[0];
    assert_eq!(idli.total_time_min(), 22.0);
    assert_eq!(idli.content_view, 0.0);
    assert_eq!(idli.state, None);
}

#[test]
fn blank_and_nameless_rows_are_skipped() {
    let csv = "name,diet_type,meal_course,prep_time_min,cook_time_min\n\
               Idli,Vegetarian,Breakfast,10,12\n\
               ,,,,\n\
               ,Vegetarian,Snack,5,5\n\
               Vada,Vegetarian,Snack,15,10\n";
    let dataset = from_csv_str(csv).unwrap();
    let names: Vec<&str> = dataset.recipes().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Idli", "Vada"]);
}

#[test]
fn missing_required_column_is_reported() {
    let csv = "name of the dish,type of diet,preparation time(min),cooking time(min)\nIdli,Vegetarian,10,12\n";
    match from_csv_str(csv) {
        Err(DashboardError::MissingColumn(column)) => assert_eq!(column, "course_of_meal"),
        other => panic!("expected missing column, got {:?}", other),
    }
}

#[test]
fn non_numeric_time_is_reported_with_its_row() {
    let csv = "name,diet_type,meal_course,prep_time_min,cook_time_min\n\
               Idli,Vegetarian,Breakfast,10,12\n\
               Vada,Vegetarian,Snack,quick,10\n";
    match from_csv_str(csv) {
        Err(DashboardError::InvalidValue { row, value, .. }) => {
            assert_eq!(row, 3);
            assert_eq!(value, "quick");
        }
        other => panic!("expected invalid value, got {:?}", other),
    }
}

#[test]
fn unterminated_quote_is_a_csv_error() {
    let csv = "name,diet_type,meal_course,prep_time_min,cook_time_min\n\"Idli,Vegetarian,Breakfast,10,12\n";
    assert!(matches!(from_csv_str(csv), Err(DashboardError::Csv { line: 2, .. })));
}

#[test]
fn empty_source_is_rejected() {
    assert!(matches!(from_csv_str(""), Err(DashboardError::EmptySource)));
    assert!(matches!(from_csv_str("\n  \n"), Err(DashboardError::EmptySource)));
}

#[test]
fn unknown_extension_is_rejected() {
    let file = Builder::new().suffix(".json").tempfile().unwrap();
    assert!(matches!(
        load_dataset(file.path()),
        Err(DashboardError::UnsupportedFormat(ext)) if ext == "json"
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    assert!(matches!(from_csv(&path), Err(DashboardError::Io(_))));
}

#[test]
fn non_finite_or_negative_numbers_are_rejected() {
    for (bad, column) in [
        ("NaN,12", "preparation time(min)"),
        ("-500,10", "preparation time(min)"),
        ("inf,10", "preparation time(min)"),
        ("10,-infinity", "cooking time(min)"),
    ] {
        let csv = format!(
            "name,diet_type,meal_course,prep_time_min,cook_time_min\n\
             Idli,Vegetarian,Breakfast,10,12\n\
             Vada,Vegetarian,Snack,{}\n",
            bad
        );
        match from_csv_str(&csv) {
            Err(DashboardError::InvalidValue { row, column: c, .. }) => {
                assert_eq!(row, 3, "{}", bad);
                assert_eq!(c, column, "{}", bad);
            }
            other => panic!("'{}' should be rejected, got {:?}", bad, other),
        }
    }

    let csv = "name,diet_type,meal_course,prep_time_min,cook_time_min,content_view\n\
               Idli,Vegetarian,Breakfast,10,12,-1\n";
    assert!(matches!(
        from_csv_str(csv),
        Err(DashboardError::InvalidValue { column: "content view", .. })
    ));

    // zero is a valid time
    let csv = "name,diet_type,meal_course,prep_time_min,cook_time_min\nSalad,Vegetarian,Snack,5,0\n";
    assert_eq!(from_csv_str(csv).unwrap().recipes()[0].total_time_min(), 5.0);
}
