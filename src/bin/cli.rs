#![cfg(not(tarpaulin_include))]

use recipe_dashboard::aggregate::LABEL_SEPARATOR;
use recipe_dashboard::config::init_logging;
use recipe_dashboard::dashboard::{DashboardUpdate, update_dashboard};
use recipe_dashboard::filter::FilterSelection;
use recipe_dashboard::loader;

use std::env;
use std::io::{self, Write};
use std::time::Instant;

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <recipes.csv|xlsx> [--top a-b] [--diet x,y] [--course x,y] [--time n] [--once]",
        program
    );
}

fn print_help() {
    println!("Commands:");
    println!("  q: Quit");
    println!("  top <start-end>: Rank bucket, e.g. top 11-21");
    println!("  diet <a,b>: Diet types (empty clears)");
    println!("  course <a,b>: Meal courses (empty clears)");
    println!("  time <minutes>: Time bucket (240 means at least 240)");
    println!("  clear: Reset every filter");
    println!("  options: List diet types and meal courses");
}

fn display(update: &DashboardUpdate) {
    if update.view.is_empty() {
        println!("(no recipes match)");
        return;
    }

    println!(
        "{:>2}  {:<32} {:<16} {:<14} {:>6}  {:<16} map label",
        "#", "dish", "diet", "course", "total", "state"
    );
    for (i, (recipe, label)) in update
        .view
        .rows()
        .iter()
        .zip(update.state_labels.iter())
        .enumerate()
    {
        println!(
            "{:>2}  {:<32} {:<16} {:<14} {:>6}  {:<16} {}",
            i,
            recipe.name,
            recipe.diet_type,
            recipe.meal_course,
            recipe.total_time_min(),
            recipe.state.as_deref().unwrap_or("-"),
            label
                .as_deref()
                .map(|l| l.replace(LABEL_SEPARATOR, " | "))
                .unwrap_or_default()
        );
    }
}

// Applies one `--flag value` or REPL `command value` pair to the selection
fn apply_control(selection: &mut FilterSelection, control: &str, value: &str) -> Result<(), String> {
    let (top, diet, course, time) = match control {
        "top" => (Some(value), None, None, None),
        "diet" => (None, Some(value), None, None),
        "course" => (None, None, Some(value), None),
        "time" => (None, None, None, Some(value)),
        _ => return Err(format!("unknown control '{}'", control)),
    };
    let parsed = FilterSelection::from_controls(top, diet, course, time).map_err(|e| e.to_string())?;

    match control {
        "top" => selection.rank = parsed.rank,
        "diet" => selection.diets = parsed.diets,
        "course" => selection.courses = parsed.courses,
        _ => selection.time_limit = parsed.time_limit,
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(2);
    }

    let dataset = loader::load_dataset(&args[1])?;
    let mut selection = FilterSelection::default();
    let mut once = false;

    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        if flag == "--once" {
            once = true;
            continue;
        }
        let (Some(control), Some(value)) = (flag.strip_prefix("--"), rest.next()) else {
            print_usage(&args[0]);
            std::process::exit(2);
        };
        if let Err(e) = apply_control(&mut selection, control, value) {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }

    if once {
        display(&update_dashboard(&dataset, &selection));
        return Ok(());
    }

    let mut start_time = Instant::now();
    let mut status = String::from("ok");
    let mut show = true;
    loop {
        if show {
            display(&update_dashboard(&dataset, &selection));
        }

        let elapsed_time = start_time.elapsed().as_secs_f64();
        print!("[{:.1}] ({}) > ", elapsed_time, status);
        io::stdout().flush()?;

        let mut command = String::new();
        if io::stdin().read_line(&mut command)? == 0 {
            break;
        }
        let command = command.trim();
        start_time = Instant::now();
        show = true;

        match command {
            "" => {
                status = String::from("invalid command");
                show = false;
            }
            "q" => break,
            "help" => {
                print_help();
                show = false;
            }
            "clear" => {
                selection = FilterSelection::default();
                status = String::from("ok");
            }
            "options" => {
                println!("diet: {:?}", dataset.diet_types());
                println!("course: {:?}", dataset.meal_courses());
                show = false;
            }
            _ => {
                let (control, value) = command.split_once(' ').unwrap_or((command, ""));
                status = match apply_control(&mut selection, control, value) {
                    Ok(()) => String::from("ok"),
                    Err(e) => {
                        show = false;
                        e
                    }
                };
            }
        }
    }

    Ok(())
}
