//MIT License
#![allow(non_snake_case)]
use std::env;
use std::process::ExitCode;
use strum::IntoEnumIterator;
use trapflow::Utils::csv_export::save_grid_to_csv;
use trapflow::Utils::plots::plot_trapezoids;
use trapflow::Utils::task_parser::load_task_file;
use trapflow::numerical::examples_and_utils::FlowPreset;
use trapflow::numerical::volume_solver::{IntegrationRequest, IntegrationResult, VolumeSolver};

fn report(name: &str, request: &IntegrationRequest, result: &IntegrationResult) {
    println!("=== {} ===", name);
    println!(
        "F(t) = {} over [{}, {}], h = {}",
        request.function_text, request.a, request.b, request.h
    );
    println!("estimated water volume: {:.4} m^3", result.volume);
    match result.analytic {
        Some(exact) => println!("analytic volume:        {:.4} m^3", exact),
        None => println!("analytic volume:        not available"),
    }
    match result.relative_error_pct {
        Some(pct) => println!("relative error:         {:.2}%", pct),
        None => println!("relative error:         unavailable (no analytic reference)"),
    }
    if result.verdict.met {
        println!(
            "demand of {:.2} m^3 is MET, irrigation can proceed",
            result.verdict.demand
        );
    } else {
        println!(
            "demand of {:.2} m^3 is NOT met, supply falls short",
            result.verdict.demand
        );
    }
    println!();
}

fn run(name: &str, request: IntegrationRequest) -> Result<(), String> {
    let mut solver = VolumeSolver::with_loglevel(request.clone(), "info");
    let result = solver.solve().map_err(|e| e.to_string())?;
    report(name, &request, &result);

    let png = format!("{}.png", name);
    let csv = format!("{}.csv", name);
    plot_trapezoids(&result.grid, &request.function_text, &png);
    save_grid_to_csv(&result.grid, &csv, "t", "F(t)").map_err(|e| e.to_string())?;
    Ok(())
}

fn main() -> ExitCode {
    // with a task file argument run that single scenario, otherwise the catalogue
    let outcome = match env::args().nth(1) {
        Some(path) => load_task_file(&path)
            .map_err(|e| e.to_string())
            .and_then(|request| run("task", request)),
        None => FlowPreset::iter().try_for_each(|preset| {
            let name = format!("{:?}", preset);
            println!("{}: {}", name, preset.description());
            run(&name, preset.request())
        }),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}
