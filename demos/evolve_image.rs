use std::env;
use std::time::Instant;

use image::RgbaImage;
use semblance::domains::raster::{save_png, RasterDomain};
use semblance::{Evolution, RunOutcome};

// Evolve a raw RGBA buffer toward a target PNG, saving the best organism to
// ./evolved.png and printing a terminal preview every 100 generations.
fn main() {
    env_logger::init();

    let target_path = env::args().nth(1).unwrap_or_else(|| "./ml.png".to_string());
    let domain = match RasterDomain::from_png(&target_path, 7500.0) {
        Ok(domain) => domain,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    preview(domain.target());

    let mut evolution = Evolution::from_parameter_file("demos/parameters/evolve_image.yaml", domain)
        .expect("valid parameters");

    let start = Instant::now();
    let outcome = evolution.run_with_observer(1_000_000, 100, |generation, best| {
        println!(
            "time so far: {:?} | generation: {} | fitness: {}",
            start.elapsed(),
            generation,
            best.fitness()
        );
        if let Err(e) = save_png(best.artifact(), "./evolved.png") {
            eprintln!("{e}");
        }
        preview(best.artifact());
    });

    match outcome {
        RunOutcome::Converged { generation } => {
            println!(
                "converged at generation {} in {:?}",
                generation,
                start.elapsed()
            );
            if let Err(e) = save_png(evolution.best().artifact(), "./evolved.png") {
                eprintln!("{e}");
            }
        }
        RunOutcome::GenerationLimit { generation } => {
            println!("gave up after {} generations", generation);
        }
    }
}

// Coarse truecolor preview using half-block characters, two image rows per
// terminal row.
fn preview(img: &RgbaImage) {
    const MAX_COLS: u32 = 48;

    let step = (img.width() / MAX_COLS).max(1);
    let mut y = 0;
    while y + step < img.height() {
        let mut x = 0;
        while x < img.width() {
            let top = img.get_pixel(x, y).0;
            let bottom = img.get_pixel(x, y + step).0;
            print!(
                "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                top[0], top[1], top[2], bottom[0], bottom[1], bottom[2]
            );
            x += step;
        }
        println!("\x1b[0m");
        y += 2 * step;
    }
}
