use std::io::{self, Write};
use std::time::Instant;

use semblance::domains::text::TextDomain;
use semblance::{Evolution, RunOutcome};

// Evolve a quote from random printable bytes, printing the best organism of
// every generation as the run goes.
fn main() {
    env_logger::init();

    let target = "To be or not to be, that is the question.";
    let domain = TextDomain::new(target).expect("non-empty target");

    let mut evolution = Evolution::from_parameter_file("demos/parameters/evolve_quote.yaml", domain)
        .expect("valid parameters");

    let start = Instant::now();
    let outcome = evolution.run_with_observer(100_000, 1, |generation, best| {
        print!(
            "\r generation: {} | {} | fitness: {:.2}",
            generation,
            String::from_utf8_lossy(best.artifact()),
            best.fitness()
        );
        let _ = io::stdout().flush();
    });

    match outcome {
        RunOutcome::Converged { generation } => {
            println!(
                "\nmatched {:?} at generation {} in {:?}",
                target,
                generation,
                start.elapsed()
            );
        }
        RunOutcome::GenerationLimit { generation } => {
            println!("\ngave up after {} generations", generation);
        }
    }
}
