use anyhow::{bail, Context, Result};
use karva::config::ConfigManager;
use karva::engines::generation::{LogProgressCallback, Population};
use karva::functions::{or_linker, sum_linker};
use karva::problems::{Majority, Problem, Regression};
use rand::rngs::StdRng;
use rand::SeedableRng;

const GENERATIONS: usize = 100;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let demo = args.next().unwrap_or_else(|| "regression".to_string());

    let manager = ConfigManager::new();
    if let Some(path) = args.next() {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading {}", path))?;
    }
    let config = manager.get()?.evolution;

    match demo.as_str() {
        "regression" => {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let problem = Regression::new(&mut rng)?;
            let population = Population::with_config(problem, 30, 8, 4, sum_linker, config)?;
            run(population)
        }
        "majority" => {
            let population =
                Population::with_config(Majority::new()?, 10, 3, 3, or_linker, config)?;
            run(population)
        }
        other => bail!("unknown demo '{}', expected 'regression' or 'majority'", other),
    }
}

fn run<P: Problem>(mut population: Population<P>) -> Result<()> {
    println!("{}", population);

    let solved = population.solve_with(GENERATIONS, &mut LogProgressCallback::default())?;
    println!("{}", population);

    if solved {
        println!("SOLVED: {}", population.best());
    } else {
        println!("Best after {} generations: {}", population.age(), population.best());
    }
    Ok(())
}
