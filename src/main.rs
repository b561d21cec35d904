use neatkit::params::*;
use neatkit::population::*;

const XOR_RESULTS: [((f64, f64), f64); 4] = [
    ((0.0, 0.0), 0.0),
    ((0.0, 1.0), 1.0),
    ((1.0, 0.0), 1.0),
    ((1.0, 1.0), 0.0),
];

fn main() -> neatkit::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_json_file(path)?,
        None => Config {
            genome_count: 150,
            input_count: 2,
            output_count: 1,
            max_stagnation: 15,
            species_compatibility: SpeciesCompatibility {
                threshold: 0.3,
                ..Default::default()
            },
            ..Default::default()
        },
    };
    let mut population = Population::with_seed(&config, 42)?;

    for _ in 0..300 {
        eval_population(&mut population);
        if population.get_winner().map_or(false, |g| g.fitness > 3.9) {
            break;
        }
        population.evolve()?;
    }

    eval_population(&mut population);
    let Some(genome) = population.get_winner() else {
        return Ok(());
    };
    let mut genome = genome.clone();
    println!(
        "generation {}, fitness {:.3}, {} genes",
        population.generation(),
        genome.fitness,
        genome.genes().len()
    );

    for ((lhs, rhs), _) in XOR_RESULTS {
        let output = genome.feed_forward(population.config(), &[lhs, rhs])?[0];
        println!("{} XOR {} = {:.3}", lhs, rhs, output);
    }

    genome.print_dot();
    Ok(())
}

fn eval_population(population: &mut Population) {
    population.evaluate(|genome, config| {
        genome.fitness = 0.0;
        for ((lhs, rhs), expected) in XOR_RESULTS.iter() {
            if let Ok(outputs) = genome.feed_forward(config, &[*lhs, *rhs]) {
                genome.fitness += 1.0 - (outputs[0] - expected).abs();
            }
        }
    });
}
