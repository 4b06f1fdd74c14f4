//! Neuroevo CLI - Run mutation passes from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use neuroevo::{
    agent::Individual,
    engine::{MutationEngine, MutationRng},
    net::{Activation, EvolvableNetwork, Mlp, MlpDescriptor, OptimizerKind},
    schema::{Algorithm, MutationConfig},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [generations]", args[0]);
        eprintln!();
        eprintln!("Run mutation passes over a demo DDPG population.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to mutation engine configuration file");
        eprintln!("  generations  Number of mutation passes (default: 10)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let generations: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10);

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: MutationConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let mut engine = MutationEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    });

    let actor = MlpDescriptor {
        num_inputs: 8,
        num_outputs: 2,
        hidden_sizes: vec![64, 64],
        activation: Activation::Relu,
        layer_norm: false,
    };
    let critic = MlpDescriptor {
        num_inputs: 10,
        num_outputs: 1,
        hidden_sizes: vec![64, 64],
        activation: Activation::Relu,
        layer_norm: false,
    };

    let mut rng = MutationRng::new(0);
    let mut population: Vec<Individual<Mlp>> = (0..8)
        .map(|_| {
            Individual::new(
                Algorithm::Ddpg,
                &actor,
                &critic,
                OptimizerKind::Adam,
                1e-3,
                64,
                rng.inner(),
            )
            .unwrap_or_else(|e| {
                eprintln!("Error building population: {}", e);
                std::process::exit(1);
            })
        })
        .collect();

    println!("Neuroevo Mutation Pass");
    println!("======================");
    println!("Population: {} DDPG individuals", population.len());
    println!("Generations: {}", generations);
    println!();

    let start = Instant::now();
    for generation in 1..=generations {
        population = engine.mutate_population(population).unwrap_or_else(|e| {
            eprintln!("Mutation pass failed: {}", e);
            std::process::exit(1);
        });

        let labels: Vec<&str> = population.iter().map(|i| i.last_mutation.tag()).collect();
        println!("gen {:>3}: {}", generation, labels.join(" "));
    }
    let elapsed = start.elapsed().as_secs_f64();

    println!();
    println!(
        "{} passes in {:.3}s ({:.1} individuals/s)",
        generations,
        elapsed,
        (generations * population.len()) as f64 / elapsed
    );
    for (i, individual) in population.iter().enumerate() {
        println!(
            "individual {}: hidden={:?} lr={:.5} batch={}",
            i,
            individual.actor.eval.descriptor().hidden_sizes,
            individual.lr,
            individual.batch_size
        );
    }
}

fn print_example_config() {
    let config = MutationConfig {
        random_seed: Some(42),
        ..Default::default()
    };
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example config: {}", e),
    }
}
