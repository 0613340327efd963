use clap::{Parser, ValueEnum};
use rand::Rng;
use set_cover_random::{GeneratorConfig, WeightSpec};
use std::{fs::File, io::Write, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, ValueEnum, Copy, Clone)]
enum WeightKind {
    Unit,
    Integer,
    Uniform,
}

#[derive(Parser)]
struct Args {
    #[arg(help = "Output directory for the instances")]
    output_dir: PathBuf,
    #[arg(short = 'k', long, default_value_t = 50, help = "Number of sets")]
    sets: usize,
    #[arg(short = 'n', long, default_value_t = 200, help = "Number of elements")]
    elements: usize,
    #[arg(
        short = 'c',
        long,
        default_value_t = 5.0,
        help = "Average number of sets containing each element"
    )]
    coverage: f64,
    #[arg(
        short,
        long,
        default_value = "integer",
        help = "Distribution of set weights"
    )]
    weight: WeightKind,
    #[arg(short = 'm', long, default_value_t = 5, help = "Minimum set weight")]
    min_weight: u64,
    #[arg(short = 'M', long, default_value_t = 99, help = "Maximum set weight")]
    max_weight: u64,
    #[arg(
        short,
        long,
        help = "Starting seed for generation, instances are given sequential seeds"
    )]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1, help = "Number of instances to generate")]
    count: usize,
}

/// Seed of the `i`-th instance; wraps around at `u64::MAX`.
fn instance_seed(seed: u64, i: usize) -> u64 {
    seed.wrapping_add(i as u64)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let weight = match args.weight {
        WeightKind::Unit => WeightSpec::Unit,
        WeightKind::Integer => WeightSpec::Integer {
            lo: args.min_weight,
            hi: args.max_weight,
        },
        WeightKind::Uniform => WeightSpec::Uniform {
            lo: args.min_weight as f64,
            hi: args.max_weight as f64,
        },
    };

    let seed = args.seed.unwrap_or(rand::thread_rng().gen::<u64>());
    for i in 0..args.count {
        let seed = instance_seed(seed, i);
        let config = GeneratorConfig::new(args.sets, args.elements, args.coverage)
            .weight(weight)
            .seed(seed);
        let instance = config.generate()?;

        let name = format!(
            "setcover-{}-{}-{}-{:?}-{}.json",
            args.sets,
            args.elements,
            args.coverage.to_string().replace('.', "_"),
            args.weight,
            seed
        )
        .to_lowercase();
        let path = args.output_dir.join(name);
        let mut file = File::create(&path)?;
        writeln!(&mut file, "{}", serde_json::to_string(&instance.record())?)?;
        println!(
            "{}/{}: wrote `{}`, lower bounds = {:.2?}, upper bound = {:.2}",
            i + 1,
            args.count,
            path.display(),
            instance.lower_bounds,
            instance.upper_bound
        );
    }
    Ok(())
}

#[test]
fn instance_seed_test() {
    assert_eq!(instance_seed(7, 3), 10);
    assert_eq!(instance_seed(u64::MAX, 0), u64::MAX);
    assert_eq!(instance_seed(u64::MAX, 1), 0);
}
