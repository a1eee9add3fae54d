use clap::Parser;
use std::path::PathBuf;

use spacerace::{
    course::{generate_course, save_course_file, CourseGeneratorConfig},
    utils::SimError,
};

/// Write a seeded asteroid-field course in the shared JSON schema
#[derive(Parser, Debug)]
#[command(name = "generate_course")]
#[command(version)]
struct Cli {
    /// Output course file
    output: PathBuf,

    /// Seed for the asteroid field
    #[arg(default_value_t = 42)]
    seed: u64,

    /// Number of asteroids to scatter
    #[arg(default_value_t = 150)]
    asteroids: usize,

    /// Edge length of the asteroid cube [m]
    #[arg(default_value_t = 8000.0, value_parser = parse_field_size)]
    field_size: f64,
}

fn parse_field_size(value: &str) -> Result<f64, String> {
    let size: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(format!("field size must be positive and finite, got {value}"))
    }
}

fn main() -> Result<(), SimError> {
    let cli = Cli::parse();

    let config = CourseGeneratorConfig {
        seed: cli.seed,
        asteroid_count: cli.asteroids,
        field_size: cli.field_size,
        ..Default::default()
    };

    println!(
        "Generating course with seed {} and {} asteroids...",
        config.seed, config.asteroid_count
    );
    let course = generate_course(&config)?;
    save_course_file(&course, &cli.output)?;
    println!(
        "Wrote {} gates and {} asteroids to {}",
        course.gates().len(),
        course.asteroids().len(),
        cli.output.display()
    );
    Ok(())
}
