//! # Inversion Demo CLI
//!
//! Command-line entry point for the priority inversion demonstrator.

use cli_inversion::{run, DemoConfig, ScenarioKind};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    if let Err(e) = run(&config) {
        eprintln!("Demo error: {}", e);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<DemoConfig, String> {
    let mut config = DemoConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --scenario".to_string());
                }
                config.scenario = ScenarioKind::from_arg(&args[i])
                    .ok_or_else(|| format!("Invalid scenario: {}", args[i]))?;
            }
            "--ticks" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --ticks".to_string());
                }
                config.horizon_ticks = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid ticks value: {}", args[i]))?;
            }
            "--sample-every" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --sample-every".to_string());
                }
                config.sample_every = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid sample-every value: {}", args[i]))?;
                if config.sample_every == 0 {
                    return Err("sample-every must be nonzero".to_string());
                }
            }
            "--json" => {
                config.json_status = true;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --scenario <KIND>    Lock flavor: semaphore, mutex, or both (default)");
    eprintln!("  --ticks <N>              Ticks to simulate per scenario (default 80)");
    eprintln!("  --sample-every <N>       Ticks between runtime samples (default 10)");
    eprintln!("  --json                   Print the final task statuses as JSON");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --scenario mutex", program);
    eprintln!("  {} --scenario sem --ticks 200 --sample-every 25", program);
}
