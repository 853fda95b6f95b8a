use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tmsim::types::MAX_EXECUTION_STEPS;
use tmsim::{MachineConfig, PresetManager, ProgramLoader, Speed, Status, Step, TuringMachine};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tmsim-cli --preset palindrome --input 0110
  tmsim-cli --machine machine.json --speed 8
  cat machine.json | tmsim-cli --debug")]
struct Cli {
    /// A stored machine configuration (.json) to execute
    #[clap(short, long, conflicts_with = "preset")]
    machine: Option<PathBuf>,

    /// The key of a built-in example machine
    #[clap(short, long)]
    preset: Option<String>,

    /// The input string, overriding the one stored with the machine
    #[clap(short, long)]
    input: Option<String>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Run continuously at this speed (1 = slow, 10 = fast)
    #[clap(short, long, value_parser = clap::value_parser!(u8).range(1..=10), conflicts_with = "interval")]
    speed: Option<u8>,

    /// Run continuously with this many milliseconds between steps
    #[clap(long)]
    interval: Option<u64>,

    /// Give up after this many steps when not running continuously
    #[clap(long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Write the effective configuration to this file
    #[clap(long)]
    save: Option<PathBuf>,

    /// Print the final snapshot as JSON
    #[clap(long)]
    json: bool,

    /// List the built-in example machines and exit
    #[clap(short, long)]
    list: bool,
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if cli.list {
        list_presets();
        return Ok(());
    }

    let config = effective_config(&cli)?;

    if let Some(path) = &cli.save {
        ProgramLoader::save_config(path, &config)
            .with_context(|| format!("failed to save configuration to {}", path.display()))?;
        info!(path = %path.display(), "configuration saved");
    }

    let definition = config
        .to_definition()
        .context("invalid machine configuration")?;
    for warning in definition.warnings() {
        eprintln!("warning: {}", warning);
    }

    let mut machine = TuringMachine::new(definition, config.input_string.as_str());

    let interval = match (cli.speed, cli.interval) {
        (Some(speed), _) => Some(Speed::new(speed).interval()),
        (None, Some(ms)) => Some(Duration::from_millis(ms)),
        (None, None) => None,
    };

    if cli.debug {
        print_state(&machine);
    }

    match interval {
        Some(interval) => run_continuously(&mut machine, interval).await,
        None => run_batch(&mut machine, cli.debug, cli.max_steps),
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&machine.snapshot())?);
    } else {
        if cli.debug {
            println!("\nHistory:\n{}", machine.history());
        }
        println!("{}", machine.tape());
        println!("{} after {} steps", machine.status(), machine.step_count());
    }

    Ok(())
}

/// The loaded configuration with the `--input` override applied. Surrounding whitespace of
/// the override is dropped so that pasted input does not put space cells on the tape.
fn effective_config(cli: &Cli) -> Result<MachineConfig> {
    let mut config = load_config(cli)?;
    if let Some(input) = &cli.input {
        config.input_string = input.trim().to_string();
    }
    Ok(config)
}

/// Loads the configuration from a file, then stdin, then the preset catalog.
fn load_config(cli: &Cli) -> Result<MachineConfig> {
    if let Some(path) = &cli.machine {
        return ProgramLoader::load_config(Path::new(path))
            .with_context(|| format!("failed to load machine from {}", path.display()));
    }

    if let Some(key) = &cli.preset {
        return Ok(PresetManager::get_by_key(key)?.config.clone());
    }

    if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        return ProgramLoader::load_config_from_string(&buffer)
            .context("failed to parse machine from stdin");
    }

    if PresetManager::count() == 0 {
        bail!("no machine given and no built-in presets available");
    }
    Ok(PresetManager::get_by_index(0)?.config.clone())
}

fn list_presets() {
    for index in 0..PresetManager::count() {
        if let (Ok(info), Ok(preset)) = (
            PresetManager::info(index),
            PresetManager::get_by_index(index),
        ) {
            println!(
                "{:<16} {} ({} states, {} rules, sample input \"{}\")\n                 {}",
                info.key,
                info.name,
                info.state_count,
                info.transition_count,
                info.input_string,
                preset.description
            );
        }
    }
}

fn print_state(machine: &TuringMachine) {
    let window: String = machine
        .tape()
        .window(10)
        .into_iter()
        .map(|(offset, symbol)| {
            if offset == 0 {
                format!("[{}]", symbol)
            } else {
                format!(" {} ", symbol)
            }
        })
        .collect();

    println!(
        "Step: {:>4}, State: {:<8} Head: {:>3} |{}|",
        machine.step_count(),
        machine.state(),
        machine.head_position(),
        window
    );
}

fn run_batch(machine: &mut TuringMachine, debug: bool, max_steps: usize) {
    for _ in 0..max_steps {
        let step = machine.step();
        if debug {
            if let Some(entry) = machine.history().last() {
                println!("{}", entry);
            }
            print_state(machine);
        }
        if let Step::Halt(_) = step {
            return;
        }
    }

    eprintln!(
        "warning: machine did not halt within {} steps",
        max_steps
    );
}

async fn run_continuously(machine: &mut TuringMachine, interval: Duration) {
    let handle = machine.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.pause();
        }
    });

    let status = machine.run(interval).await;
    if status == Status::Paused {
        eprintln!("Paused after {} steps.", machine.step_count());
    }
}
