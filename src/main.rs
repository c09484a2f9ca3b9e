use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{error, info};

use matahari_triggers::{
    config::{Config, ConfigSource},
    db,
    replay::{self, ReplayRecord},
    Tick, TriggerClass, TriggerTable,
};

#[derive(Parser)]
#[command(name = "matahari-triggers", about = "Mata Hari auto-fire trigger table")]
struct Cli {
    /// Trigger file, defaults to $MATAHARI_TRIGGERS or ~/.matahari/triggers.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the debounce window, in 1/120th seconds
    #[arg(long, global = true)]
    debounce: Option<Tick>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the trigger table and print it
    Check,
    /// Show what closing a switch would fire
    Lookup {
        /// Switch number or name
        switch: String,
        /// Tick the closure is detected at
        #[arg(long, default_value_t = 0)]
        at: Tick,
    },
    /// Replay a script of `<tick> <switch> <closed|open>` lines
    Replay { events: PathBuf },
}

fn main() -> Result<(), String> {
    // run me like this: RUST_LOG=info cargo run -- check
    pretty_env_logger::init();

    let cli = Cli::parse();

    // refuse to run with a table we cannot trust
    let mut config = Config::load(cli.config.as_deref()).map_err(|e| {
        error!("invalid trigger configuration: {}", e);
        e.to_string()
    })?;
    if let Some(debounce) = cli.debounce {
        config.debounce_ticks = debounce;
    }
    match &config.source {
        ConfigSource::BuiltIn => info!("Using built-in Mata Hari triggers"),
        ConfigSource::File(path) => info!("Using triggers from {}", path.display()),
    }

    match cli.command {
        Command::Check => {
            print_table(&config.table);
            println!(
                "longest pulse: {} ticks, debounce: {} ticks",
                config.table.max_fire_duration_ticks(),
                config.debounce_ticks
            );
        }
        Command::Lookup { switch, at } => {
            let Some(found) = db::find_switch(&switch) else {
                println!("{}: not a switch, nothing fires", switch);
                return Ok(());
            };
            match config.table.trigger(found) {
                Some(trigger) => {
                    let command = trigger.rule.on_trigger(at);
                    println!(
                        "{} [{:?}] -> solenoid {} from tick {} to {}",
                        found, trigger.class, command.solenoid, command.start_tick, command.stop_tick
                    );
                }
                None => println!("{}: no auto-fire trigger", found),
            }
        }
        Command::Replay { events } => {
            let events = replay::load_events(&events).map_err(|e| e.to_string())?;
            for record in replay::run(&config.table, config.debounce_ticks, &events) {
                println!("{}", describe_record(&record));
            }
        }
    }

    Ok(())
}

fn print_table(table: &TriggerTable) {
    for (class, rules) in [
        (TriggerClass::Priority, table.priority().collect::<Vec<_>>()),
        (TriggerClass::Debounced, table.debounced().collect::<Vec<_>>()),
    ] {
        println!("{:?} ({}):", class, rules.len());
        for rule in rules {
            println!(
                "  {:<20} -> {:<20} {} ticks ({:?})",
                rule.switch.to_string(),
                rule.solenoid.to_string(),
                rule.fire_duration_ticks,
                rule.fire_duration()
            );
        }
    }
}

fn describe_record(record: &ReplayRecord) -> String {
    match record {
        ReplayRecord::Fired {
            class,
            switch,
            command,
        } => format!(
            "{:>8} fire    {} -> {} until {} ({:?})",
            command.start_tick, switch, command.solenoid, command.stop_tick, class
        ),
        ReplayRecord::Dropped { switch, command } => format!(
            "{:>8} drop    {} -> {} still energized",
            command.start_tick, switch, command.solenoid
        ),
        ReplayRecord::Released { solenoid, tick } => format!("{:>8} release {}", tick, solenoid),
        ReplayRecord::Confirmed { switch, tick } => format!("{:>8} closed  {}", tick, switch),
        ReplayRecord::Ignored { switch_id, tick } => {
            format!("{:>8} ignore  unknown switch {}", tick, switch_id)
        }
        ReplayRecord::SlamTilt { tick, released } => format!(
            "{:>8} SLAM    {} solenoid(s) forced off",
            tick,
            released.len()
        ),
    }
}
