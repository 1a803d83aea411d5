use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::{self, Sender};
use std::thread;

use braking_policy::{PolicyMode, Simulator, SimulatorCommand, SimulatorConfig, SimulatorError};
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

struct Args {
    mode: PolicyMode,
    seed: Option<u64>,
    font: Option<PathBuf>,
    scale: Option<f64>,
    log_level: LevelFilter,
}

fn invalid(flag: &str, reason: impl Into<String>) -> SimulatorError {
    SimulatorError::InvalidArgument {
        flag: flag.to_string(),
        reason: reason.into(),
    }
}

fn parse_args() -> Result<Args, SimulatorError> {
    let mut parsed = Args {
        mode: PolicyMode::Cautious,
        seed: None,
        font: None,
        scale: None,
        log_level: LevelFilter::Info,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| invalid(&arg, "missing value"));
        match arg.as_str() {
            "--mode" => parsed.mode = value()?.parse()?,
            "--seed" => {
                let raw = value()?;
                parsed.seed = Some(raw.parse().map_err(|_| invalid("--seed", raw))?);
            }
            "--font" => parsed.font = Some(PathBuf::from(value()?)),
            "--scale" => {
                let raw = value()?;
                parsed.scale = Some(raw.parse().map_err(|_| invalid("--scale", raw))?);
            }
            "--log-level" => {
                let raw = value()?;
                parsed.log_level = LevelFilter::from_str(&raw).map_err(|_| invalid("--log-level", raw))?;
            }
            other => return Err(invalid(other, "unknown flag")),
        }
    }
    Ok(parsed)
}

/// Feeds commands typed on stdin: a policy name, `reset`, or `zoom in|out`.
fn spawn_stdin_reader(sender: Sender<SimulatorCommand>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines().map_while(Result::ok) {
            let line = line.trim();
            let command = match line {
                "" => continue,
                "reset" => SimulatorCommand::Reset,
                "zoom in" => SimulatorCommand::Zoom(-1.0),
                "zoom out" => SimulatorCommand::Zoom(1.0),
                name => match name.parse::<PolicyMode>() {
                    Ok(mode) => SimulatorCommand::SelectMode(mode),
                    Err(err) => {
                        error!("{}", err);
                        continue;
                    }
                },
            };
            if sender.send(command).is_err() {
                break;
            }
        }
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;
    TermLogger::init(
        args.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let config = SimulatorConfig::builder()
        .initial_mode(args.mode)
        .maybe_seed(args.seed)
        .maybe_font_path(args.font)
        .initial_scale(args.scale.unwrap_or(braking_policy::view::DEFAULT_SCALE))
        .build();

    let (sender, receiver) = mpsc::channel();
    spawn_stdin_reader(sender);

    info!("keys: 1 cautious, 2 risky, 3 timid, r reset, esc quit; drag to pan, scroll to zoom");
    let simulator = Simulator::new(config)?;
    simulator.show_with_commands(receiver)?;
    Ok(())
}
