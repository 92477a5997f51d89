use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::{error, info};

use helloconf::{
    APP_NAME, CONFIG_FILE, Cli, Command, Configuration, LOG_PREFIX, Locations, ResolveInput,
    Settings, config_file, logging, ops, resolve,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = with_bootstrap_logger(|| cli.action());
    match command {
        Command::Help => {
            let _ = Cli::command().print_long_help();
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("{APP_NAME} version {VERSION}");
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let locations = Locations::new(APP_NAME, CONFIG_FILE);

    let conf = with_bootstrap_logger(|| {
        resolve(ResolveInput {
            file: config_file(cli.config.clone(), &locations),
            env_vars: std::env::vars().collect(),
            env_prefix: Some(LOG_PREFIX.into()),
            overrides: cli.overrides(),
        })
    });

    match command {
        Command::MakeConf { path } => {
            let path =
                path.unwrap_or_else(|| with_bootstrap_logger(|| locations.resolve_save_path()));
            return match ops::write_template(&path) {
                Ok(result) => {
                    println!("{result}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{e}");
                    ExitCode::FAILURE
                }
            };
        }
        Command::ShowConf => {
            return match ops::show(&conf.settings) {
                Ok(result) => {
                    print!("{result}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{e}");
                    ExitCode::FAILURE
                }
            };
        }
        _ => {}
    }

    if let Err(e) = logging::init(&conf.settings.log) {
        eprintln!("can't set up logger, using defaults: {e}");
        let _ = logging::init(&Settings::defaults().log);
    }

    let pwd = std::env::current_dir().unwrap_or_else(|e| {
        error!(error = %e, "can't get working directory");
        PathBuf::from(".")
    });
    let save_path = locations.resolve_save_path();
    info!(
        version = VERSION,
        level = %conf.settings.log.level,
        find_conf = ?conf.source,
        save_conf = %save_path.display(),
        pwd = %pwd.display(),
        "{APP_NAME} start"
    );

    run(&conf);

    match conf.save(&save_path) {
        Ok(()) => info!(save_conf = %save_path.display(), "updated config file"),
        Err(_) => error!(save_conf = %save_path.display(), "can't save config file"),
    }
    ExitCode::SUCCESS
}

/// Run `f` with default logger settings; the configured logger is not known yet.
fn with_bootstrap_logger<T>(f: impl FnOnce() -> T) -> T {
    match logging::subscriber(&Settings::defaults().log) {
        Ok(bootstrap) => tracing::subscriber::with_default(bootstrap, f),
        Err(_) => f(),
    }
}

/// Stand-in for the window: greets at the configured geometry.
fn run(conf: &Configuration) {
    let Settings { position, size, .. } = &conf.settings;
    println!(
        "Hello World! ({}x{} at {},{})",
        size.w, size.h, position.x, position.y
    );
}
