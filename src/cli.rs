//! Clap adapter: the command line of the hello app.
//!
//! Compiled only with the `clap` feature (on by default). Parsed flags are
//! turned into plain `(dotted_key, value)` overrides by [`Cli::overrides`]; from
//! there everything flows through the clap-free core.
//!
//! Flag scanning stops at the first positional token. That token and
//! everything after it form the command, so `hello start --log trace` hands
//! `--log trace` to the command rather than the logger.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use toml::Value;
use tracing::warn;

use crate::resolve::CONFIG_PATH_ENV;
use crate::schema::LogLevel;

/// Hello world application with TOML configuration.
#[derive(Debug, Parser)]
#[command(name = "helloconf", version, disable_version_flag = true)]
pub struct Cli {
    /// Path to the config file.
    #[arg(short = 'c', long = "config", value_name = "CONFIG_FILE", env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Log level (flood/trace/debug/info/notice/warn/error/crit/fatal/panic/silent).
    #[arg(long = "log", value_name = "LEVEL", help_heading = "Logger")]
    pub log_level: Option<LogLevel>,

    /// Use structured text logger.
    #[arg(long, help_heading = "Logger")]
    pub slog: bool,

    /// Use structured JSON logger.
    #[arg(long, help_heading = "Logger")]
    pub jlog: bool,

    /// Use tinted (colorized) logger.
    #[arg(long, help_heading = "Logger")]
    pub tlog: bool,

    /// Force log source file name and line number.
    #[arg(long, help_heading = "Logger")]
    pub lsrc: bool,

    /// Force log source directory/file name and line number.
    #[arg(long, help_heading = "Logger")]
    pub lpkg: bool,

    /// Force add time to log.
    #[arg(long, help_heading = "Logger")]
    pub ltime: bool,

    /// Override log time format (e.g. 15:04:05.999).
    #[arg(long, value_name = "FORMAT", help_heading = "Logger")]
    pub ltimefmt: Option<String>,

    /// Show version and exit.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Command and its arguments: start (default), help, version, mkconf [path], showconf.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// What the program was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the application.
    Start,
    /// Print full help and exit.
    Help,
    /// Print version and exit.
    Version,
    /// Write a documented default config file and exit.
    MakeConf { path: Option<PathBuf> },
    /// Print the resolved configuration and exit.
    ShowConf,
}

impl Cli {
    /// Logger flags as config overrides. Switches only override when given.
    pub fn overrides(&self) -> Vec<(String, Value)> {
        let mut out = Vec::new();
        let mut set = |key: &str, value: Value| out.push((key.to_string(), value));

        if let Some(level) = self.log_level {
            set("log.level", Value::String(level.as_str().into()));
        }
        let switches = [
            ("log.slog", self.slog),
            ("log.json", self.jlog),
            ("log.tint", self.tlog),
            ("log.src", self.lsrc || self.lpkg),
            ("log.src-long", self.lpkg),
            ("log.time", self.ltime),
        ];
        for (key, on) in switches {
            if on {
                set(key, Value::Boolean(true));
            }
        }
        if let Some(fmt) = &self.ltimefmt {
            set("log.time-tint", Value::String(fmt.clone()));
        }
        out
    }

    /// Interpret the positional tokens. Anything unrecognized only ends flag
    /// scanning and the application starts.
    pub fn action(&self) -> Command {
        let mut words = self.command.iter().map(String::as_str);
        match words.next() {
            None | Some("start") => Command::Start,
            Some("help") => Command::Help,
            Some("version") => Command::Version,
            Some("mkconf") => Command::MakeConf {
                path: words.next().map(PathBuf::from),
            },
            Some("showconf") => Command::ShowConf,
            Some(other) => {
                warn!(command = other, "unknown command, starting");
                Command::Start
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["helloconf"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn keys(cli: &Cli) -> Vec<String> {
        cli.overrides().into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn no_args_no_overrides() {
        let cli = parse(&[]);
        assert!(cli.overrides().is_empty());
        assert_eq!(cli.action(), Command::Start);
    }

    #[test]
    fn config_path_flag() {
        let cli = parse(&["-c", "/tmp/custom.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/custom.toml")));
    }

    #[test]
    fn level_flag() {
        let cli = parse(&["--log", "notice"]);
        assert_eq!(
            cli.overrides(),
            vec![("log.level".to_string(), Value::String("notice".into()))]
        );
    }

    #[test]
    fn bad_level_rejected_by_parser() {
        assert!(Cli::try_parse_from(["helloconf", "--log", "loud"]).is_err());
    }

    #[test]
    fn switches_map_to_log_keys() {
        let cli = parse(&["--jlog", "--tlog", "--ltime", "--ltimefmt", "15:04"]);
        assert_eq!(
            keys(&cli),
            ["log.json", "log.tint", "log.time", "log.time-tint"]
        );
    }

    #[test]
    fn lpkg_implies_src() {
        let cli = parse(&["--lpkg"]);
        assert_eq!(keys(&cli), ["log.src", "log.src-long"]);
    }

    #[test]
    fn first_positional_stops_flag_scanning() {
        let cli = parse(&["--slog", "start", "--jlog"]);
        assert!(cli.slog);
        assert!(!cli.jlog);
        assert_eq!(cli.command, ["start", "--jlog"]);
        assert_eq!(cli.action(), Command::Start);
    }

    #[test]
    fn bare_commands() {
        assert_eq!(parse(&["help"]).action(), Command::Help);
        assert_eq!(parse(&["version"]).action(), Command::Version);
        assert_eq!(parse(&["showconf"]).action(), Command::ShowConf);
        assert_eq!(
            parse(&["mkconf", "out.toml"]).action(),
            Command::MakeConf {
                path: Some(PathBuf::from("out.toml"))
            }
        );
        assert_eq!(
            parse(&["mkconf"]).action(),
            Command::MakeConf { path: None }
        );
    }

    #[test]
    fn unknown_command_starts_and_ends_flags() {
        let cli = parse(&["launch", "--jlog"]);
        assert_eq!(cli.action(), Command::Start);
        assert!(!cli.jlog);
        assert!(cli.overrides().is_empty());
    }

    #[test]
    fn version_flags_exit_cleanly() {
        for flag in ["-v", "--version", "--help", "-h"] {
            let err = Cli::try_parse_from(["helloconf", flag]).unwrap_err();
            assert_eq!(err.exit_code(), 0, "{flag}");
        }
    }
}
