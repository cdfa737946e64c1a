mod cinnamon;
mod desktop;
mod get;

use {
    crate::logger::Logger,
    ::log::Level,
    clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint},
    clap_complete::Shell,
    devicescale::{
        Config,
        config::{DEFAULT_DESKTOP_VAR, DEFAULT_GSETTINGS},
    },
    std::{io::stdout, path::PathBuf, sync::Arc, time::Duration},
};

/// Display scale detection for Unix desktops.
#[derive(Parser, Debug)]
struct DeviceScale {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// The log level.
    #[arg(value_enum, long, default_value_t)]
    pub log_level: CliLogLevel,
    /// The program used to query the settings database.
    #[arg(long, default_value = DEFAULT_GSETTINGS, value_hint = ValueHint::CommandName)]
    pub gsettings: String,
    /// An argument to insert before `get <schema> <key>`. Can be repeated.
    ///
    /// For example, `--gsettings flatpak-spawn --gsettings-arg=--host --gsettings-arg gsettings`
    /// queries the settings of the host from within a flatpak sandbox.
    #[arg(long, allow_hyphen_values = true)]
    pub gsettings_arg: Vec<String>,
    /// How long to wait for the settings query, e.g. `500ms` or `2s`.
    #[arg(long, default_value = "2s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,
    /// The environment variable that names the current desktop.
    #[arg(long, default_value = DEFAULT_DESKTOP_VAR)]
    pub desktop_var: String,
}

impl GlobalArgs {
    pub fn config(&self) -> Config {
        Config::default()
            .with_gsettings(&self.gsettings)
            .with_gsettings_args(&self.gsettings_arg)
            .with_query_timeout(self.timeout)
            .with_desktop_var(&self.desktop_var)
    }

    pub fn install_logger(&self) -> Arc<Logger> {
        Logger::install_stderr(self.log_level.into())
    }
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print the scale factor of the current desktop.
    Get(GetArgs),
    /// Print the current desktop environment.
    Desktop,
    /// Print the contents of the Cinnamon monitor configuration.
    Cinnamon(CinnamonArgs),
    /// Generate shell completion scripts for devicescale.
    GenerateCompletion(GenerateArgs),
}

impl Default for Cmd {
    fn default() -> Self {
        Self::Get(GetArgs::default())
    }
}

#[derive(Args, Debug, Default)]
pub struct GetArgs {
    /// The x coordinate of the window.
    #[arg(long, short, default_value_t, allow_negative_numbers = true)]
    pub x: i32,
    /// The y coordinate of the window.
    #[arg(long, short, default_value_t, allow_negative_numbers = true)]
    pub y: i32,
    /// Also print the desktop and where the scale came from.
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct CinnamonArgs {
    /// The path of the configuration.
    ///
    /// Defaults to ~/.config/cinnamon-monitors.xml.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Copy, Clone, Hash, Default)]
pub enum CliLogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl From<CliLogLevel> for Level {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Trace => Level::Trace,
            CliLogLevel::Debug => Level::Debug,
            CliLogLevel::Info => Level::Info,
            CliLogLevel::Warn => Level::Warn,
            CliLogLevel::Error => Level::Error,
        }
    }
}

pub fn main() {
    let cli = DeviceScale::parse();
    match cli.command.unwrap_or_default() {
        Cmd::Get(a) => get::main(cli.global, a),
        Cmd::Desktop => desktop::main(cli.global),
        Cmd::Cinnamon(a) => cinnamon::main(cli.global, a),
        Cmd::GenerateCompletion(g) => generate(g),
    }
}

fn generate(args: GenerateArgs) {
    let stdout = stdout();
    let mut stdout = stdout.lock();
    clap_complete::generate(
        args.shell,
        &mut DeviceScale::command(),
        "devicescale",
        &mut stdout,
    );
}
