use std::time::Duration;

pub const DEFAULT_GSETTINGS: &str = "gsettings";
pub const DEFAULT_DESKTOP_VAR: &str = "XDG_CURRENT_DESKTOP";
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Settings of the system host.
#[derive(Clone, Debug)]
pub struct Config {
    /// The program used to query the settings database.
    pub gsettings: String,
    /// Arguments inserted before `get <schema> <key>`.
    ///
    /// This allows running the query through a wrapper such as
    /// `flatpak-spawn --host gsettings`.
    pub gsettings_args: Vec<String>,
    /// How long to wait for the query program before killing it.
    pub query_timeout: Duration,
    /// The environment variable that names the current desktop.
    pub desktop_var: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gsettings: DEFAULT_GSETTINGS.to_string(),
            gsettings_args: vec![],
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            desktop_var: DEFAULT_DESKTOP_VAR.to_string(),
        }
    }
}

impl Config {
    pub fn with_gsettings(mut self, program: impl Into<String>) -> Self {
        self.gsettings = program.into();
        self
    }

    pub fn with_gsettings_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gsettings_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_desktop_var(mut self, var: impl Into<String>) -> Self {
        self.desktop_var = var.into();
        self
    }
}
