
use {
    crate::config::Config,
    error_reporter::Report,
    once_cell::sync::Lazy,
    regex::Regex,
    std::{
        io::{self, Read},
        num::ParseIntError,
        process::{Child, Command, ExitStatus, Stdio},
        str::Utf8Error,
        sync::mpsc::{self, RecvTimeoutError},
        thread,
        time::{Duration, Instant},
    },
    thiserror::Error,
};

pub const SCHEMA_GNOME_INTERFACE: &str = "org.gnome.desktop.interface";
pub const SCHEMA_CINNAMON_INTERFACE: &str = "org.cinnamon.desktop.interface";
pub const KEY_SCALING_FACTOR: &str = "scaling-factor";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

static UINT32: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A\s*uint32 ([0-9]+)\s*\z").unwrap());

#[derive(Debug, Error)]
pub enum GSettingsError {
    #[error("Could not spawn `{0}`")]
    Spawn(String, #[source] io::Error),
    #[error("Could not wait for `{0}`")]
    Wait(String, #[source] io::Error),
    #[error("`{0}` did not exit within {1:?}")]
    Timeout(String, Duration),
    #[error("`{0}` exited with {1}")]
    Exit(String, ExitStatus),
    #[error("Could not read the output of `{0}`")]
    Read(String, #[source] io::Error),
    #[error("The output is not valid UTF-8")]
    Utf8(#[source] Utf8Error),
    #[error("Unexpected output {0:?}")]
    Format(String),
    #[error("Could not parse the value")]
    Int(#[source] ParseIntError),
}

/// Runs `gsettings get` to read unsigned integer settings.
#[derive(Clone, Debug)]
pub struct GSettings {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl GSettings {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.gsettings, config.query_timeout).with_args(&config.gsettings_args)
    }

    /// Sets the arguments inserted before `get <schema> <key>`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        self
    }

    /// Returns the value of the setting or `None` if there is no usable value.
    ///
    /// A value of 0 is not a usable value.
    pub fn query(&self, schema: &str, key: &str) -> Option<f64> {
        match self.get(schema, key) {
            Ok(0) => {
                log::debug!("{} {} is 0", schema, key);
                None
            }
            Ok(v) => {
                log::debug!("{} {} is {}", schema, key, v);
                Some(v as f64)
            }
            Err(e) => {
                log::debug!("Could not query {} {}: {}", schema, key, Report::new(e));
                None
            }
        }
    }

    pub fn get(&self, schema: &str, key: &str) -> Result<u32, GSettingsError> {
        let output = self.run(&["get", schema, key])?;
        parse_output(&output)
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>, GSettingsError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| GSettingsError::Spawn(self.program.clone(), e))?;
        let deadline = Instant::now() + self.timeout;
        // stdout must be drained while polling or the child can block on a full pipe
        let (tx, rx) = mpsc::channel();
        if let Some(mut stdout) = child.stdout.take() {
            thread::spawn(move || {
                let mut buf = vec![];
                let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
            });
        } else {
            let _ = tx.send(Ok(vec![]));
        }
        let status = self.wait(&mut child, deadline)?;
        if !status.success() {
            return Err(GSettingsError::Exit(self.program.clone(), status));
        }
        // processes spawned by the child can keep the pipe open after it exits
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(res) => res.map_err(|e| GSettingsError::Read(self.program.clone(), e)),
            Err(RecvTimeoutError::Timeout) => {
                Err(GSettingsError::Timeout(self.program.clone(), self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(GSettingsError::Read(
                self.program.clone(),
                io::Error::other("the reader thread panicked"),
            )),
        }
    }

    fn wait(&self, child: &mut Child, deadline: Instant) -> Result<ExitStatus, GSettingsError> {
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    kill(child);
                    return Err(GSettingsError::Wait(self.program.clone(), e));
                }
            }
            if Instant::now() >= deadline {
                kill(child);
                return Err(GSettingsError::Timeout(self.program.clone(), self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::debug!("Could not kill {}: {}", child.id(), Report::new(e));
    }
    let _ = child.wait();
}

/// Parses the output of `gsettings get` for an unsigned 32-bit setting.
pub fn parse_output(output: &[u8]) -> Result<u32, GSettingsError> {
    let output = std::str::from_utf8(output).map_err(GSettingsError::Utf8)?;
    let Some(captures) = UINT32.captures(output) else {
        return Err(GSettingsError::Format(output.to_string()));
    };
    captures[1].parse().map_err(GSettingsError::Int)
}
