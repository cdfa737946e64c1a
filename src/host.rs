use {
    crate::{config::Config, gsettings::GSettings},
    std::{env::VarError, path::PathBuf},
};

/// The parts of the host state consulted while resolving the scale.
///
/// Every call reads the state anew. Implementations must not cache results across calls.
pub trait Host {
    /// The raw list of desktop names, if any.
    fn current_desktop(&self) -> Option<String>;

    /// The home directory of the current user.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Queries an unsigned integer setting.
    ///
    /// Returns `None` if the setting could not be retrieved or is zero.
    fn query_setting(&self, schema: &str, key: &str) -> Option<f64>;
}

impl<H: Host + ?Sized> Host for &H {
    fn current_desktop(&self) -> Option<String> {
        (**self).current_desktop()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        (**self).home_dir()
    }

    fn query_setting(&self, schema: &str, key: &str) -> Option<f64> {
        (**self).query_setting(schema, key)
    }
}

/// The host the process runs on.
#[derive(Clone, Debug)]
pub struct SystemHost {
    desktop_var: String,
    gsettings: GSettings,
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl SystemHost {
    pub fn new(config: &Config) -> Self {
        Self {
            desktop_var: config.desktop_var.clone(),
            gsettings: GSettings::from_config(config),
        }
    }
}

impl Host for SystemHost {
    fn current_desktop(&self) -> Option<String> {
        match std::env::var(&self.desktop_var) {
            Ok(v) => Some(v),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(v)) => {
                log::debug!("{} is not valid unicode: {:?}", self.desktop_var, v);
                None
            }
        }
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn query_setting(&self, schema: &str, key: &str) -> Option<f64> {
        self.gsettings.query(schema, key)
    }
}
