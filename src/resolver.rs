
use {
    crate::{
        DEFAULT_SCALE, cinnamon,
        desktop::Desktop,
        gsettings::{KEY_SCALING_FACTOR, SCHEMA_CINNAMON_INTERFACE, SCHEMA_GNOME_INTERFACE},
        host::Host,
        signal,
    },
    std::fmt::{Display, Formatter},
};

/// Where a resolved scale came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Source {
    Gsettings,
    CinnamonConfig,
    Default,
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Source::Gsettings => "gsettings",
            Source::CinnamonConfig => "cinnamon-monitors.xml",
            Source::Default => "default",
        };
        f.write_str(s)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resolution {
    pub desktop: Desktop,
    pub source: Source,
    /// Always strictly positive.
    pub scale: f64,
}

/// Determines the scale factor from the state of a [`Host`].
#[derive(Clone, Debug, Default)]
pub struct Resolver<H> {
    host: H,
}

impl<H: Host> Resolver<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the scale factor for a window at `(x, y)`.
    ///
    /// The position is currently ignored since only desktop-wide scales are supported.
    /// The result is always strictly positive.
    pub fn get_scale(&self, x: i32, y: i32) -> f64 {
        self.resolve(x, y).scale
    }

    pub fn resolve(&self, _x: i32, _y: i32) -> Resolution {
        let desktop = Desktop::current(&self.host);
        let signal = match desktop {
            Desktop::Gnome => self.gsettings(SCHEMA_GNOME_INTERFACE),
            Desktop::Cinnamon => self.cinnamon(),
            // TODO: Unity and KDE support per-monitor scaling, Xfce has a desktop-wide
            // window scaling factor in xfconf.
            Desktop::Unity | Desktop::Kde | Desktop::Xfce => None,
            Desktop::Unknown => None,
        };
        let (source, scale) = match signal {
            Some((source, scale)) if scale > 0.0 => (source, scale),
            _ => (Source::Default, DEFAULT_SCALE),
        };
        log::debug!("Desktop {}: scale {} from {}", desktop, scale, source);
        Resolution {
            desktop,
            source,
            scale,
        }
    }

    fn gsettings(&self, schema: &str) -> Option<(Source, f64)> {
        let scale = self.host.query_setting(schema, KEY_SCALING_FACTOR);
        scale.and_then(signal).map(|s| (Source::Gsettings, s))
    }

    fn cinnamon(&self) -> Option<(Source, f64)> {
        let scale = match self.host.home_dir() {
            Some(home) => cinnamon::read_for_home(&home).map(|c| c.resolved_scale()),
            None => {
                log::debug!("The home directory is unknown");
                None
            }
        };
        // only a missing file or a 0 scale falls back to gsettings
        match scale {
            Some(s) if s != 0.0 => match signal(s) {
                Some(s) => Some((Source::CinnamonConfig, s)),
                None => {
                    log::debug!("Ignoring the Cinnamon monitor scale {}", s);
                    None
                }
            },
            _ => self.gsettings(SCHEMA_CINNAMON_INTERFACE),
        }
    }
}
