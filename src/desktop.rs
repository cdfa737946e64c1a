
use {
    crate::host::Host,
    std::fmt::{Display, Formatter},
};

/// A desktop environment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Desktop {
    Unknown,
    Gnome,
    Cinnamon,
    Unity,
    Kde,
    Xfce,
}

impl Desktop {
    pub const ALL: [Desktop; 6] = [
        Desktop::Unknown,
        Desktop::Gnome,
        Desktop::Cinnamon,
        Desktop::Unity,
        Desktop::Kde,
        Desktop::Xfce,
    ];

    /// Classifies a colon-separated list of desktop names.
    ///
    /// The last entry is the most specific one and the only one consulted.
    pub fn classify(value: &str) -> Self {
        let name = value.rsplit(':').next().unwrap_or(value);
        match name {
            "GNOME" => Self::Gnome,
            "X-Cinnamon" => Self::Cinnamon,
            "Unity" => Self::Unity,
            "KDE" => Self::Kde,
            "XFCE" => Self::Xfce,
            _ => Self::Unknown,
        }
    }

    pub fn current<H: Host + ?Sized>(host: &H) -> Self {
        match host.current_desktop() {
            Some(value) => Self::classify(&value),
            None => Self::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Gnome => "GNOME",
            Self::Cinnamon => "Cinnamon",
            Self::Unity => "Unity",
            Self::Kde => "KDE",
            Self::Xfce => "Xfce",
        }
    }
}

impl Display for Desktop {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
