#[cfg(test)]
mod tests;

use {
    crate::{host::Host, signal},
    error_reporter::Report,
    quick_xml::{
        Reader,
        escape::resolve_predefined_entity,
        events::{
            BytesRef, Event,
            attributes::{AttrError, Attribute, Attributes},
        },
    },
    std::{
        borrow::Cow,
        fs::File,
        io::{self, ErrorKind, Read},
        num::ParseFloatError,
        path::{Path, PathBuf},
        string::FromUtf8Error,
    },
    thiserror::Error,
};

/// The location of the monitor configuration relative to the home directory.
pub const CINNAMON_MONITORS: &str = ".config/cinnamon-monitors.xml";

/// The parts of `cinnamon-monitors.xml` that affect the scale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonitorConfig {
    pub version: Option<String>,
    /// The scale of all monitors. 0 if not specified.
    pub base_scale: f64,
    /// The outputs in document order.
    pub outputs: Vec<Output>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Output {
    /// 0 if not specified.
    pub scale: f64,
    pub primary: bool,
}

impl MonitorConfig {
    /// Returns the scale of the primary monitor.
    ///
    /// Only the first output marked as primary is considered. Its scale overrides the
    /// base scale unless it is 0.
    pub fn primary_scale(&self) -> Option<f64> {
        signal(self.resolved_scale())
    }

    /// Like [`Self::primary_scale`] but returns the raw value, which may be 0 or negative.
    pub fn resolved_scale(&self) -> f64 {
        match self.outputs.iter().find(|o| o.primary) {
            Some(primary) if primary.scale != 0.0 => primary.scale,
            _ => self.base_scale,
        }
    }
}

/// Interprets the text of a boolean element.
///
/// `yes`, `true`, and `on` are true. Everything else is false, including values with
/// surrounding whitespace.
pub fn parse_flexible_bool(s: &str) -> bool {
    matches!(s, "yes" | "true" | "on")
}

#[derive(Debug, Error)]
pub enum CinnamonError {
    #[error("Could not open {}", .0.display())]
    Open(PathBuf, #[source] io::Error),
    #[error("Could not read {}", .0.display())]
    Read(PathBuf, #[source] io::Error),
    #[error("Could not parse {}", .0.display())]
    Parse(PathBuf, #[source] ParserError),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("The document does not contain an element")]
    MissingRoot,
    #[error("Expected a monitors element but found {0}")]
    UnexpectedRoot(String),
    #[error("Could not read the next event")]
    ReadEvent(#[source] quick_xml::Error),
    #[error("Could not parse the monitors element")]
    Monitors(#[from] MonitorsError),
}

#[derive(Debug, Error)]
pub enum MonitorsError {
    #[error("Could not parse an attribute")]
    Attribute(#[from] AttributeError),
    #[error("Could not read the next event")]
    ReadEvent(#[source] quick_xml::Error),
    #[error("The document ended inside the monitors element")]
    UnexpectedEof,
    #[error("Could not parse a configuration element")]
    Configuration(#[from] ConfigurationError),
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Could not read the next event")]
    ReadEvent(#[source] quick_xml::Error),
    #[error("The document ended inside the configuration element")]
    UnexpectedEof,
    #[error("Could not parse the base scale")]
    BaseScale(#[source] NumberError),
    #[error("Could not parse an output element")]
    Output(#[from] OutputError),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Could not read the next event")]
    ReadEvent(#[source] quick_xml::Error),
    #[error("The document ended inside the output element")]
    UnexpectedEof,
    #[error("Could not parse the scale")]
    Scale(#[source] NumberError),
    #[error("Could not parse the primary element")]
    Primary(#[source] TextError),
}

#[derive(Debug, Error)]
pub enum NumberError {
    #[error(transparent)]
    Text(#[from] TextError),
    #[error("Could not parse {0:?} as a number")]
    Parse(String, #[source] ParseFloatError),
}

#[derive(Debug, Error)]
pub enum TextError {
    #[error("Could not read the next event")]
    ReadEvent(#[source] quick_xml::Error),
    #[error("The document ended inside the element")]
    UnexpectedEof,
    #[error("Could not resolve a character reference")]
    CharRef(#[source] quick_xml::Error),
    #[error("Unknown entity `{0}`")]
    UnknownEntity(String),
    #[error("Could not decode the body as UTF-8")]
    DecodeUtf8(#[source] FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("quick_xml returned an error")]
    QuickXml(#[from] AttrError),
    #[error("Could not decode the value as UTF-8")]
    DecodeUtf8(#[from] quick_xml::Error),
}

/// Returns the location of the monitor configuration in the home directory of `host`.
pub fn monitors_path<H: Host + ?Sized>(host: &H) -> Option<PathBuf> {
    host.home_dir().map(|home| home.join(CINNAMON_MONITORS))
}

/// Reads the monitor configuration in the home directory.
pub fn read_for_home(home: &Path) -> Option<MonitorConfig> {
    read(&home.join(CINNAMON_MONITORS))
}

/// Reads the monitor configuration at `path`.
///
/// Returns `None` if the file does not exist, cannot be read, or is not a valid
/// configuration.
pub fn read(path: &Path) -> Option<MonitorConfig> {
    match load(path) {
        Ok(c) => Some(c),
        Err(CinnamonError::Open(_, e)) if e.kind() == ErrorKind::NotFound => {
            log::debug!("{} does not exist", path.display());
            None
        }
        Err(e) => {
            log::warn!("{}", Report::new(e));
            None
        }
    }
}

pub fn load(path: &Path) -> Result<MonitorConfig, CinnamonError> {
    let mut file = File::open(path).map_err(|e| CinnamonError::Open(path.to_owned(), e))?;
    let mut input = vec![];
    file.read_to_end(&mut input)
        .map_err(|e| CinnamonError::Read(path.to_owned(), e))?;
    parse(&input).map_err(|e| CinnamonError::Parse(path.to_owned(), e))
}

pub fn parse(input: &[u8]) -> Result<MonitorConfig, ParserError> {
    let mut reader = Reader::from_reader(input);
    loop {
        let event = reader.read_event().map_err(ParserError::ReadEvent)?;
        let (start, empty) = match event {
            Event::Start(s) => (s, false),
            Event::Empty(s) => (s, true),
            Event::Eof => return Err(ParserError::MissingRoot),
            _ => continue,
        };
        return match start.local_name().as_ref() {
            b"monitors" => Ok(parse_monitors(&mut reader, start.attributes(), empty)?),
            n => Err(ParserError::UnexpectedRoot(
                String::from_utf8_lossy(n).into_owned(),
            )),
        };
    }
}

macro_rules! parse_attr {
    ($attr:expr) => {
        match $attr {
            Ok(ref attr) => parse_attr(attr),
            Err(e) => return Err(AttributeError::QuickXml(e).into()),
        }
    };
}

fn parse_attr<'a>(attr: &'a Attribute) -> Result<(&'a [u8], Cow<'a, str>), AttributeError> {
    let name = attr.key.local_name().into_inner();
    let value = attr.unescape_value().map_err(AttributeError::DecodeUtf8)?;
    Ok((name, value))
}

fn parse_monitors(
    reader: &mut Reader<&[u8]>,
    attributes: Attributes,
    empty: bool,
) -> Result<MonitorConfig, MonitorsError> {
    let mut config = MonitorConfig::default();
    for attr in attributes {
        let (n, value) = parse_attr!(attr)?;
        match n {
            b"version" => config.version = Some(value.into_owned()),
            _ => continue,
        }
    }
    if !empty {
        loop {
            let event = reader.read_event().map_err(MonitorsError::ReadEvent)?;
            let (start, empty) = match event {
                Event::Start(s) => (s, false),
                Event::End(_) => break,
                Event::Empty(s) => (s, true),
                Event::Eof => return Err(MonitorsError::UnexpectedEof),
                _ => continue,
            };
            match start.local_name().as_ref() {
                b"configuration" => parse_configuration(reader, empty, &mut config)?,
                _ if empty => continue,
                _ => {
                    reader
                        .read_to_end(start.name())
                        .map_err(MonitorsError::ReadEvent)?;
                }
            }
        }
    }
    Ok(config)
}

// Later configuration blocks override the base scale and append their outputs.
fn parse_configuration(
    reader: &mut Reader<&[u8]>,
    empty: bool,
    config: &mut MonitorConfig,
) -> Result<(), ConfigurationError> {
    if empty {
        return Ok(());
    }
    loop {
        let event = reader.read_event().map_err(ConfigurationError::ReadEvent)?;
        let (start, empty) = match event {
            Event::Start(s) => (s, false),
            Event::End(_) => break,
            Event::Empty(s) => (s, true),
            Event::Eof => return Err(ConfigurationError::UnexpectedEof),
            _ => continue,
        };
        match start.local_name().as_ref() {
            b"base_scale" | b"baseScale" => {
                config.base_scale =
                    parse_number(reader, empty).map_err(ConfigurationError::BaseScale)?
            }
            b"output" => config.outputs.push(parse_output(reader, empty)?),
            _ if empty => continue,
            _ => {
                reader
                    .read_to_end(start.name())
                    .map_err(ConfigurationError::ReadEvent)?;
            }
        }
    }
    Ok(())
}

fn parse_output(reader: &mut Reader<&[u8]>, empty: bool) -> Result<Output, OutputError> {
    let mut output = Output::default();
    if empty {
        return Ok(output);
    }
    loop {
        let event = reader.read_event().map_err(OutputError::ReadEvent)?;
        let (start, empty) = match event {
            Event::Start(s) => (s, false),
            Event::End(_) => break,
            Event::Empty(s) => (s, true),
            Event::Eof => return Err(OutputError::UnexpectedEof),
            _ => continue,
        };
        match start.local_name().as_ref() {
            b"scale" => output.scale = parse_number(reader, empty).map_err(OutputError::Scale)?,
            b"primary" => {
                let text = parse_text(reader, empty).map_err(OutputError::Primary)?;
                output.primary = parse_flexible_bool(&text);
            }
            _ if empty => continue,
            _ => {
                reader
                    .read_to_end(start.name())
                    .map_err(OutputError::ReadEvent)?;
            }
        }
    }
    Ok(output)
}

fn parse_number(reader: &mut Reader<&[u8]>, empty: bool) -> Result<f64, NumberError> {
    let text = parse_text(reader, empty)?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }
    text.parse()
        .map_err(|e| NumberError::Parse(text.to_string(), e))
}

fn parse_text(reader: &mut Reader<&[u8]>, empty: bool) -> Result<String, TextError> {
    let mut body = Vec::new();
    if !empty {
        let mut depth = 0u32;
        loop {
            let event = reader.read_event().map_err(TextError::ReadEvent)?;
            match event {
                // references are reported separately as GeneralRef
                Event::Text(s) => body.extend_from_slice(&s),
                Event::CData(s) => body.extend_from_slice(&s),
                Event::GeneralRef(r) => resolve_reference(&r, &mut body)?,
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => break,
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(TextError::UnexpectedEof),
                _ => continue,
            }
        }
    }
    String::from_utf8(body).map_err(TextError::DecodeUtf8)
}

fn resolve_reference(r: &BytesRef<'_>, body: &mut Vec<u8>) -> Result<(), TextError> {
    if let Some(c) = r.resolve_char_ref().map_err(TextError::CharRef)? {
        let mut buf = [0; 4];
        body.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        return Ok(());
    }
    let name = String::from_utf8_lossy(r);
    match resolve_predefined_entity(&name) {
        Some(s) => body.extend_from_slice(s.as_bytes()),
        None => return Err(TextError::UnknownEntity(name.into_owned())),
    }
    Ok(())
}
