use {
    crate::cinnamon::{
        CINNAMON_MONITORS, CinnamonError, MonitorConfig, Output, ParserError, load, parse,
        monitors_path, parse_flexible_bool, read, read_for_home,
    },
    crate::host::Host,
    simplelog::{Config, LevelFilter, TestLogger},
    std::{fs, path::PathBuf},
    tempfile::TempDir,
};

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

struct HomeHost(Option<PathBuf>);

impl Host for HomeHost {
    fn current_desktop(&self) -> Option<String> {
        None
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.0.clone()
    }

    fn query_setting(&self, _schema: &str, _key: &str) -> Option<f64> {
        None
    }
}

fn output(scale: f64, primary: bool) -> Output {
    Output { scale, primary }
}

fn config(base_scale: f64, outputs: &[Output]) -> MonitorConfig {
    MonitorConfig {
        version: None,
        base_scale,
        outputs: outputs.to_vec(),
    }
}

const CINNAMON: &str = r#"<monitors version="2">
  <configuration>
    <base_scale>2</base_scale>
    <output name="eDP-1">
      <vendor>SDC</vendor>
      <product>0x4152</product>
      <width>3200</width>
      <height>1800</height>
      <rate>59.98</rate>
      <x>0</x>
      <y>0</y>
      <rotation>normal</rotation>
      <reflect_x>no</reflect_x>
      <reflect_y>no</reflect_y>
      <primary>no</primary>
      <scale>0</scale>
    </output>
    <output name="HDMI-1">
      <vendor>GSM</vendor>
      <primary>yes</primary>
      <scale>1.5</scale>
    </output>
    <clone>no</clone>
  </configuration>
</monitors>
"#;

#[test]
fn flexible_bool() {
    for s in ["yes", "true", "on"] {
        assert!(parse_flexible_bool(s), "{s:?}");
    }
    for s in ["no", "false", "off", "", "1", "YES", "True", "y", "onn", " yes", "yes\n"] {
        assert!(!parse_flexible_bool(s), "{s:?}");
    }
}

#[test]
fn primary_overrides_base() {
    let c = config(2.0, &[output(0.0, false), output(3.0, true)]);
    assert_eq!(c.primary_scale(), Some(3.0));
}

#[test]
fn zero_primary_keeps_base() {
    let c = config(2.0, &[output(0.0, true)]);
    assert_eq!(c.primary_scale(), Some(2.0));
}

#[test]
fn first_primary_wins() {
    let c = config(2.0, &[output(0.0, true), output(3.0, true)]);
    assert_eq!(c.primary_scale(), Some(2.0));
    let c = config(2.0, &[output(1.0, true), output(3.0, true)]);
    assert_eq!(c.primary_scale(), Some(1.0));
}

#[test]
fn no_primary() {
    let c = config(2.0, &[output(3.0, false), output(4.0, false)]);
    assert_eq!(c.primary_scale(), Some(2.0));
    assert_eq!(config(2.0, &[]).primary_scale(), Some(2.0));
}

#[test]
fn zero_base() {
    assert_eq!(config(0.0, &[]).primary_scale(), None);
    assert_eq!(config(0.0, &[output(0.0, true)]).primary_scale(), None);
    assert_eq!(config(0.0, &[output(2.0, false)]).primary_scale(), None);
    assert_eq!(config(0.0, &[output(2.0, true)]).primary_scale(), Some(2.0));
}

#[test]
fn parse_cinnamon() {
    let c = parse(CINNAMON.as_bytes()).unwrap();
    assert_eq!(c.version.as_deref(), Some("2"));
    assert_eq!(c.base_scale, 2.0);
    assert_eq!(c.outputs, vec![output(0.0, false), output(1.5, true)]);
    assert_eq!(c.primary_scale(), Some(1.5));
}

#[test]
fn parse_minimal() {
    let c = parse(b"<monitors/>").unwrap();
    assert_eq!(c, MonitorConfig::default());
    assert_eq!(c.primary_scale(), None);

    let c = parse(b"<?xml version=\"1.0\"?><monitors><configuration/></monitors>").unwrap();
    assert_eq!(c, MonitorConfig::default());
}

#[test]
fn parse_empty_fields() {
    let c = parse(
        b"<monitors><configuration><base_scale/><output><scale> </scale><primary/></output>\
          </configuration></monitors>",
    )
    .unwrap();
    assert_eq!(c.base_scale, 0.0);
    assert_eq!(c.outputs, vec![output(0.0, false)]);
}

#[test]
fn parse_camel_case_base_scale() {
    let c = parse(b"<monitors><configuration><baseScale> 1.25 </baseScale></configuration></monitors>")
        .unwrap();
    assert_eq!(c.base_scale, 1.25);
}

#[test]
fn parse_multiple_configurations() {
    let c = parse(
        br#"<monitors version="2">
          <configuration>
            <base_scale>2</base_scale>
            <output><primary>no</primary><scale>3</scale></output>
          </configuration>
          <configuration>
            <base_scale>1</base_scale>
            <output><primary>on</primary><scale>0</scale></output>
          </configuration>
          <configuration>
            <output><primary>true</primary><scale>4</scale></output>
          </configuration>
        </monitors>"#,
    )
    .unwrap();
    assert_eq!(c.base_scale, 1.0);
    assert_eq!(
        c.outputs,
        vec![output(3.0, false), output(0.0, true), output(4.0, true)]
    );
    assert_eq!(c.primary_scale(), Some(1.0));
}

#[test]
fn parse_skips_unknown_elements() {
    let c = parse(
        br#"<monitors>
          <policy><scale>7</scale></policy>
          <configuration>
            <layout><base_scale>9</base_scale></layout>
            <output><monitorspec><scale>5</scale></monitorspec><primary>yes</primary></output>
          </configuration>
        </monitors>"#,
    )
    .unwrap();
    assert_eq!(c.base_scale, 0.0);
    assert_eq!(c.outputs, vec![output(0.0, true)]);
}

#[test]
fn parse_padded_primary() {
    let c = parse(
        b"<monitors><configuration><output><primary> yes </primary><scale>2</scale></output>\
          </configuration></monitors>",
    )
    .unwrap();
    assert_eq!(c.outputs, vec![output(2.0, false)]);
}

#[test]
fn parse_references() {
    let c = parse(
        b"<monitors><configuration><base_scale>1&#46;5</base_scale>\
          <output><primary>&#121;es</primary><scale>&#x32;</scale></output>\
          <output><primary>o&#x6e;</primary></output></configuration></monitors>",
    )
    .unwrap();
    assert_eq!(c.base_scale, 1.5);
    assert_eq!(c.outputs, vec![output(2.0, true), output(0.0, true)]);
}

#[test]
fn parse_unknown_entity() {
    assert!(
        parse(b"<monitors><configuration><base_scale>&two;</base_scale></configuration></monitors>")
            .is_err()
    );
    let c = parse(b"<monitors><configuration><output><primary>&amp;</primary></output></configuration></monitors>")
        .unwrap();
    assert_eq!(c.outputs, vec![output(0.0, false)]);
}

#[test]
fn parse_wrong_root() {
    assert!(matches!(
        parse(b"<monitor><configuration/></monitor>"),
        Err(ParserError::UnexpectedRoot(n)) if n == "monitor"
    ));
}

#[test]
fn parse_no_root() {
    assert!(matches!(parse(b""), Err(ParserError::MissingRoot)));
    assert!(matches!(
        parse(b"<!-- nothing -->"),
        Err(ParserError::MissingRoot)
    ));
}

#[test]
fn parse_invalid_number() {
    assert!(
        parse(b"<monitors><configuration><base_scale>two</base_scale></configuration></monitors>")
            .is_err()
    );
    assert!(
        parse(b"<monitors><configuration><output><scale>1,5</scale></output></configuration></monitors>")
            .is_err()
    );
}

#[test]
fn parse_malformed() {
    assert!(parse(b"<monitors><configuration><base_scale>2</base_scale>").is_err());
    assert!(parse(b"<monitors><configuration></monitors>").is_err());
}

#[test]
fn read_from_home() {
    init_logger();
    let home = TempDir::new().unwrap();
    assert_eq!(read_for_home(home.path()), None);
    let path = home.path().join(CINNAMON_MONITORS);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, CINNAMON).unwrap();
    let c = read_for_home(home.path()).unwrap();
    assert_eq!(c.primary_scale(), Some(1.5));
}

#[test]
fn path_from_host() {
    init_logger();
    let home = TempDir::new().unwrap();
    let path = home.path().join(CINNAMON_MONITORS);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, CINNAMON).unwrap();
    let host = HomeHost(Some(home.path().to_path_buf()));
    assert_eq!(monitors_path(&host).as_deref(), Some(path.as_path()));
    let c = load(&monitors_path(&host).unwrap()).unwrap();
    assert_eq!(c.primary_scale(), Some(1.5));
    assert_eq!(monitors_path(&HomeHost(None)), None);
}

#[test]
fn read_missing() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cinnamon-monitors.xml");
    assert!(matches!(load(&path), Err(CinnamonError::Open(..))));
    assert_eq!(read(&path), None);
}

#[test]
fn read_malformed() {
    init_logger();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cinnamon-monitors.xml");
    fs::write(&path, "<monitors><configuration><base_scale>x").unwrap();
    assert!(matches!(load(&path), Err(CinnamonError::Parse(..))));
    assert_eq!(read(&path), None);
}

#[test]
fn read_directory() {
    init_logger();
    let dir = TempDir::new().unwrap();
    assert!(load(dir.path()).is_err());
    assert_eq!(read(dir.path()), None);
}
