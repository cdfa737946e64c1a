use {
    crate::cli::{CinnamonArgs, GlobalArgs},
    devicescale::{SystemHost, cinnamon},
    error_reporter::Report,
};

pub fn main(global: GlobalArgs, args: CinnamonArgs) {
    let _logger = global.install_logger();
    let path = match args.path {
        Some(p) => p,
        None => {
            let host = SystemHost::new(&global.config());
            match cinnamon::monitors_path(&host) {
                Some(path) => path,
                None => fatal!("Could not determine the home directory"),
            }
        }
    };
    let config = match cinnamon::load(&path) {
        Ok(c) => c,
        Err(e) => fatal!("{}", Report::new(e)),
    };
    println!("path:       {}", path.display());
    if let Some(version) = &config.version {
        println!("version:    {}", version);
    }
    println!("base scale: {}", config.base_scale);
    for (idx, output) in config.outputs.iter().enumerate() {
        println!(
            "output {}:   scale {}{}",
            idx,
            output.scale,
            if output.primary { ", primary" } else { "" },
        );
    }
    match config.primary_scale() {
        Some(s) => println!("primary:    {}", s),
        None => println!("primary:    none"),
    }
}
