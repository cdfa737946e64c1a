use {
    crate::cli::GlobalArgs,
    devicescale::{Desktop, SystemHost},
};

pub fn main(global: GlobalArgs) {
    let _logger = global.install_logger();
    let host = SystemHost::new(&global.config());
    println!("{}", Desktop::current(&host));
}
