use {
    crate::cli::{GetArgs, GlobalArgs},
    devicescale::{Resolver, SystemHost},
};

pub fn main(global: GlobalArgs, args: GetArgs) {
    let _logger = global.install_logger();
    let resolver = Resolver::new(SystemHost::new(&global.config()));
    let res = resolver.resolve(args.x, args.y);
    if args.verbose {
        println!("desktop: {}", res.desktop);
        println!("source:  {}", res.source);
        println!("scale:   {}", res.scale);
    } else {
        println!("{}", res.scale);
    }
}
