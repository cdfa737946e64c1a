#[macro_use]
mod macros;
mod cli;
mod logger;

fn main() {
    cli::main();
}
