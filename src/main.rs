use std::process;

fn main() {
    process::exit(sprig::cli::run());
}
