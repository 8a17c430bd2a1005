//! Entry point for the `precincts` command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = precinct_cli::run() {
        eprintln!("precincts: {err}");
        std::process::exit(1);
    }
}
