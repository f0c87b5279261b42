//! Breed-render - Command-line tool for rendering creature breeds to PNG

use std::process::ExitCode;

use breedrender::cli;

fn main() -> ExitCode {
    cli::run()
}
