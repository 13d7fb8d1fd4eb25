//! Burnish binary entry point.
//!
//! Exit codes: 0 on success, 100 on any uncaught error.

use burnish::cli;
use burnish::ui::output;

fn main() {
    if let Err(error) = cli::run() {
        output::error(format_args!("{error:#}"));
        std::process::exit(100);
    }
}
