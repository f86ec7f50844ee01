mod app;
mod logging;
mod ranges;
mod source;
mod store;

use std::process;

pub fn main() {
    let exit_code = match app::execute() {
        Ok(()) => 0,
        Err(err) => {
            // Config extraction can fail before logging is up, so this
            // goes straight to stderr.
            eprintln!("{err:#}");
            1
        }
    };
    process::exit(exit_code);
}
