use clap::Parser;

mod cli;
mod commands;

fn main() {
    let parsed = cli::Cli::parse();

    // The process exit code is the dispatched command's exit code: the
    // workflow's final (or first failing) step, or the single invoked
    // command. Errors from the taxonomy print one short line and exit 1.
    match parsed.dispatch() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}
