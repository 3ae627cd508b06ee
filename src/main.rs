use clap::Parser;
use lectern::cli::commands::{Cli, Commands};
use lectern::cli::handlers;

fn main() {
    let cli = Cli::parse();
    let library_dir = cli.library_dir.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI (it sets up its own file logging)
            if let Err(e) = lectern::tui::run(library_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Init(args)) => {
            lectern::logging::init_stderr();
            // Init is handled before library discovery
            if let Err(e) = handlers::cmd_init(args, library_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            lectern::logging::init_stderr();
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
