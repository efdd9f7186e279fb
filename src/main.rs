//! nyush: interactive shell entry point.
//!
//! Reads commands from stdin one line at a time and writes the prompt to
//! stdout. Diagnostics go to stderr as `Error: <message>`.
//!
//! Flags:
//!   --dump-config   print the merged configuration as TOML and exit

use nyush::config::Config;
use nyush::exec::signals;
use nyush::{Shell, logging};

fn main() {
    let config = Config::load();

    if std::env::args().skip(1).any(|arg| arg == "--dump-config") {
        match config.to_toml() {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("nyush: cannot render config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    logging::init(&config.logging);
    log::info!("nyush starting, pid {}", std::process::id());

    if let Err(e) = signals::ignore_interactive() {
        log::warn!("cannot ignore interactive signals: {e}");
    }

    let mut shell = Shell::new(config);
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = shell.run(&mut stdin, &mut stdout) {
        eprintln!("{}", e.diagnostic());
        std::process::exit(1);
    }
    std::process::exit(0);
}
