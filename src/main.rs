// Tue Jan 13 2026 - Alex

use colored::Colorize;

fn main() {
    if let Err(e) = heapsnap::ui::cli::run() {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}
