use clap::Parser;

fn main() {
    env_logger::init();
    let args = romgen::cli::Args::parse();
    if let Err(err) = romgen::run(args) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
