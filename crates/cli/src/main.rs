fn main() {
    if let Err(e) = jbridge_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
