fn main() {
    if let Err(e) = add_trusted_cert::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
