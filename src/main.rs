fn main() {
    if let Err(err) = csv_dialect::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
