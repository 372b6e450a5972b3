fn main() {
    if let Err(err) = tabular_mapper::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
