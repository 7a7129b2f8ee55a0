fn main() {
    if let Err(err) = wellness_intake::cli::main() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}
