fn main() {
    if let Err(e) = codemodel_cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
