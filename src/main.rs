fn main() {
    if let Err(err) = xlsx_reorder::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
