use std::process;

fn main() {
    if let Err(e) = causerie::cli::main() {
        eprintln!("❌ Error: {e}");
        process::exit(1);
    }
}
