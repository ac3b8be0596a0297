fn main() {
    if let Err(err) = cascade_shadows::run() {
        eprintln!("Shadow demo error: {err}");
        std::process::exit(1);
    }
}
