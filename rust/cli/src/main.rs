fn main() {
    blindjack_cli::logging::init();
    let code = blindjack_cli::run(
        std::env::args(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    std::process::exit(code);
}
