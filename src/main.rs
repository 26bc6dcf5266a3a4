fn main() {
    blu::logging::init();
    std::process::exit(blu::cli::run());
}
