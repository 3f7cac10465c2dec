fn main() {
    std::process::exit(cloud_report::cli::run());
}
