fn main() {
    monograph::cli::run();
}
