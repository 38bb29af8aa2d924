fn main() {
    std::process::exit(valtools_lib::run());
}
