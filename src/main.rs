fn main() -> std::process::ExitCode {
    launcher_lib::run()
}
