/// Entry point for the application.
///
/// An optional config file path can be passed as the first argument.
/// It then calls the `run` function and blocks until it completes.
fn main() {
    std::env::set_var("RUST_BACKTRACE", "1");
    let config_path = std::env::args().nth(1);
    pollster::block_on(wgpu_triangle::run(config_path));
}
