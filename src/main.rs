use shoptrack::ui::messages::error;

fn main() {
    if let Err(e) = shoptrack::run() {
        error(e);
        std::process::exit(1);
    }
}
