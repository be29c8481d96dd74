#[tokio::main]
async fn main() {
    if let Err(e) = docbridge::app::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
