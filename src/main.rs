#[tokio::main]
async fn main() {
    if let Err(e) = billscope::run().await {
        eprintln!("billscope failed to start: {e}");
        std::process::exit(1);
    }
}
