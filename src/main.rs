#[tokio::main]
async fn main() {
    jotter::start_server().await;
}
