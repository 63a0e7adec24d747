#[tokio::main]
async fn main() {
    restaurant_api::start_server().await;
}
