use anyhow::Result;

use carelog::app::serve;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    serve().await
}
