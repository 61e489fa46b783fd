use article_gateway::error::GatewayError;

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    article_gateway::app::run().await
}
