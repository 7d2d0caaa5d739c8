use lambda_http::{run, service_fn, tracing, Error};

mod error;
mod http_handler;
mod repository;
mod router;
mod store;
mod task;

use http_handler::function_handler;
use repository::TaskRepository;
use store::DynamoRecordStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = aws_sdk_dynamodb::Client::new(&config);
    let table_name = std::env::var("TABLE_NAME").expect("TABLE_NAME not set");

    let repository = TaskRepository::new(DynamoRecordStore::new(client, table_name));

    run(service_fn(|event| function_handler(&repository, event))).await
}
