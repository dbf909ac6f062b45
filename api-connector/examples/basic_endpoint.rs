// api-connector/examples/basic_endpoint.rs
// Define a few endpoints and call them
//
// Run: API_ORIGIN=https://jsonplaceholder.typicode.com cargo run -p api-connector --example basic_endpoint

use api_connector::logger::init_logger;
use api_connector::{
    ApiResult, CallSettings, Connector, ConnectorConfig, Endpoint, EndpointSettings, FeedbackEvent,
    NotificationDispatcher, NotificationPolicy, QueryParams, StaticTranslations, TranslationCache,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    id: u32,
    title: String,
}

#[derive(Debug, Clone, Serialize)]
struct NewPost {
    title: String,
    body: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let translations = StaticTranslations::new()
        .with("en", "post.created", "Post created")
        .with("en", "post.failed", "Could not create the post");

    let connector = Connector::builder(
        ConnectorConfig::from_env()
            .with_default_header("Content-Type", "application/json")
            .with_lang("en"),
    )
    .notifications(NotificationDispatcher::new(
        Arc::new(TranslationCache::new(Arc::new(translations))),
        Arc::new(tx),
    ))
    .build()?;

    let posts: Endpoint<Vec<Post>> = connector.endpoint(EndpointSettings::get("/posts"));
    let post: Endpoint<Post> = connector.endpoint(EndpointSettings::get("/posts/:id"));
    let create: Endpoint<Post, serde_json::Value, NewPost> = connector.endpoint(EndpointSettings::post(
        "/posts",
        Some(
            NotificationPolicy::new()
                .on_success(FeedbackEvent::success("post.created"))
                .on_error(FeedbackEvent::error("post.failed")),
        ),
    ));

    let list = posts
        .call(CallSettings::new().query(QueryParams::new().with("userId", "1")))
        .invoke()
        .await;
    match list {
        ApiResult::Ok { data, status } => {
            println!("{} posts (status {})", data.map(|p| p.len()).unwrap_or(0), status)
        }
        ApiResult::Err { error, status } => println!("listing failed with {}: {:?}", status, error),
    }

    match post.call(CallSettings::new().param("id", "1")).fetch().await {
        Ok(Some(post)) => println!("first post: {}", post.title),
        Ok(None) => println!("first post: empty body"),
        Err(e) => println!("{}", e),
    }

    let created = create
        .call(CallSettings::new().payload(NewPost {
            title: "hello".into(),
            body: "from the api connector".into(),
        }))
        .invoke()
        .await;
    println!("create finished with status {}", created.status());

    while let Ok(feedback) = rx.try_recv() {
        println!("[{:?}] {}", feedback.kind, feedback.message);
    }

    Ok(())
}
