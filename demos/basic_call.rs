//! Basic example demonstrating GET, JSON POST and error handling.
//!
//! Run with: `cargo run --example basic_call`

use httpc::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct NewPost {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u32,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("httpc=debug,basic_call=info")
        .init();

    let client = Client::builder().user_agent("httpc-demo/0.1")?.build()?;

    println!("=== GET Request Example ===");
    let response = client
        .get("https://jsonplaceholder.typicode.com/posts/1")
        .fetch::<Post>()
        .await?;

    println!("Post ID: {}", response.data.id);
    println!("Title: {}", response.data.title);
    println!("Request latency: {:?}", response.latency);
    println!("Status code: {}", response.status);
    println!();

    println!("=== POST Request Example ===");
    let new_post = NewPost {
        title: "My New Post".to_string(),
        body: "This is the content of my new post!".to_string(),
        user_id: 1,
    };

    let created: Post = client
        .post_json("https://jsonplaceholder.typicode.com/posts", &new_post)
        .load()
        .await?;
    println!("Created post ID: {}", created.id);
    println!();

    println!("=== Deferred Error Example ===");
    let result = client
        .get("not a url")
        .add_headers([("X-Ignored", "true")])
        .bearer_auth("token")
        .send()
        .await;
    match result {
        Err(e) if e.is_deferred() => println!("Rejected before any I/O: {}", e),
        Err(e) => println!("Unexpected error: {}", e),
        Ok(response) => println!("Unexpected success: {}", response.status()),
    }

    println!();
    println!("=== Rejected Status Example ===");
    match client
        .get("https://jsonplaceholder.typicode.com/does-not-exist")
        .send()
        .await
    {
        Err(e) => println!("Status {:?}, body: {}", e.status(), e),
        Ok(response) => println!("Unexpected success: {}", response.status()),
    }

    Ok(())
}
