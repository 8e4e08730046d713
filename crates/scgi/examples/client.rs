//! Sends one SCGI request to a server and prints the response body.
//!
//! Usage: `client [target] [body]` where `target` is a `host:port`, a URL,
//! or a unix socket path.

use std::error::Error;

use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let target = args.next().unwrap_or_else(|| "127.0.0.1:4000".to_string());
    let body = args.next().unwrap_or_else(|| "hello".to_string());

    info!(target = %target, "sending request");

    let mut response = match micro_scgi::client::send(&target, body).await {
        Ok(response) => response,
        // a rejected status still carries a readable response
        Err(micro_scgi::protocol::ScgiError::RejectedStatus { response }) => {
            info!(status = %response.status(), "server rejected the request");
            *response
        }
        Err(e) => return Err(e.into()),
    };

    info!(status = %response.status(), "server answered");

    let body = response.body_mut().read_to_end().await?;
    println!("{}", String::from_utf8_lossy(&body));

    response.close().await?;
    Ok(())
}
