//! # Basic Hub Example
//!
//! Spawns a hub, connects one subscriber to the default topic through the
//! shortcut surface, publishes a few messages, then closes the input and
//! waits for the full drain.
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use hubcast::{Hub, HubConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hubcast=debug".into()),
        )
        .init();

    let (hub, done) = Hub::spawn(HubConfig::default());

    let mut inbox = hub.connect([]).await?;
    let reader = tokio::spawn(async move {
        while let Some(message) = inbox.recv().await {
            println!("{message}");
        }
        println!("Done!");
    });

    hub.publish("Hello", []).await?;
    hub.publish("It's nice to see you", []).await?;
    hub.publish("I'll leave now", []).await?;

    // Close the hub and wait for resources to be freed.
    drop(hub);
    done.await?;
    reader.await?;
    Ok(())
}
