//! # Raw Command Example
//!
//! Drives the dispatcher by hand instead of using `Hub::spawn`, builds the
//! subscriber channel explicitly, and leans on the input conversions: a bare
//! subscriber connects to the default topic, and a bare payload broadcasts
//! to it.
//!
//! ## Run
//! ```bash
//! cargo run --example raw_commands
//! ```

use hubcast::{Hub, HubConfig, Subscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (hub, dispatcher) = Hub::channel(HubConfig::default());
    let done = tokio::spawn(dispatcher.run());

    let (subscriber, mut inbox) = Subscriber::channel(4);
    // A bare subscriber is a connect to the default topic.
    hub.command(subscriber).await?;

    let reader = tokio::spawn(async move {
        while let Some(message) = inbox.recv().await {
            println!("{message}");
        }
        println!("Done!");
    });

    // Bare payloads are broadcasts to the default topic.
    hub.command("Hello").await?;
    hub.command("It's nice to see you").await?;
    hub.command("I'll leave now").await?;

    drop(hub);
    done.await?;
    reader.await?;
    Ok(())
}
