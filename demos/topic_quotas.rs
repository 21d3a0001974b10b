//! # Per-Topic Quota Example
//!
//! Connects one subscriber to three topics with a budget of a single message
//! from each. Three producers flood their topics, yet the subscriber receives
//! exactly one message per topic before the hub closes its channel.
//!
//! ## Run
//! ```bash
//! cargo run --example topic_quotas
//! ```

use hubcast::{ConnectEach, Hub, HubConfig, Quota, Subscriber, Topic};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (hub, done) = Hub::spawn(HubConfig::default());

    let (subscriber, mut inbox) = Subscriber::channel(4);
    hub.command(
        ConnectEach::new(subscriber)
            .with_topic(Topic::from("positive"), Quota::Limit(1))
            .with_topic(Topic::from("negative"), Quota::Limit(1))
            .with_topic(Topic::from("zero"), Quota::Limit(1)),
    )
    .await?;

    let reader = tokio::spawn(async move {
        let mut values: Vec<i64> = Vec::new();
        while let Some(value) = inbox.recv().await {
            values.push(value);
        }
        values.sort_unstable();
        println!("Received {} messages: {values:?}", values.len());
    });

    let mut producers = Vec::new();
    for (topic, values) in [
        ("positive", [1i64, 7, 42]),
        ("negative", [-1, -7, -42]),
        ("zero", [0, 0, 0]),
    ] {
        let hub = hub.clone();
        producers.push(tokio::spawn(async move {
            for value in values {
                // publishes past the quota are dropped by the hub
                if hub.publish(value, [Topic::from(topic)]).await.is_err() {
                    break;
                }
            }
        }));
    }
    for producer in producers {
        producer.await?;
    }

    drop(hub);
    done.await?;
    reader.await?;
    Ok(())
}
