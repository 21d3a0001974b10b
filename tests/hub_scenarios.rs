//! End-to-end scenarios driving a spawned hub through its public surface.

use std::time::Duration;

use tokio::time::timeout;

use hubcast::{
    Command, Connect, ConnectEach, Hub, HubConfig, HubError, Quota, Subscriber, Subscription, Topic,
};

const RECV_GUARD: Duration = Duration::from_secs(1);

/// Collects everything a subscription delivers until its channel closes.
async fn transcript(rx: &mut Subscription<&'static str>) -> Vec<&'static str> {
    let mut received = Vec::new();
    loop {
        match timeout(RECV_GUARD, rx.recv()).await {
            Ok(Some(message)) => received.push(message),
            Ok(None) => return received,
            Err(_) => panic!("subscription was not closed; received so far: {received:?}"),
        }
    }
}

#[tokio::test]
async fn shared_subscriber_over_two_topics() {
    let (hub, done) = Hub::spawn(HubConfig::default());
    let (topic_a, topic_b) = (Topic::from("a"), Topic::from("b"));

    let (sub, mut rx) = Subscriber::channel(8);
    hub.command(Connect::new(sub, [topic_a.clone(), topic_b.clone()]))
        .await
        .unwrap();

    hub.publish("x", [topic_a.clone()]).await.unwrap();
    hub.publish("y", [topic_a.clone()]).await.unwrap();
    hub.publish("z", [topic_b]).await.unwrap();
    hub.close_topics([topic_a]).await.unwrap();

    drop(hub);
    done.await.unwrap();

    assert_eq!(transcript(&mut rx).await, ["x", "y", "z"]);
}

#[tokio::test]
async fn per_topic_quotas_drain_independently() {
    let (hub, done) = Hub::spawn(HubConfig::default());
    let (a, b, c) = (Topic::from("a"), Topic::from("b"), Topic::from("c"));
    let all = || [a.clone(), b.clone(), c.clone()];

    let (sub, mut rx) = Subscriber::channel(8);
    hub.command(
        ConnectEach::new(sub)
            .with_topic(a.clone(), Quota::Limit(1))
            .with_topic(b.clone(), Quota::Limit(2))
            .with_topic(c.clone(), Quota::Limit(3)),
    )
    .await
    .unwrap();

    hub.publish("First", all()).await.unwrap();
    hub.publish("Second", all()).await.unwrap();
    hub.publish("Third", all()).await.unwrap();

    drop(hub);
    done.await.unwrap();

    assert_eq!(
        transcript(&mut rx).await,
        ["First", "First", "First", "Second", "Second", "Third"]
    );
}

#[tokio::test]
async fn total_budget_caps_the_per_topic_budgets() {
    let (hub, done) = Hub::spawn(HubConfig::default());
    let (a, b) = (Topic::from("a"), Topic::from("b"));

    let (first, mut first_rx) = Subscriber::channel(8);
    let (second, mut second_rx) = Subscriber::channel(8);
    hub.command(
        ConnectEach::new(first)
            .with_topic(a.clone(), Quota::Limit(1))
            .with_topic(b.clone(), Quota::Limit(2))
            .with_quota(Quota::Limit(2)),
    )
    .await
    .unwrap();
    hub.command(
        ConnectEach::new(second)
            .with_topic(a.clone(), Quota::Limit(1))
            .with_topic(b.clone(), Quota::Limit(2))
            .with_quota(Quota::Limit(4)),
    )
    .await
    .unwrap();

    hub.publish("First", [a.clone(), b.clone()]).await.unwrap();
    hub.publish("Second", [a, b]).await.unwrap();

    drop(hub);
    done.await.unwrap();

    assert_eq!(transcript(&mut first_rx).await, ["First", "First"]);
    assert_eq!(transcript(&mut second_rx).await, ["First", "First", "Second"]);
}

#[tokio::test]
async fn keep_alive_survives_disconnect_and_shutdown() {
    let (hub, done) = Hub::spawn(HubConfig::default());

    let (sub, mut rx) = Subscriber::channel(8);
    let direct = sub.clone();
    let id = sub.id();
    hub.command(Connect::new(sub, []).with_keep_alive(true))
        .await
        .unwrap();

    hub.publish("Hi", []).await.unwrap();
    assert_eq!(rx.recv().await, Some("Hi"));

    hub.disconnect(id, []).await.unwrap();
    hub.publish("dropped", []).await.unwrap();

    direct.send("self").await.unwrap();
    assert_eq!(rx.recv().await, Some("self"));

    drop(hub);
    done.await.unwrap();

    // the channel is still ours; closing it is our job
    drop(direct);
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn closing_a_topic_spares_keep_alive_members() {
    let (hub, done) = Hub::spawn(HubConfig::default());
    let (a, b) = (Topic::from("a"), Topic::from("b"));

    let (on_a, mut on_a_rx) = Subscriber::channel(8);
    let (on_b, mut on_b_rx) = Subscriber::channel(8);
    let (kept, mut kept_rx) = Subscriber::channel(8);
    let kept_direct = kept.clone();

    hub.command(Connect::new(on_a, [a.clone()])).await.unwrap();
    hub.command(Connect::new(on_b, [b.clone()])).await.unwrap();
    hub.command(Connect::new(kept, [a.clone()]).with_keep_alive(true))
        .await
        .unwrap();

    hub.close_topics([a.clone()]).await.unwrap();
    hub.publish("X", [a, b]).await.unwrap();

    drop(hub);
    done.await.unwrap();

    assert_eq!(transcript(&mut on_a_rx).await, Vec::<&str>::new());
    assert_eq!(transcript(&mut on_b_rx).await, ["X"]);

    // the keep-alive channel is still open until its owner closes it
    assert!(timeout(Duration::from_millis(50), kept_rx.recv())
        .await
        .is_err());
    drop(kept_direct);
    assert_eq!(kept_rx.recv().await, None);
}

#[tokio::test]
async fn bare_payload_broadcasts_to_the_default_topic() {
    let (hub, done) = Hub::spawn(HubConfig::default());

    let mut rx = hub.connect([]).await.unwrap();
    let reader = tokio::spawn(async move {
        let mut received = Vec::new();
        while let Some(message) = rx.recv().await {
            received.push(message);
        }
        received
    });

    // not wrapped in a Publish command on purpose
    hub.command("hello").await.unwrap();

    drop(hub);
    done.await.unwrap();

    assert_eq!(reader.await.unwrap(), ["hello"]);
}

#[tokio::test]
async fn bare_subscriber_connects_to_the_default_topic() {
    let (hub, done) = Hub::spawn(HubConfig::default());

    let (sub, mut rx) = Subscriber::channel(8);
    hub.command(sub).await.unwrap();
    hub.publish("default delivery", []).await.unwrap();

    drop(hub);
    done.await.unwrap();

    assert_eq!(transcript(&mut rx).await, ["default delivery"]);
}

#[tokio::test]
async fn subscribers_observe_commands_in_arrival_order() {
    let (hub, done) = Hub::spawn(HubConfig::default());
    let topic = Topic::from("ordered");

    let (sub, mut rx) = Subscriber::channel(64);
    hub.command(Connect::new(sub, [topic.clone()])).await.unwrap();

    for message in ["1", "2", "3", "4", "5"] {
        hub.publish(message, [topic.clone()]).await.unwrap();
    }

    drop(hub);
    done.await.unwrap();

    assert_eq!(transcript(&mut rx).await, ["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn commands_fail_once_the_dispatcher_is_gone() {
    let (hub, dispatcher) = Hub::<&str>::channel(HubConfig::default());
    drop(dispatcher);

    assert_eq!(hub.publish("late", []).await, Err(HubError::Closed));
    assert_eq!(hub.close_all().await, Err(HubError::Closed));
}

#[tokio::test]
async fn disconnect_all_closes_immediately() {
    let (hub, done) = Hub::spawn(HubConfig::default());
    let (a, b) = (Topic::from("a"), Topic::from("b"));

    let (sub, mut rx) = Subscriber::channel(8);
    let id = sub.id();
    hub.command(Connect::new(sub, [a.clone(), b.clone()])).await.unwrap();

    hub.publish("before", [a.clone()]).await.unwrap();
    hub.disconnect_all(id).await.unwrap();
    hub.publish("after", [a, b]).await.unwrap();

    assert_eq!(transcript(&mut rx).await, ["before"]);

    drop(hub);
    done.await.unwrap();
}

#[tokio::test]
async fn facade_disconnect_by_subscription_id() {
    let (hub, done) = Hub::spawn(HubConfig::default());
    let topic = Topic::from("alerts");

    let mut rx = hub.connect([topic.clone()]).await.unwrap();
    let id = rx.id();

    let reader = tokio::spawn(async move {
        let mut received = Vec::new();
        while let Some(message) = rx.recv().await {
            received.push(message);
        }
        received
    });

    hub.publish("seen", [topic.clone()]).await.unwrap();
    hub.disconnect(id, [topic.clone()]).await.unwrap();
    hub.publish("unseen", [topic]).await.unwrap();

    drop(hub);
    done.await.unwrap();

    assert_eq!(reader.await.unwrap(), ["seen"]);
}

#[tokio::test]
async fn raw_dispatcher_can_be_driven_by_the_caller() {
    let (hub, dispatcher) = Hub::channel(HubConfig::default());
    let done = tokio::spawn(dispatcher.run());

    let (sub, mut rx) = Subscriber::channel(8);
    hub.command(Command::Subscribe(sub)).await.unwrap();
    hub.command("driven by hand").await.unwrap();

    drop(hub);
    done.await.unwrap();

    assert_eq!(transcript(&mut rx).await, ["driven by hand"]);
}
