use crate::helpers::{get_connection_factory, get_publisher, publish, Received, Recorder};
use sensor_pubsub::consumers::{hooks::pre_start::DirectQueueDeclarer, Consumer};
use sensor_pubsub::publishers::MessageEnvelope;
use sensor_pubsub::sensors::IntegerReading;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a RabbitMQ broker on localhost:5672"]
async fn the_direct_consumer_receives_the_published_reading() {
    // Arrange
    let context = Arc::new(Received::<i64>::default());
    let queue_name = Uuid::new_v4().to_string();

    let consumer = Consumer::builder(
        get_connection_factory(),
        &queue_name,
        Recorder::<i64>::new(),
        context.clone(),
    )
    .with_pre_start_hook(DirectQueueDeclarer)
    .exit_after(1)
    .build()
    .await
    .unwrap();
    let publisher = get_publisher().await;

    // Act
    let handle = tokio::spawn(consumer.run_until_shutdown(futures_util::future::pending()));
    publish(&publisher, "", &queue_name, &IntegerReading::default()).await;
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    // Assert
    let readings = context.readings.lock().await;
    assert_eq!(1, readings.len());
    assert_eq!(
        IntegerReading {
            id: 11,
            packet_no: 126,
            temperature: 30,
            humidity: 60,
            tds: 1100,
            ph: 5.0,
        },
        readings[0].1
    );
}

#[tokio::test]
#[ignore = "requires a RabbitMQ broker on localhost:5672"]
async fn a_malformed_message_is_skipped_and_the_next_one_is_processed() {
    // Arrange
    let context = Arc::new(Received::<i64>::default());
    let queue_name = Uuid::new_v4().to_string();

    let consumer = Consumer::builder(
        get_connection_factory(),
        &queue_name,
        Recorder::<i64>::new(),
        context.clone(),
    )
    .with_pre_start_hook(DirectQueueDeclarer)
    .exit_after(2)
    .build()
    .await
    .unwrap();
    let publisher = get_publisher().await;

    // Act
    let handle = tokio::spawn(consumer.run_until_shutdown(futures_util::future::pending()));
    publisher
        .publish(
            MessageEnvelope::default()
                .with_payload("Not JSON".as_bytes().into())
                .with_routing_key(queue_name.clone()),
        )
        .await
        .unwrap();
    let reading = IntegerReading {
        id: 12,
        ..IntegerReading::default()
    };
    publish(&publisher, "", &queue_name, &reading).await;
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(1, *context.failures.lock().await);
    let readings = context.readings.lock().await;
    assert_eq!(vec![reading], readings.iter().map(|(_, r)| *r).collect::<Vec<_>>());
}

#[tokio::test]
#[ignore = "requires a RabbitMQ broker on localhost:5672"]
async fn the_consumer_stops_on_shutdown() {
    let queue_name = Uuid::new_v4().to_string();
    let consumer = Consumer::builder(
        get_connection_factory(),
        &queue_name,
        Recorder::<i64>::new(),
        Received::<i64>::default(),
    )
    .with_pre_start_hook(DirectQueueDeclarer)
    .build()
    .await
    .unwrap();

    let (trigger, signal) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(consumer.run_until_shutdown(async move {
        let _ = signal.await;
    }));
    trigger.send(()).unwrap();

    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}

#[tokio::test]
#[ignore = "requires a RabbitMQ broker on localhost:5672"]
async fn redeclaring_the_queue_is_idempotent() {
    let queue_name = Uuid::new_v4().to_string();
    let channel = get_connection_factory().open_channel().await.unwrap();
    let options = sensor_pubsub::amqp::QueueOptions::transient();

    channel.declare_queue(&queue_name, options).await.unwrap();
    channel.declare_queue(&queue_name, options).await.unwrap();

    channel.close().await;
}
