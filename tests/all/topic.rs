use crate::helpers::{get_connection_factory, get_publisher, publish, Received, Recorder};
use sensor_pubsub::amqp::{ErrorClass, ExchangeKind, Durability};
use sensor_pubsub::consumers::{hooks::pre_start::TopicQueueBinder, Consumer};
use sensor_pubsub::sensors::{routing::TOPIC_EXCHANGE, IntegerReading, ReadingOverrides};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn binder(routing_keys: &[&str]) -> TopicQueueBinder {
    TopicQueueBinder {
        exchange_name: TOPIC_EXCHANGE.into(),
        routing_keys: routing_keys.iter().map(|k| k.to_string()).collect(),
    }
}

#[tokio::test]
#[ignore = "requires a RabbitMQ broker on localhost:5672"]
async fn a_queue_bound_to_several_patterns_only_receives_matching_messages() {
    // Arrange
    let context = Arc::new(Received::<f64>::default());
    let queue_name = Uuid::new_v4().to_string();
    // A unique first segment keeps other tests' messages out of this queue.
    let prefix = Uuid::new_v4().simple().to_string();
    let temperature = format!("{prefix}.temp");
    let critical = format!("{prefix}.*.critical");

    let consumer = Consumer::builder(
        get_connection_factory(),
        &queue_name,
        Recorder::<f64>::new(),
        context.clone(),
    )
    .with_pre_start_hook(binder(&[&temperature, &critical]))
    .exit_after(2)
    .build()
    .await
    .unwrap();
    let publisher = get_publisher().await;

    // Act
    let handle = tokio::spawn(consumer.run_until_shutdown(futures_util::future::pending()));
    let reading = IntegerReading::default();
    publish(&publisher, TOPIC_EXCHANGE, &format!("{prefix}.humidity"), &reading).await;
    publish(&publisher, TOPIC_EXCHANGE, &temperature, &reading).await;
    publish(&publisher, TOPIC_EXCHANGE, &format!("{prefix}.pump.critical"), &reading).await;
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    // Assert
    let routing_keys: Vec<String> = context
        .readings
        .lock()
        .await
        .iter()
        .map(|(key, _)| key.clone())
        .collect();
    assert_eq!(vec![temperature, format!("{prefix}.pump.critical")], routing_keys);
}

#[tokio::test]
#[ignore = "requires a RabbitMQ broker on localhost:5672"]
async fn overridden_readings_reach_the_topic_consumer() {
    // Arrange
    let context = Arc::new(Received::<f64>::default());
    let queue_name = Uuid::new_v4().to_string();
    let routing_key = format!("{}.temp", Uuid::new_v4().simple());

    let consumer = Consumer::builder(
        get_connection_factory(),
        &queue_name,
        Recorder::<f64>::new(),
        context.clone(),
    )
    .with_pre_start_hook(binder(&[&routing_key]))
    .exit_after(1)
    .build()
    .await
    .unwrap();
    let publisher = get_publisher().await;

    // Act
    let handle = tokio::spawn(consumer.run_until_shutdown(futures_util::future::pending()));
    let reading = ReadingOverrides {
        id: Some("42".into()),
        ..ReadingOverrides::default()
    }
    .apply(IntegerReading::default());
    publish(&publisher, TOPIC_EXCHANGE, &routing_key, &reading).await;
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    // Assert
    let readings = context.readings.lock().await;
    let (key, received) = &readings[0];
    assert_eq!(&routing_key, key);
    assert_eq!(42, received.id);
    assert_eq!(126, received.packet_no);
    assert_eq!(30.0, received.temperature);
    assert_eq!(60.0, received.humidity);
    assert_eq!(1100, received.tds);
    assert_eq!(5.0, received.ph);
}

#[tokio::test]
#[ignore = "requires a RabbitMQ broker on localhost:5672"]
async fn redeclaring_the_exchange_with_other_parameters_is_rejected() {
    let channel = get_connection_factory().open_channel().await.unwrap();
    channel
        .declare_exchange(TOPIC_EXCHANGE, ExchangeKind::Topic, Durability::Durable)
        .await
        .unwrap();

    let error = channel
        .declare_exchange(TOPIC_EXCHANGE, ExchangeKind::Topic, Durability::Transient)
        .await
        .unwrap_err();

    assert_eq!(ErrorClass::Rejected, error.class());
}
