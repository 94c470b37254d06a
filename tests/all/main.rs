//! End-to-end scenarios against a RabbitMQ broker listening on localhost:5672.
//!
//! Run them with `cargo test -- --ignored` once a broker is up, e.g.
//! `docker run -p 5672:5672 rabbitmq:3`.
mod direct;
mod helpers;
mod topic;
