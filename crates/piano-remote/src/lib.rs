//! Client core for remote-controlling a pianobar daemon over a websocket.
//!
//! The pipeline: the connection manager turns socket traffic into
//! `PlayerEvent`s on one channel, the monitor's reconcile loop folds them
//! into the `CanonicalStore`, and the projection functions derive safe
//! typed values from it.  User intents go the other way through the
//! `CommandGateway`.

pub mod connection;
pub mod gateway;
pub mod monitor;
pub mod projection;
pub mod store;
