//! Remote command gateway — maps the four user intents onto outbound
//! JSON-RPC requests.
//!
//! Dispatch is fire-and-forget: the caller never sees the call's result;
//! success or failure shows up indirectly through later state pushes.  No
//! debouncing — invoking an operation N times produces N requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use piano_proto::rpc::RpcRequest;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CommandGateway {
    call_tx: mpsc::Sender<RpcRequest>,
    next_id: Arc<AtomicU64>,
}

impl CommandGateway {
    pub fn new(call_tx: mpsc::Sender<RpcRequest>) -> Self {
        Self {
            call_tx,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn pause(&self) {
        self.dispatch("pause", None);
    }

    pub fn resume(&self) {
        self.dispatch("resume", None);
    }

    pub fn skip(&self) {
        self.dispatch("skip", None);
    }

    pub fn change_station(&self, station_idx: usize) {
        self.dispatch("change_station", Some(json!({ "station_id": station_idx })));
    }

    fn dispatch(&self, method: &'static str, params: Option<serde_json::Value>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);
        // A full or closed queue means the connection task is gone or
        // hopelessly behind; either way the contract is to drop quietly.
        if let Err(err) = self.call_tx.try_send(request) {
            debug!("dropping `{}` call: {}", method, err);
        }
    }
}
