//! Usage: Scripted in-memory bridge for store tests.

use super::{CommandBridge, RemoteResult, TransportError};
use crate::shared::mutex_ext::MutexExt;
use futures_core::future::BoxFuture;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

type Reply = Result<Value, TransportError>;

#[derive(Default)]
struct Script {
    queued: HashMap<&'static str, VecDeque<Reply>>,
    held_commands: HashSet<&'static str>,
    held: Vec<Option<oneshot::Sender<Reply>>>,
    calls: Vec<(&'static str, Value)>,
}

#[derive(Default)]
pub(crate) struct ScriptedBridge {
    script: Mutex<Script>,
}

pub(crate) fn ok(data: Value) -> Reply {
    Ok(RemoteResult::Success(data).to_value())
}

pub(crate) fn fail(message: &str) -> Reply {
    Ok(RemoteResult::<Value>::Failure(message.to_string()).to_value())
}

pub(crate) fn transport(message: &str) -> Reply {
    Err(TransportError(message.to_string()))
}

impl ScriptedBridge {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, command: &'static str, reply: Reply) -> &Self {
        self.script
            .lock_or_recover()
            .queued
            .entry(command)
            .or_default()
            .push_back(reply);
        self
    }

    /// Calls to `command` stay pending until released by call order.
    pub(crate) fn hold(&self, command: &'static str) {
        self.script.lock_or_recover().held_commands.insert(command);
    }

    pub(crate) fn release(&self, held_index: usize, reply: Reply) {
        let sender = self
            .script
            .lock_or_recover()
            .held
            .get_mut(held_index)
            .and_then(Option::take)
            .expect("held call exists and was not released yet");
        let _ = sender.send(reply);
    }

    pub(crate) fn held_count(&self) -> usize {
        self.script.lock_or_recover().held.len()
    }

    pub(crate) fn calls(&self) -> Vec<(&'static str, Value)> {
        self.script.lock_or_recover().calls.clone()
    }

    pub(crate) fn call_count(&self, command: &str) -> usize {
        self.script
            .lock_or_recover()
            .calls
            .iter()
            .filter(|(name, _)| *name == command)
            .count()
    }

    pub(crate) async fn wait_for_held(&self, count: usize) {
        for _ in 0..1_000 {
            if self.held_count() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {count} held calls, saw {}", self.held_count());
    }
}

impl CommandBridge for ScriptedBridge {
    fn invoke<'a>(
        &'a self,
        command: &'static str,
        args: Value,
    ) -> BoxFuture<'a, Result<Value, TransportError>> {
        let mut script = self.script.lock_or_recover();
        script.calls.push((command, args));
        if script.held_commands.contains(command) {
            let (tx, rx) = oneshot::channel();
            script.held.push(Some(tx));
            return Box::pin(async move {
                rx.await
                    .unwrap_or_else(|_| Err(TransportError("held call dropped".to_string())))
            });
        }
        let reply = script
            .queued
            .get_mut(command)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError(format!("no scripted reply for {command}"))));
        Box::pin(async move { reply })
    }
}
