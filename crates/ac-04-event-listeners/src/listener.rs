//! Subscription base shared by every contract listener.

use std::marker::PhantomData;

use ac_01_web3_transport::{Contract, EventLog, EventStream, B256};
use ac_02_contract_gateway::{ContractEnvironment, SolidityContract};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared_types::{EthereumAddress, ValidationError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

use crate::errors::ListenerError;

// =============================================================================
// PAYLOAD SHAPE
// =============================================================================

/// Where an event keeps its record among the decoded arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// The record is the single struct argument with this name.
    Nested(&'static str),
    /// The arguments themselves are the record.
    Flat,
}

impl Payload {
    /// Pull the record out of an emission and deserialize it.
    pub fn extract<R: DeserializeOwned>(
        self,
        event: &str,
        values: &Map<String, Value>,
    ) -> Result<R, ListenerError> {
        let raw = match self {
            Payload::Nested(key) => values.get(key).cloned().ok_or_else(|| ListenerError::Payload {
                event: event.to_string(),
                reason: format!("missing `{}` argument", key),
            })?,
            Payload::Flat => Value::Object(values.clone()),
        };
        serde_json::from_value(raw).map_err(|e| ListenerError::Payload {
            event: event.to_string(),
            reason: e.to_string(),
        })
    }
}

// =============================================================================
// CONTRACT LISTENER
// =============================================================================

/// One contract seen through an event-capable connection.
#[derive(Debug, Clone)]
pub struct ContractListener {
    contract: SolidityContract,
}

impl ContractListener {
    pub fn new(
        env: &ContractEnvironment,
        name: &str,
        address: EthereumAddress,
    ) -> Result<Self, ListenerError> {
        Ok(Self {
            contract: SolidityContract::new(env, name, address)?,
        })
    }

    pub fn name(&self) -> &str {
        self.contract.name()
    }

    pub fn address(&self) -> &EthereumAddress {
        self.contract.address()
    }

    /// Subscribe to `event` and hand every inflated record to `handler`.
    ///
    /// Records are delivered in the order the node pushes them. A failing
    /// emission (transport error, malformed payload, invalid record) is
    /// logged and skipped. Delivery stops when the connection ends; events
    /// emitted while disconnected are not replayed.
    pub async fn start_listening<R, T, I, H>(
        &self,
        event: &str,
        payload: Payload,
        inflate: I,
        handler: H,
    ) -> Result<Listening, ListenerError>
    where
        R: DeserializeOwned + 'static,
        T: Send + 'static,
        I: Fn(&R) -> Result<T, ValidationError> + Send + 'static,
        H: FnMut(T) + Send + 'static,
    {
        debug!(contract = %self.name(), address = %self.address(), "Subscribing to {} events", event);

        let stream = self
            .contract
            .handle()
            .subscribe_event(event)
            .await
            .map_err(|e| ListenerError::Subscribe {
                contract: self.name().to_string(),
                address: self.address().to_string(),
                event: event.to_string(),
                reason: e.to_string(),
            })?;
        let subscription_id = stream.id;
        info!(
            contract = %self.name(),
            event,
            subscription = %subscription_id,
            "Subscribed"
        );

        let delivery = Delivery {
            contract: self.name().to_string(),
            event: event.to_string(),
            payload,
            inflate,
            handler,
            _records: PhantomData,
        };
        let task = tokio::spawn(delivery.run(stream));

        Ok(Listening {
            contract: self.name().to_string(),
            event: event.to_string(),
            subscription_id,
            handle: self.contract.handle().clone(),
            task,
        })
    }
}

// =============================================================================
// DELIVERY
// =============================================================================

struct Delivery<R, T, I, H> {
    contract: String,
    event: String,
    payload: Payload,
    inflate: I,
    handler: H,
    _records: PhantomData<fn() -> (R, T)>,
}

impl<R, T, I, H> Delivery<R, T, I, H>
where
    R: DeserializeOwned,
    I: Fn(&R) -> Result<T, ValidationError>,
    H: FnMut(T),
{
    async fn run(mut self, mut stream: EventStream) {
        while let Some(item) = stream.next().await {
            let outcome = item
                .map_err(|e| ListenerError::Stream {
                    event: self.event.clone(),
                    reason: e.to_string(),
                })
                .and_then(|emission| self.deliver(emission));
            if let Err(e) = outcome {
                error!(
                    contract = %self.contract,
                    error = %e,
                    "Encountered error when trying to listen for {} events",
                    self.event
                );
            }
        }
        info!(contract = %self.contract, event = %self.event, "Event subscription closed");
    }

    fn deliver(&mut self, emission: EventLog) -> Result<(), ListenerError> {
        debug!("{} event emitted from: {}", emission.event, emission.log.address());
        trace!(
            event = %emission.event,
            transaction = ?emission.log.transaction_hash,
            variables = %serde_json::Value::Object(emission.return_values.clone()),
            "Event variables"
        );

        let receipt: R = self.payload.extract(&self.event, &emission.return_values)?;
        let record = (self.inflate)(&receipt)?;
        (self.handler)(record);
        Ok(())
    }
}

// =============================================================================
// LISTENING HANDLE
// =============================================================================

/// A running subscription. Dropping it leaves delivery running.
#[derive(Debug)]
pub struct Listening {
    contract: String,
    event: String,
    subscription_id: B256,
    handle: Contract,
    task: JoinHandle<()>,
}

impl Listening {
    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn subscription_id(&self) -> B256 {
        self.subscription_id
    }

    /// True once the connection behind the subscription has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop delivery without telling the node, for subscriptions whose
    /// connection is already gone.
    pub fn abort(self) {
        self.task.abort();
        debug!(contract = %self.contract, event = %self.event, "Delivery aborted");
    }

    /// Stop delivery and cancel the subscription on the node.
    pub async fn stop(self) -> Result<(), ListenerError> {
        self.task.abort();
        self.handle
            .unsubscribe(self.subscription_id)
            .await
            .map_err(|e| ListenerError::Unsubscribe {
                contract: self.contract.clone(),
                subscription: self.subscription_id.to_string(),
                reason: e.to_string(),
            })?;
        debug!(contract = %self.contract, event = %self.event, "Unsubscribed");
        Ok(())
    }
}
