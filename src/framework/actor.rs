//! # Serialized Service Actor
//!
//! The backends themselves are plain synchronous structs. This module gives them
//! a single logical owner: a [`ServiceActor`] owns one [`Dispatcher`] (a set of
//! backends) and handles requests one at a time, so no backend ever needs a lock.
//!
//! Callers talk to it through the cloneable [`ServiceClient`], which sends a
//! request over an `mpsc` channel and awaits the reply on a `oneshot`.
//!
//! A reset is just another message in the same queue, so it can never interleave
//! with an operation against the same backends.

use std::fmt::{Debug, Display};

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::framework::error::{ErrorCode, ServiceError};

/// Something that can route `(service, operation, params)` to a backend.
pub trait Dispatcher: Send + 'static {
    /// Names the services this dispatcher hosts.
    type Service: Copy + Debug + Display + Send + 'static;

    /// Short label for log lines, e.g. `123456789012/us-east-1`.
    fn label(&self) -> String;

    fn dispatch(
        &mut self,
        service: Self::Service,
        operation: &str,
        params: Value,
    ) -> Result<Value, ServiceError>;

    /// Discards and rebuilds one service's entire state.
    fn reset(&mut self, service: Self::Service);

    fn reset_all(&mut self);
}

/// Errors from the plumbing itself rather than from a backend.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}

impl ErrorCode for FrameworkError {
    fn code(&self) -> &'static str {
        "ServiceUnavailable"
    }

    fn http_status(&self) -> u16 {
        503
    }
}

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, ServiceError>>;

#[derive(Debug)]
pub enum ServiceRequest<S> {
    Invoke {
        service: S,
        operation: String,
        params: Value,
        respond_to: Response<Value>,
    },
    /// `service: None` resets every service.
    Reset {
        service: Option<S>,
        respond_to: oneshot::Sender<()>,
    },
}

/// A copy of `params` with every password-like value masked, for logging.
fn redacted(params: &Value) -> Value {
    match params {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let secret = key.eq_ignore_ascii_case("password") || key.ends_with("Password");
                    let value = if secret { Value::from("******") } else { redacted(value) };
                    (key.clone(), value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redacted).collect()),
        other => other.clone(),
    }
}

/// Owns the backends and processes requests sequentially.
pub struct ServiceActor<D: Dispatcher> {
    receiver: mpsc::Receiver<ServiceRequest<D::Service>>,
    dispatcher: D,
}

impl<D: Dispatcher> ServiceActor<D> {
    pub fn new(buffer_size: usize, dispatcher: D) -> (Self, ServiceClient<D::Service>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, dispatcher };
        (actor, ServiceClient::new(sender))
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self) {
        let scope = self.dispatcher.label();
        debug!(%scope, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ServiceRequest::Invoke { service, operation, params, respond_to } => {
                    debug!(%scope, %service, %operation, params = %redacted(&params), "Invoke");
                    let result = self.dispatcher.dispatch(service, &operation, params);
                    match &result {
                        Ok(_) => debug!(%scope, %service, %operation, "Invoke ok"),
                        Err(e) => warn!(%scope, %service, %operation, code = %e.code, error = %e.message, "Invoke failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ServiceRequest::Reset { service, respond_to } => {
                    match service {
                        Some(service) => self.dispatcher.reset(service),
                        None => self.dispatcher.reset_all(),
                    }
                    info!(%scope, ?service, "Reset");
                    let _ = respond_to.send(());
                }
            }
        }

        debug!(%scope, "Shutdown");
    }
}

/// A cloneable handle for one [`ServiceActor`].
#[derive(Debug)]
pub struct ServiceClient<S> {
    sender: mpsc::Sender<ServiceRequest<S>>,
}

impl<S> Clone for ServiceClient<S> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<S: Copy + Debug + Send + 'static> ServiceClient<S> {
    pub fn new(sender: mpsc::Sender<ServiceRequest<S>>) -> Self {
        Self { sender }
    }

    pub async fn invoke(
        &self,
        service: S,
        operation: &str,
        params: Value,
    ) -> Result<Value, ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest::Invoke {
                service,
                operation: operation.to_string(),
                params,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn reset(&self, service: S) -> Result<(), FrameworkError> {
        self.send_reset(Some(service)).await
    }

    pub async fn reset_all(&self) -> Result<(), FrameworkError> {
        self.send_reset(None).await
    }

    async fn send_reset(&self, service: Option<S>) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest::Reset { service, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fmt;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Svc {
        Counter,
    }

    impl fmt::Display for Svc {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("counter")
        }
    }

    #[derive(Default)]
    struct CounterBackend {
        value: i64,
    }

    impl Dispatcher for CounterBackend {
        type Service = Svc;

        fn label(&self) -> String {
            "test".into()
        }

        fn dispatch(&mut self, _service: Svc, operation: &str, params: Value) -> Result<Value, ServiceError> {
            match operation {
                "Add" => {
                    self.value += params["By"].as_i64().unwrap_or(1);
                    Ok(json!({"Value": self.value}))
                }
                other => Err(ServiceError::unknown_operation(other)),
            }
        }

        fn reset(&mut self, _service: Svc) {
            self.value = 0;
        }

        fn reset_all(&mut self) {
            self.value = 0;
        }
    }

    #[tokio::test]
    async fn test_requests_are_processed_in_order() {
        let (actor, client) = ServiceActor::new(8, CounterBackend::default());
        let handle = tokio::spawn(actor.run());

        let out = client.invoke(Svc::Counter, "Add", json!({"By": 2})).await.unwrap();
        assert_eq!(out["Value"], 2);
        let out = client.invoke(Svc::Counter, "Add", json!({"By": 3})).await.unwrap();
        assert_eq!(out["Value"], 5);

        let err = client.invoke(Svc::Counter, "Explode", Value::Null).await.unwrap_err();
        assert_eq!(err.code, "InvalidAction");

        client.reset(Svc::Counter).await.unwrap();
        let out = client.invoke(Svc::Counter, "Add", Value::Null).await.unwrap();
        assert_eq!(out["Value"], 1);

        drop(client);
        handle.await.unwrap();
    }

    #[test]
    fn test_passwords_are_masked_for_logging() {
        let params = json!({"Name": "corp", "Password": "Secret1!", "Nested": [{"ssoPassword": "x"}]});
        assert_eq!(
            redacted(&params),
            json!({"Name": "corp", "Password": "******", "Nested": [{"ssoPassword": "******"}]})
        );
    }

    #[tokio::test]
    async fn test_closed_actor_maps_to_service_unavailable() {
        let (actor, client) = ServiceActor::new(1, CounterBackend::default());
        drop(actor);
        let err = client.invoke(Svc::Counter, "Add", Value::Null).await.unwrap_err();
        assert_eq!(err.code, "ServiceUnavailable");
        assert_eq!(err.http_status, 503);
    }
}
