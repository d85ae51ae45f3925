//! # Mock Framework
//!
//! Test doubles for code that sits *in front of* an actor, such as a typed
//! client façade. Nothing here spawns a real [`ResourceActor`](crate::ResourceActor).
//!
//! Two styles are available:
//!
//! - [`MockClient`]: queue canned responses up front with `expect_*`, run the
//!   code under test, then call [`MockClient::verify`].
//! - [`create_mock_client`] plus the `expect_*` free functions: receive the raw
//!   [`ResourceRequest`] yourself, assert on its payload and answer through the
//!   responder. Use this when the payload matters.
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Note { id: u32 }
//! #[derive(Debug)] struct NoteCreate;
//! #[derive(Debug)] enum NoteUpdate {}
//! #[derive(Debug)] enum NoteAction {}
//! #[derive(Debug, thiserror::Error)] #[error("note")] struct NoteError;
//!
//! #[async_trait]
//! impl ActorEntity for Note {
//!     type Id = u32; type Create = NoteCreate; type Update = NoteUpdate;
//!     type Action = NoteAction; type ActionResult = (); type Context = (); type Error = NoteError;
//!     fn from_create_params(id: u32, _: NoteCreate) -> Result<Self, NoteError> { Ok(Self { id }) }
//!     async fn on_update(&mut self, u: NoteUpdate, _: &()) -> Result<(), NoteError> { match u {} }
//!     async fn handle_action(&mut self, a: NoteAction, _: &()) -> Result<(), NoteError> { match a {} }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Note>::new();
//!     mock.expect_get(7).return_err(FrameworkError::ActorClosed);
//!
//!     let result = mock.client().get(7).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```

use crate::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Get { id, .. } => format!("Get({})", id),
            Expectation::List { .. } => "List".to_string(),
            Expectation::Create { .. } => "Create".to_string(),
            Expectation::Action { id, .. } => format!("Action({})", id),
        }
    }
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn describe_request<T: ActorEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Create { .. } => "Create".to_string(),
        ResourceRequest::Get { id, .. } => format!("Get({})", id),
        ResourceRequest::List { .. } => "List".to_string(),
        ResourceRequest::Update { id, .. } => format!("Update({})", id),
        ResourceRequest::Delete { id, .. } => format!("Delete({})", id),
        ResourceRequest::Action { id, .. } => format!("Action({})", id),
    }
}

/// A mock client answering requests from a FIFO queue of expectations.
///
/// Requests must arrive in the order the expectations were queued and must
/// target the expected id. Any mismatch is recorded and reported by
/// [`verify`](Self::verify); the offending request's caller sees
/// [`FrameworkError::ActorDropped`].
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let mismatches = Arc::new(Mutex::new(Vec::new()));
        let queue = expectations.clone();
        let failures = mismatches.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().ok().and_then(|mut q| q.pop_front());
                match (request, next) {
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response }))
                        if id == want =>
                    {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: want, response }),
                    ) if id == want => {
                        let _ = respond_to.send(response);
                    }
                    (request, expected) => {
                        let expected = expected
                            .map(|e| e.describe())
                            .unwrap_or_else(|| "nothing".to_string());
                        if let Ok(mut f) = failures.lock() {
                            f.push(format!(
                                "got {} while expecting {}",
                                describe_request(&request),
                                expected
                            ));
                        }
                        // Dropping the request closes its responder.
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Get { id, response }
        })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::List {
            response,
        })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            Expectation::Create { response }
        })
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Action { id, response }
        })
    }

    /// Panics if a request did not match, or if expectations remain unmet.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock().map(|m| m.clone()).unwrap_or_default();
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {}", mismatches.join("; "));
        }
        let remaining = self.expectations.lock().map(|e| e.len()).unwrap_or(0);
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Completes an `expect_*` call with the canned response.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Expectations<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(
        expectations: Expectations<T>,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            expectations,
            make: Box::new(make),
        }
    }

    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.make)(response);
        if let Ok(mut queue) = self.expectations.lock() {
            queue.push_back(expectation);
        }
    }
}

/// Creates a client and the receiving end of its channel.
///
/// The test plays the actor: pull requests off the receiver with the
/// `expect_*` helpers below and answer them through the returned responder.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message must be a `Create`.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, Response<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message must be a `Get`.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be a `List`.
pub async fn expect_list<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<Response<Vec<T>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Next message must be an `Action`.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
