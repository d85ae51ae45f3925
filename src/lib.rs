//! # Cafe Orders
//!
//! > **Conversational order intake for a single cafe.**
//!
//! A customer chats with an AI assistant; when the assistant decides an order
//! is ready, it returns a structured `place_order` intent. The intent becomes
//! a priced PENDING order, an administrator approves it with a tracking number
//! or rejects it, and every transition produces a status message for the
//! customer. The whole application state is saved as one JSON snapshot.
//!
//! ## 🏗️ Architecture Notes
//!
//! ### 1. Orders Live in an Actor
//! Orders are owned by a single [`ResourceActor`](actor_framework::ResourceActor)
//! that processes requests one at a time. Two administrators approving and
//! rejecting the same order can never both win: the second request sees a
//! terminal order and gets [`OrderError::InvalidTransition`](order_actor::OrderError::InvalidTransition).
//!
//! ### 2. Prices Come From the Catalog
//! The assistant only names item ids and quantities. [`order_factory::build_order`]
//! prices them against the [`Catalog`](catalog::Catalog) with `rust_decimal`,
//! so totals are exact.
//!
//! ### 3. Events Drive Persistence and Notifications
//! Every committed change is published as a
//! [`ResourceEvent`](actor_framework::ResourceEvent). The snapshot writer
//! subscribes before the actor starts, so no change goes unsaved. The status
//! feed joins when it is taken and reports changes from then on.
//!
//! ### 4. Failures Stay in the Conversation
//! [`ConversationSession`](session::ConversationSession) never returns an
//! error. Assistant failures, timeouts and unknown items all become a
//! customer-facing reply, and snapshot save failures are logged and swallowed.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - serializable data: orders, catalog items, conversation turns, the store snapshot
//! - [`catalog`] - the menu and item lookup
//! - [`order_factory`] - turns requested items into a priced order payload
//! - [`order_actor`] - the order entity and its approve/reject state machine
//! - [`clients`] - [`OrderClient`](clients::OrderClient), the typed handle to the order actor
//! - [`assistant`] - the [`Assistant`](assistant::Assistant) trait, the Gemini adapter and a scripted test double
//! - [`session`] - one customer's conversation
//! - [`notification`] - status messages and the SYSTEM chat feed
//! - [`persistence`] - snapshot load/merge/save and the background writer
//! - [`config`] - TOML configuration
//! - [`console`] - staff and chat commands for the terminal front end
//! - [`lifecycle`] - [`CafeSystem`](lifecycle::CafeSystem) startup and shutdown, tracing setup
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! RUST_LOG=info cargo run -- --config cafe.toml
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod assistant;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod console;
pub mod lifecycle;
pub mod model;
pub mod notification;
pub mod order_actor;
pub mod order_factory;
pub mod persistence;
pub mod session;
