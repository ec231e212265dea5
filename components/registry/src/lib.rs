//! Process-wide table of shared, reference-counted user records.
//!
//! Every long-lived holder of a user (guild members, channel recipients, ...) owns a
//! [`UserRef`], which keeps the record alive. Records are evicted when the last
//! reference is released.

#[macro_use]
extern crate serde;

extern crate tracing as log;

pub mod any;
pub mod error;
pub mod holder;
pub mod member;
pub mod registry;
pub mod webhook;

pub use self::{
    any::AnyUser,
    error::RegistryError,
    holder::UserRef,
    member::{GuildMember, PartialMember},
    registry::{RefCount, Upsert, UserHandle, UserRegistry},
    webhook::WebhookUser,
};
