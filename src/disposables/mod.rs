//! Disposal primitives: one-shot tokens and bulk containers.
//!
//! Every registration on [`Emitter`](crate::Emitter) is represented by a
//! [`Disposable`]; disposing it is the only way to unsubscribe. A
//! [`CompositeDisposable`] groups tokens so related subscriptions can be
//! torn down together.

mod composite;
mod disposable;

pub use composite::CompositeDisposable;
pub use disposable::Disposable;
