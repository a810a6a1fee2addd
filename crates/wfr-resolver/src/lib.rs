mod error;
mod events;
mod resolver;

pub use error::ResolveError;
pub use events::{ChannelNotifier, NoopNotifier, ResolveEvent, ResolveNotifier, TracingNotifier};
pub use resolver::{Resolver, ResolverConfig, StandardResolver};
