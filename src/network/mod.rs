pub mod channel;
pub mod client;
pub mod dispatch;
pub mod protocol;

pub use channel::{ChannelError, ChannelTask, RealtimeHandle, new_channel};
pub use client::BackendClient;
pub use dispatch::{Dispatcher, Subscription};
pub use protocol::{OutboundChat, PushEvent};
