//! Push notifications: socket, frame decoding and the alert stack.

mod alerts;
mod channel;
mod event;

pub use alerts::AlertStack;
pub use channel::{PushChannel, socket_url};
pub use event::decode_frame;
