//! Checkout: order submission, notification relays and the manual order channel.

pub mod error;
pub mod manual;
pub mod pipeline;
pub mod relay;
pub mod request;
pub mod shipping;

pub use error::{ManualChannelError, NotificationError, SubmissionError, ValidationError};
pub use manual::{ManualChannel, ManualCustomer, ManualOrderMessage};
pub use pipeline::{OrderPipeline, PipelineConfig, SubmissionReceipt};
pub use relay::{
    DisabledNotificationRelay, HttpEmailRelay, HttpRelayConfig, InMemoryNotificationRelay,
    Notification, NotificationRelay,
};
pub use request::{CustomerDetails, OrderRequest};
pub use shipping::ShippingPolicy;
