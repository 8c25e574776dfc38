//! Events - 界面事件发布

mod publisher;

pub use publisher::EventPublisher;
