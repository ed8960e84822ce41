pub mod config;
pub mod widget;

pub use config::{ServiceConfig, WidgetConfig};
pub use widget::AddressWidget;
