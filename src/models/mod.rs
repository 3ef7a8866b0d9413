//! 与远端服务共享的数据类型，字段使用 camelCase

pub mod analytics;
pub mod booking;
pub mod inventory;
pub mod order;
pub mod user;
pub mod venue;

pub use analytics::{AnalyticsQuery, AnalyticsSummary, DailyRevenue};
pub use booking::{Booking, BookingStatus, CreateBookingRequest};
pub use inventory::{AdjustInventoryRequest, InventoryItem};
pub use order::{CreateOrderRequest, Order, OrderItem, OrderStatus, UpdateOrderStatusRequest};
pub use user::{BusinessContext, User};
pub use venue::{CreateVenueRequest, UpdateVenueRequest, Venue};
