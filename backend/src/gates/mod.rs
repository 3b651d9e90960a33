//! Gate allocator: inventories, slot booking and dynamic pricing

pub mod allocator;
pub mod pricing;

pub use allocator::{
    BookingPlan, GateAvailability, GateError, GateInventory, GateStatistics, PriceContext,
};
pub use pricing::{GateDefaults, PricingConfig, SizeTier};
