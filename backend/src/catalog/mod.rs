//! Static reference data: geography and vehicle types

pub mod geography;
pub mod vehicles;

pub use geography::{City, Coordinates, Geography, GeographyCatalog, Location};
pub use vehicles::{SizeClass, VehicleType};
