pub mod booking;
pub mod content;
pub mod package;

pub use booking::{Booking, BookingRequest, BookingStatus, EventType, NewBooking};
pub use content::SiteContent;
pub use package::{PackageCategory, PricingPackage};
