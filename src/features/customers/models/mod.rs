mod customer;
mod location;

pub use customer::Customer;
pub use location::Location;
