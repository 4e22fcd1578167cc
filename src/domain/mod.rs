pub mod analysis;
pub mod fields;
pub mod response;
pub mod template;
pub mod ticket;
