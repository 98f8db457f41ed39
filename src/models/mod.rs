pub mod budget;
pub mod conversation;
pub mod images;
pub mod packing;
pub mod schedule;
pub mod spot;
pub mod trip;
pub mod weather;
