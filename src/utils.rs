pub mod datetime;
pub mod financial;
pub mod math;
pub mod net;
