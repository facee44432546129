pub mod criteria;
pub mod ports;
pub mod product;
pub mod request;
