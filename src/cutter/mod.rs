pub mod cuts;
pub mod projection;
