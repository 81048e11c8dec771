mod packet;
mod sink;

pub use packet::Packet;
pub use sink::PointingSink;
