pub mod client_side;

pub use client_side::PeerSide;
