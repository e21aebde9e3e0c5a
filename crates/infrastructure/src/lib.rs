pub mod assets;
pub mod dns;
pub mod radio;
pub mod system;
