pub mod radio;
pub mod use_cases;

pub use radio::build_radio;
pub use use_cases::UseCases;
