mod mock_radio;

pub use mock_radio::{fast_timings, MockRadio};
