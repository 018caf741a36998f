pub mod card;
pub mod colors;
pub mod map;
pub mod popup;
pub mod trend;
