pub mod classification;
pub mod dashboard;
pub mod layers;
pub mod survey;
