mod layer_dto;

pub use layer_dto::*;
