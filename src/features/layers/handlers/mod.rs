mod layer_handler;

pub use layer_handler::*;
