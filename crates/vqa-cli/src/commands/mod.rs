pub mod paths;
pub mod replay;
