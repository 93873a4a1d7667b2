pub mod stories;
pub mod serve;
