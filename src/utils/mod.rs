pub mod utils;
#[cfg(feature = "opencv")]
pub mod mat;
