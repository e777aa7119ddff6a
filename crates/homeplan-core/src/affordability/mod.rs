pub mod dti;
pub mod income;
pub mod scenario;
