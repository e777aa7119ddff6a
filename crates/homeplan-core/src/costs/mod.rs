pub mod closing;
pub mod pmi;
