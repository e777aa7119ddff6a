pub mod texas;
