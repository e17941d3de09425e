pub mod heygen;
pub mod jogg;
pub mod script;
pub mod vendor;
