pub mod aggregate;
pub mod catalog;
pub mod quote;
pub mod rank;
pub mod residual;
pub mod tabulated;
pub mod tax;
pub mod terms;
