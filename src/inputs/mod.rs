//! Profile and parameter bundles, with JSON loading at the input boundary

mod data;
pub mod loader;

pub use data::{
    AccountType, InvestmentAccount, MortgageTerms, Profile, ProjectionInputs, RentTerms,
};
pub use loader::{load_inputs, load_inputs_from_reader, InputError};
