//! Account service: email-verified registration, password change and sign-in

mod hasher;
mod service;

#[cfg(test)]
mod tests;

pub use hasher::{MockSecretHasher, SecretHasher};
pub use service::AccountService;
