//! OAuth device-code flow: transport, token transform, and poll loop.

pub mod client;
pub mod device_code;
pub mod poll;
pub mod token;

pub use client::{DeviceAuthClient, Operation, OOB_REDIRECT_URI};
pub use device_code::DeviceCodeGrant;
pub use poll::{poll_for_token, AttemptOutcome, TokenExchange};
pub use token::TokenRecord;
