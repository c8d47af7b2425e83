/// Cryptography module for gateway responses
///
/// Handles secp256k1 signing of CCIP-Read answers

pub mod signer;

pub use signer::ResponseSigner;
