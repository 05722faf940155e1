pub mod cipher;
pub mod password;

pub use cipher::{CipherError, CipherService};
pub use password::{dummy_password_hash, hash_password, verify_password};
