//! Account credentials: Argon2id hashing and the password policy.

mod password;
pub mod policy;

pub use password::{PasswordError, hash_password, verify_password};
pub use policy::{PasswordPolicy, PasswordPolicyError, PolicyViolation};
