use bcrypt::BcryptError;

/// One-way salted bcrypt hash of `plain`
pub fn hash_password(plain: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(plain, cost)
}

/// Checks `plain` against a hash produced by [`hash_password`].
/// Fails only when `hash` is not a bcrypt hash.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(plain, hash)
}
