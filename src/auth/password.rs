//! Bcrypt password hashing, offloaded to the blocking pool.

use bcrypt::BcryptError;

const COST: u32 = 10;

pub async fn hash(password: &str) -> Result<String, BcryptError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, COST))
        .await
        .map_err(|e| BcryptError::InvalidHash(format!("hashing task failed: {}", e)))?
}

pub async fn verify(password: &str, hashed: &str) -> Result<bool, BcryptError> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed))
        .await
        .map_err(|e| BcryptError::InvalidHash(format!("verify task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_and_verify() {
        let hashed = hash("s3cret-password").await.unwrap();
        assert_ne!(hashed, "s3cret-password");
        assert!(verify("s3cret-password", &hashed).await.unwrap());
        assert!(!verify("wrong-password", &hashed).await.unwrap());
    }
}
