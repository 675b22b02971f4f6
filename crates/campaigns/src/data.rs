//! Randomized test data
//!
//! Identifying fields are unique per run so a fixture never collides with a
//! record left over from an earlier, uncleaned run.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// A customer record to create and later delete
#[derive(Debug, Clone)]
pub struct CustomerData {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

impl CustomerData {
    pub fn random() -> Self {
        let tag = random_tag(8);
        Self {
            firstname: "Jane".to_string(),
            lastname: format!("Tester{}", tag),
            email: format!("jane.tester.{}@example.test", tag.to_lowercase()),
            password: random_tag(16),
        }
    }

    /// Same identity with a different password
    pub fn with_password(&self, password: &str) -> Self {
        Self {
            password: password.to_string(),
            ..self.clone()
        }
    }
}

fn random_tag(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_customers_do_not_collide() {
        let a = CustomerData::random();
        let b = CustomerData::random();
        assert_ne!(a.email, b.email);
        assert_ne!(a.lastname, b.lastname);
    }

    #[test]
    fn test_with_password_keeps_identity() {
        let a = CustomerData::random();
        let b = a.with_password("new test password");
        assert_eq!(a.email, b.email);
        assert_ne!(a.password, b.password);
    }
}
