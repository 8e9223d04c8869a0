//! User generation.

use fake::{
    Fake,
    faker::address::en::{BuildingNumber, StreetName},
    faker::name::en::Name,
};
use rand::Rng;

use marketplace::AppError;
use marketplace::auth::hash_password;

use super::IdSequence;

/// Generated user data ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedUser {
    pub id: i64,
    pub username: String,
    /// Stored password: an argon2 hash, or the plain text when hashing is off.
    pub password: String,
    pub mail: String,
    pub address: Option<String>,
}

/// Configuration for user generation.
#[derive(Debug, Clone)]
pub struct UserGenConfig {
    /// Password shared by every generated user.
    pub password: String,
    /// Store an argon2 hash instead of the plain password.
    pub hash_passwords: bool,
    /// Probability that a street address is filled in.
    pub address_fill_rate: f64,
    /// Mail domains to pick from.
    pub mail_domains: Vec<String>,
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            password: "password123".to_string(),
            hash_passwords: true,
            address_fill_rate: 0.8,
            mail_domains: vec![
                "example.com".to_string(),
                "example.org".to_string(),
                "mail.test".to_string(),
            ],
        }
    }
}

/// Generates marketplace users.
pub struct UserGenerator {
    config: UserGenConfig,
}

impl UserGenerator {
    /// Creates a new user generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: UserGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: UserGenConfig) -> Self {
        Self { config }
    }

    /// Returns the value stored in the password column for every user.
    pub fn stored_password(&self) -> Result<String, AppError> {
        if self.config.hash_passwords {
            hash_password(&self.config.password)
        } else {
            Ok(self.config.password.clone())
        }
    }

    /// Generates a single user with an already prepared password column value.
    pub fn generate(&self, id: i64, password: &str, rng: &mut impl Rng) -> GeneratedUser {
        let name: String = Name().fake_with_rng(rng);
        let handle = normalize_name(&name);

        // The id suffix keeps usernames unique across a batch.
        let username = format!("{handle}{id}");
        let domain = self
            .config
            .mail_domains
            .get(rng.gen_range(0..self.config.mail_domains.len().max(1)))
            .map(String::as_str)
            .unwrap_or("example.com");
        let mail = format!("{username}@{domain}");

        let address = if rng.r#gen::<f64>() < self.config.address_fill_rate {
            let number: String = BuildingNumber().fake_with_rng(rng);
            let street: String = StreetName().fake_with_rng(rng);
            Some(format!("{number} {street}"))
        } else {
            None
        };

        GeneratedUser {
            id,
            username,
            password: password.to_string(),
            mail,
            address,
        }
    }

    /// Generates multiple users, hashing the shared password once.
    pub fn generate_batch(
        &self,
        count: usize,
        ids: &mut IdSequence,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedUser>, AppError> {
        let password = self.stored_password()?;
        Ok((0..count)
            .map(|_| self.generate(ids.next_id(), &password, rng))
            .collect())
    }
}

impl Default for UserGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercases a display name into a dotted handle, e.g. "Ann O'Neil" -> "ann.oneil".
fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".")
}
