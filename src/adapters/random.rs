use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::blocking::Client;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use crate::domain::ports::RandomSource;
use crate::utils::error::{BoxshelfError, Result};

pub const RANDOM_ORG_ENDPOINT: &str = "https://www.random.org";
const DECIMAL_PLACES: u32 = 6;

fn check_bounds(low: usize, high: usize) -> Result<()> {
    if low > high {
        return Err(BoxshelfError::InvalidOperation {
            message: format!("Empty random range {}..={}", low, high),
        });
    }
    Ok(())
}

/// Process-local generator backed by `StdRng`.
pub struct LocalRandom {
    rng: Mutex<StdRng>,
}

impl LocalRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence, for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}

impl Default for LocalRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for LocalRandom {
    fn next_unit(&self) -> Result<f64> {
        Ok(self.with_rng(|rng| rng.gen::<f64>()))
    }

    fn next_in_range(&self, low: usize, high: usize) -> Result<usize> {
        check_bounds(low, high)?;
        Ok(self.with_rng(|rng| rng.gen_range(low..=high)))
    }
}

/// Draws from random.org's plain-text HTTP interface.
pub struct RandomOrgRandom {
    client: Client,
    base_url: Url,
}

impl RandomOrgRandom {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(endpoint)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));

        tracing::debug!("Requesting random value from {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!("random.org responded with {}", status);
            return Err(BoxshelfError::RandomSourceError {
                message: format!("random.org responded with status {}", status),
            });
        }

        Ok(response.text()?.trim().to_string())
    }
}

impl RandomSource for RandomOrgRandom {
    fn next_unit(&self) -> Result<f64> {
        let body = self.fetch(
            "decimal-fractions/",
            &[
                ("num", "1".to_string()),
                ("dec", DECIMAL_PLACES.to_string()),
                ("col", "1".to_string()),
                ("format", "plain".to_string()),
                ("rnd", "new".to_string()),
            ],
        )?;

        let value: f64 = body.parse().map_err(|_| BoxshelfError::RandomSourceError {
            message: format!("Invalid decimal from random.org: {:?}", body),
        })?;
        if !(0.0..1.0).contains(&value) {
            return Err(BoxshelfError::RandomSourceError {
                message: format!("Decimal {} outside [0, 1)", value),
            });
        }
        tracing::info!("Received random decimal: {}", value);
        Ok(value)
    }

    fn next_in_range(&self, low: usize, high: usize) -> Result<usize> {
        check_bounds(low, high)?;
        let body = self.fetch(
            "integers/",
            &[
                ("num", "1".to_string()),
                ("min", low.to_string()),
                ("max", high.to_string()),
                ("col", "1".to_string()),
                ("base", "10".to_string()),
                ("format", "plain".to_string()),
                ("rnd", "new".to_string()),
            ],
        )?;

        let value: usize = body.parse().map_err(|_| BoxshelfError::RandomSourceError {
            message: format!("Invalid integer from random.org: {:?}", body),
        })?;
        if value < low || value > high {
            return Err(BoxshelfError::RandomSourceError {
                message: format!("Integer {} outside {}..={}", value, low, high),
            });
        }
        tracing::info!("Received random integer: {}", value);
        Ok(value)
    }
}
