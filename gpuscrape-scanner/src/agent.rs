use rand::{Rng, rng};

/// Desktop browser user agents the fetcher rotates through.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_2) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.6422.61 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/115.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/115.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/124.0.2478.51",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Edge/124.0.2478.51",
];

/// When a new user agent is drawn from the pool.
#[derive(Debug, Clone)]
pub enum UserAgentMode {
    /// Drawn once when the fetcher is built and reused for the whole run.
    PerProcess(String),
    /// Drawn again for every request, retries included.
    PerRequest(&'static [&'static str]),
}

impl UserAgentMode {
    /// Fixes one agent from `pool` for the lifetime of the process.
    pub fn per_process(pool: &[&str]) -> Self {
        UserAgentMode::PerProcess(random_user_agent(pool).to_string())
    }

    pub fn per_request(pool: &'static [&'static str]) -> Self {
        UserAgentMode::PerRequest(pool)
    }

    pub fn next(&self) -> &str {
        match self {
            UserAgentMode::PerProcess(ua) => ua,
            UserAgentMode::PerRequest(pool) => random_user_agent(pool),
        }
    }
}

pub fn random_user_agent<'a>(pool: &[&'a str]) -> &'a str {
    if pool.is_empty() {
        return USER_AGENTS[0];
    }
    let i = rng().random_range(0..pool.len());
    pool[i]
}
