pub mod aggregate;
pub mod domain;
pub mod service;
pub mod storage;
pub mod time;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_SPENDING_HORIZON_HOURS: i64 = 31 * 24;
    pub const DEFAULT_EXCLUDED_ITEM_IDS: [i32; 3] = [58, 56, 1432];
    pub const DEFAULT_PUBLIC_PRIVACY_MAX: i32 = 1;
    pub const DEFAULT_FEED_LIMIT: i64 = 10;
    pub const DEFAULT_POPULAR_LIMIT: usize = 10;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }
    }

    /// Tuning for the aggregated views.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StatsOptions {
        /// Last hour offset of the spending series. The series always has `horizon + 1` entries.
        pub spending_horizon_hours: i64,

        /// Ledger lines that are not products (deposits and the like).
        pub excluded_item_ids: Vec<i32>,

        /// Accounts with a privacy level above this are hidden from the recent feed.
        pub public_privacy_max: i32,

        /// Off for register schemas without per-account privacy.
        pub privacy_filter: bool,

        pub feed_limit: i64,
        pub popular_limit: usize,
    }

    impl Default for StatsOptions {
        fn default() -> Self {
            Self {
                spending_horizon_hours: DEFAULT_SPENDING_HORIZON_HOURS,
                excluded_item_ids: DEFAULT_EXCLUDED_ITEM_IDS.to_vec(),
                public_privacy_max: DEFAULT_PUBLIC_PRIVACY_MAX,
                privacy_filter: true,
                feed_limit: DEFAULT_FEED_LIMIT,
                popular_limit: DEFAULT_POPULAR_LIMIT,
            }
        }
    }

    impl StatsOptions {
        pub fn from_env() -> anyhow::Result<Self> {
            let mut out = Self::default();

            if let Ok(s) = std::env::var("SPENDING_HORIZON_HOURS") {
                if let Ok(n) = s.parse::<i64>() {
                    out.spending_horizon_hours = n;
                }
            }

            if let Ok(s) = std::env::var("EXCLUDED_ITEM_IDS") {
                out.excluded_item_ids = parse_item_ids(&s)?;
            }

            if let Ok(s) = std::env::var("PUBLIC_PRIVACY_MAX") {
                if let Ok(n) = s.parse::<i32>() {
                    out.public_privacy_max = n;
                }
            }

            if let Ok(s) = std::env::var("PRIVACY_FILTER") {
                out.privacy_filter = !matches!(s.trim(), "0" | "false" | "no" | "off");
            }

            if let Ok(s) = std::env::var("FEED_LIMIT") {
                if let Ok(n) = s.parse::<i64>() {
                    out.feed_limit = n;
                }
            }

            if let Ok(s) = std::env::var("POPULAR_LIMIT") {
                if let Ok(n) = s.parse::<usize>() {
                    out.popular_limit = n;
                }
            }

            out.validate()?;
            Ok(out)
        }

        pub fn validate(&self) -> anyhow::Result<()> {
            anyhow::ensure!(
                self.spending_horizon_hours >= 0,
                "SPENDING_HORIZON_HOURS must be >= 0 (got {})",
                self.spending_horizon_hours
            );
            anyhow::ensure!(
                self.feed_limit >= 1,
                "FEED_LIMIT must be >= 1 (got {})",
                self.feed_limit
            );
            anyhow::ensure!(
                self.popular_limit >= 1,
                "POPULAR_LIMIT must be >= 1 (got {})",
                self.popular_limit
            );
            Ok(())
        }

        pub fn is_excluded(&self, itemid: i32) -> bool {
            self.excluded_item_ids.contains(&itemid)
        }
    }

    fn parse_item_ids(s: &str) -> anyhow::Result<Vec<i32>> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let id = part
                .parse::<i32>()
                .with_context(|| format!("invalid item id in EXCLUDED_ITEM_IDS: {part:?}"))?;
            out.push(id);
        }
        Ok(out)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn parses_item_id_list_with_blanks() {
            assert_eq!(parse_item_ids("58, 56,,1432 ").unwrap(), vec![58, 56, 1432]);
            assert!(parse_item_ids("").unwrap().is_empty());
        }

        #[test]
        fn rejects_non_numeric_item_id() {
            assert!(parse_item_ids("58,deposit").is_err());
        }

        #[test]
        fn defaults_match_the_register_ledger() {
            let opts = StatsOptions::default();
            assert_eq!(opts.spending_horizon_hours, 744);
            assert!(opts.is_excluded(1432));
            assert!(!opts.is_excluded(1));
            opts.validate().unwrap();
        }

        #[test]
        fn validate_rejects_zero_limits() {
            let opts = StatsOptions {
                popular_limit: 0,
                ..StatsOptions::default()
            };
            assert!(opts.validate().is_err());
        }
    }
}
