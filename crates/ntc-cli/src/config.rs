use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::cli::{SearchArgs, StrategyKind};

/// Search parameters as they appear in a TOML config file. Every field is
/// optional so a file can pin just the values it cares about.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub precision: Option<f64>,
    pub strategy: Option<StrategyKind>,
    pub step_size: Option<f64>,
    pub start: Option<f64>,
    pub reference: Option<f64>,
    pub secure_limit: Option<f64>,
    pub glsk_min: Option<f64>,
    pub glsk_max: Option<f64>,
    pub max_iterations: Option<usize>,
}

pub fn load_search_config(path: &Path) -> Result<SearchConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file '{}'", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config file '{}'", path.display()))
}

/// Fully resolved search parameters: flags override the config file, the
/// config file overrides the defaults.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub min: f64,
    pub max: f64,
    pub precision: f64,
    pub strategy: StrategyKind,
    pub step_size: f64,
    pub start: f64,
    pub reference: f64,
    pub secure_limit: f64,
    pub glsk_min: f64,
    pub glsk_max: f64,
    pub max_iterations: usize,
}

impl SearchParams {
    pub fn resolve(args: &SearchArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => load_search_config(path)?,
            None => SearchConfig::default(),
        };
        let min = args.min.or(config.min).unwrap_or(0.0);
        let max = args.max.or(config.max).unwrap_or(1000.0);
        let midpoint = (min + max) / 2.0;
        Ok(Self {
            min,
            max,
            precision: args.precision.or(config.precision).unwrap_or(10.0),
            strategy: args
                .strategy
                .or(config.strategy)
                .unwrap_or(StrategyKind::RangeDivision),
            step_size: args.step_size.or(config.step_size).unwrap_or(100.0),
            start: args.start.or(config.start).unwrap_or(midpoint),
            reference: args.reference.or(config.reference).unwrap_or(midpoint),
            secure_limit: args.secure_limit.or(config.secure_limit).unwrap_or(650.0),
            glsk_min: args
                .glsk_min
                .or(config.glsk_min)
                .unwrap_or(f64::NEG_INFINITY),
            glsk_max: args.glsk_max.or(config.glsk_max).unwrap_or(f64::INFINITY),
            max_iterations: args.max_iterations.or(config.max_iterations).unwrap_or(100),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_cover_every_parameter() {
        let params = SearchParams::resolve(&SearchArgs::default()).unwrap();
        assert_eq!(params.min, 0.0);
        assert_eq!(params.max, 1000.0);
        assert_eq!(params.precision, 10.0);
        assert_eq!(params.strategy, StrategyKind::RangeDivision);
        assert_eq!(params.start, 500.0);
        assert_eq!(params.max_iterations, 100);
    }

    #[test]
    fn flags_win_over_the_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "min = 100.0\nmax = 900.0\nstrategy = \"steps\"\nsecure_limit = 400.0"
        )
        .unwrap();
        let args = SearchArgs {
            config: Some(file.path().to_path_buf()),
            max: Some(2000.0),
            ..SearchArgs::default()
        };
        let params = SearchParams::resolve(&args).unwrap();
        assert_eq!(params.min, 100.0);
        assert_eq!(params.max, 2000.0);
        assert_eq!(params.strategy, StrategyKind::Steps);
        assert_eq!(params.secure_limit, 400.0);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "presicion = 5.0").unwrap();
        assert!(load_search_config(file.path()).is_err());
    }
}
