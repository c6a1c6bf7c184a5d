use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use clap::ArgMatches;
use simplelog::LevelFilter;
use yaml_rust2::{Yaml, YamlLoader};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub catalog: PathBuf,
    pub output: PathBuf,
    pub timeout: Duration,
    pub interval: Duration,
    pub country: String,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("data/games.json"),
            output: PathBuf::from("data/players.json"),
            timeout: Duration::from_secs(10),
            interval: Duration::from_secs(60),
            country: "jp".to_string(),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Defaults, then the YAML file (if any), then command-line flags.
    pub fn resolve(matches: &ArgMatches) -> Result<Self, Error> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_args(matches)?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, Error> {
        let docs = YamlLoader::load_from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        let mut config = Self::default();

        // An empty file yields no documents.
        let Some(doc) = docs.first() else {
            return Ok(config);
        };

        if let Some(path) = string_key(doc, "catalog")? {
            config.catalog = PathBuf::from(path);
        }
        if let Some(path) = string_key(doc, "output")? {
            config.output = PathBuf::from(path);
        }
        if let Some(secs) = secs_key(doc, "timeout_secs")? {
            config.timeout = secs;
        }
        if let Some(secs) = secs_key(doc, "interval_secs")? {
            config.interval = secs;
        }
        if let Some(country) = string_key(doc, "country")? {
            config.country = country.to_string();
        }
        if let Some(level) = string_key(doc, "log_level")? {
            config.log_level = parse_level(level)?;
        }

        Ok(config)
    }

    fn apply_args(&mut self, matches: &ArgMatches) -> Result<(), Error> {
        if let Some(path) = matches.get_one::<PathBuf>("catalog") {
            self.catalog = path.clone();
        }
        if let Some(path) = matches.get_one::<PathBuf>("output") {
            self.output = path.clone();
        }
        if let Some(level) = matches.get_one::<String>("log_level") {
            self.log_level = parse_level(level)?;
        }

        match matches.subcommand() {
            Some(("fetch", sub)) => {
                if let Some(&secs) = sub.get_one::<u64>("timeout") {
                    self.timeout = non_zero_secs("timeout", secs)?;
                }
                if let Some(country) = sub.get_one::<String>("country") {
                    self.country = country.clone();
                }
            }
            Some(("watch", sub)) => {
                if let Some(&secs) = sub.get_one::<u64>("interval") {
                    self.interval = non_zero_secs("interval", secs)?;
                }
            }
            _ => {}
        }

        Ok(())
    }
}

fn string_key<'a>(doc: &'a Yaml, key: &str) -> Result<Option<&'a str>, Error> {
    match &doc[key] {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::String(value) => Ok(Some(value.as_str())),
        _ => Err(Error::Config(format!("`{key}` must be a string"))),
    }
}

fn secs_key(doc: &Yaml, key: &str) -> Result<Option<Duration>, Error> {
    match &doc[key] {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::Integer(secs) if *secs >= 0 => non_zero_secs(key, *secs as u64).map(Some),
        _ => Err(Error::Config(format!("`{key}` must be a positive integer"))),
    }
}

fn non_zero_secs(key: &str, secs: u64) -> Result<Duration, Error> {
    if secs == 0 {
        return Err(Error::Config(format!("`{key}` must be at least 1 second")));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_level(level: &str) -> Result<LevelFilter, Error> {
    LevelFilter::from_str(level).map_err(|_| Error::Config(format!("unknown log level `{level}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build_command;

    #[test]
    fn empty_file_keeps_defaults() {
        assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
    }

    #[test]
    fn yaml_overrides_defaults() {
        let config = Config::from_yaml_str(
            "catalog: games.json\ntimeout_secs: 3\ncountry: us\nlog_level: debug\n",
        )
        .unwrap();

        assert_eq!(config.catalog, PathBuf::from("games.json"));
        assert_eq!(config.output, Config::default().output);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.country, "us");
        assert_eq!(config.log_level, LevelFilter::Debug);

        assert_eq!(Config::from_yaml_str("foo: 1\n").unwrap(), Config::default());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_yaml_str("timeout_secs: ten").is_err());
        assert!(Config::from_yaml_str("interval_secs: 0").is_err());
        assert!(Config::from_yaml_str("log_level: loud").is_err());
        assert!(Config::from_yaml_str("catalog: [a, b]").is_err());
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "output: from-file.json\ntimeout_secs: 30\n").unwrap();

        let matches = build_command()
            .try_get_matches_from([
                "fgc-players",
                "--config-file",
                path.to_str().unwrap(),
                "fetch",
                "--timeout",
                "5",
            ])
            .unwrap();
        let config = Config::resolve(&matches).unwrap();

        assert_eq!(config.output, PathBuf::from("from-file.json"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn watch_interval_flag() {
        let matches = build_command()
            .try_get_matches_from(["fgc-players", "watch", "--interval", "15"])
            .unwrap();
        let config = Config::resolve(&matches).unwrap();

        assert_eq!(config.interval, Duration::from_secs(15));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
