//! Simulation configuration surfaces.
//!
//! Intervals can come from three places, all validated before anything runs:
//! - compact spec strings such as `duration=30s,base=2,ramp=0.5`
//! - a TOML simulation file with an `[[interval]]` array
//! - named ramp profiles (`smoke`, `ramp`, `soak`, `spike`)

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::interval::{Interval, StopCondition};

const DEFAULT_BASE_COPIES: f64 = 1.0;
const DEFAULT_RAMP_RATE: f64 = 0.0;

/// Duration as a humantime string (`"3s"`, `"1m 30s"`) or integer seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    fn to_duration(&self) -> Result<Duration, ConfigError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => humantime::parse_duration(text.trim())
                .map_err(|e| ConfigError::invalid_spec(text.clone(), e.to_string())),
        }
    }
}

/// Unvalidated interval description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntervalSpec {
    #[serde(default)]
    pub duration: Option<DurationValue>,
    #[serde(default)]
    pub iterations: Option<i64>,
    #[serde(default)]
    pub base_copies: Option<f64>,
    #[serde(default)]
    pub ramp_rate: Option<f64>,
}

impl IntervalSpec {
    pub fn to_interval(&self) -> Result<Interval, ConfigError> {
        let stop = match (&self.duration, self.iterations) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingStopCondition),
            (None, None) => return Err(ConfigError::MissingStopCondition),
            (Some(duration), None) => StopCondition::Duration(duration.to_duration()?),
            (None, Some(n)) if n < 1 => return Err(ConfigError::InvalidIterationCount(n)),
            (None, Some(n)) => StopCondition::Iterations(n as u64),
        };
        Interval::new(
            stop,
            self.base_copies.unwrap_or(DEFAULT_BASE_COPIES),
            self.ramp_rate.unwrap_or(DEFAULT_RAMP_RATE),
        )
    }
}

impl FromStr for IntervalSpec {
    type Err = ConfigError;

    /// Parse `key=value` pairs separated by commas.
    ///
    /// Keys: `duration` (or `d`), `iterations` (or `n`), `base` (or
    /// `base_copies`), `ramp` (or `ramp_rate`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut spec = IntervalSpec::default();

        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                ConfigError::invalid_spec(s, format!("expected key=value, got `{pair}`"))
            })?;
            let value = value.trim();
            match key.trim() {
                "duration" | "d" => spec.duration = Some(DurationValue::Text(value.to_string())),
                "iterations" | "n" => {
                    let n = value
                        .parse::<i64>()
                        .map_err(|e| ConfigError::invalid_spec(s, format!("iterations: {e}")))?;
                    spec.iterations = Some(n);
                }
                "base" | "base_copies" => spec.base_copies = Some(parse_number(s, "base", value)?),
                "ramp" | "ramp_rate" => spec.ramp_rate = Some(parse_number(s, "ramp", value)?),
                other => {
                    return Err(ConfigError::invalid_spec(s, format!("unknown key `{other}`")));
                }
            }
        }

        Ok(spec)
    }
}

fn parse_number(spec: &str, key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .map_err(|e| ConfigError::invalid_spec(spec, format!("{key}: {e}")))
}

/// TOML simulation file.
///
/// ```toml
/// name = "checkout"
///
/// [[interval]]
/// duration = "30s"
/// base_copies = 1
/// ramp_rate = 0.5
///
/// [[interval]]
/// iterations = 10
/// base_copies = 8
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "interval")]
    pub intervals: Vec<IntervalSpec>,
}

impl SimulationFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Validate every interval, in file order.
    pub fn intervals(&self) -> Result<Vec<Interval>, ConfigError> {
        self.intervals.iter().map(IntervalSpec::to_interval).collect()
    }
}

/// Preset interval lists by profile name.
///
/// - `smoke`: a single invocation
/// - `ramp`: one minute, starting at 1 copy and adding 1 copy per second
/// - `soak`: ten minutes at a constant 10 copies
/// - `spike`: 30s at 5 copies, 10s at 50 copies, then 30s at 5 copies
pub fn profile(name: &str) -> Result<Vec<Interval>, ConfigError> {
    match name {
        "smoke" => Ok(vec![Interval::single()]),
        "ramp" => Ok(vec![Interval::duration(Duration::from_secs(60), 1.0, 1.0)?]),
        "soak" => Ok(vec![Interval::duration(Duration::from_secs(600), 10.0, 0.0)?]),
        "spike" => Ok(vec![
            Interval::duration(Duration::from_secs(30), 5.0, 0.0)?,
            Interval::duration(Duration::from_secs(10), 50.0, 0.0)?,
            Interval::duration(Duration::from_secs(30), 5.0, 0.0)?,
        ]),
        other => Err(ConfigError::UnknownProfile(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_duration_spec() {
        let spec: IntervalSpec = "duration=3s,base=1,ramp=0.5".parse().unwrap();
        let interval = spec.to_interval().unwrap();
        assert_eq!(
            interval.stop_condition(),
            StopCondition::Duration(Duration::from_secs(3))
        );
        assert_eq!(interval.base_copies(), 1.0);
        assert_eq!(interval.ramp_rate(), 0.5);
    }

    #[test]
    fn test_parse_iterations_spec_uses_defaults() {
        let interval = "n=10".parse::<IntervalSpec>().unwrap().to_interval().unwrap();
        assert_eq!(interval.stop_condition(), StopCondition::Iterations(10));
        assert_eq!(interval.base_copies(), DEFAULT_BASE_COPIES);
        assert_eq!(interval.ramp_rate(), DEFAULT_RAMP_RATE);
    }

    #[test]
    fn test_spec_errors() {
        assert!(matches!(
            "duration=1s,iterations=2".parse::<IntervalSpec>().unwrap().to_interval(),
            Err(ConfigError::ConflictingStopCondition)
        ));
        assert!(matches!(
            "base=2".parse::<IntervalSpec>().unwrap().to_interval(),
            Err(ConfigError::MissingStopCondition)
        ));
        assert!(matches!(
            "iterations=-3".parse::<IntervalSpec>().unwrap().to_interval(),
            Err(ConfigError::InvalidIterationCount(-3))
        ));
        assert!(matches!(
            "duration=1s,base=-1".parse::<IntervalSpec>().unwrap().to_interval(),
            Err(ConfigError::InvalidBaseCopies(_))
        ));
        assert!(matches!(
            "duration=soon".parse::<IntervalSpec>().unwrap().to_interval(),
            Err(ConfigError::InvalidSpec { .. })
        ));
        assert!(matches!(
            "speed=9".parse::<IntervalSpec>(),
            Err(ConfigError::InvalidSpec { .. })
        ));
        assert!(matches!(
            "duration".parse::<IntervalSpec>(),
            Err(ConfigError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn test_simulation_file_from_toml() {
        let file = SimulationFile::from_toml_str(
            r#"
            name = "checkout"

            [[interval]]
            duration = "1m 30s"
            base_copies = 2
            ramp_rate = 0.25

            [[interval]]
            duration = 5

            [[interval]]
            iterations = 4
            base_copies = 8
            "#,
        )
        .unwrap();

        assert_eq!(file.name.as_deref(), Some("checkout"));
        let intervals = file.intervals().unwrap();
        assert_eq!(intervals.len(), 3);
        assert_eq!(
            intervals[0].stop_condition(),
            StopCondition::Duration(Duration::from_secs(90))
        );
        assert_eq!(intervals[0].base_copies(), 2.0);
        assert_eq!(
            intervals[1].stop_condition(),
            StopCondition::Duration(Duration::from_secs(5))
        );
        assert_eq!(intervals[2].stop_condition(), StopCondition::Iterations(4));
    }

    #[test]
    fn test_simulation_file_rejects_bad_interval() {
        let file = SimulationFile::from_toml_str(
            r#"
            [[interval]]
            iterations = 0
            "#,
        )
        .unwrap();
        assert!(matches!(
            file.intervals(),
            Err(ConfigError::InvalidIterationCount(0))
        ));

        assert!(matches!(
            SimulationFile::from_toml_str("[[interval]]\nrate = 3\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_load_simulation_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[interval]]\nduration = \"2s\"\nramp_rate = 1.0").unwrap();

        let loaded = SimulationFile::load(file.path()).unwrap();
        assert_eq!(loaded.intervals().unwrap().len(), 1);

        let missing = SimulationFile::load("/nonexistent/loadsim.toml");
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_profiles() {
        assert_eq!(profile("smoke").unwrap(), vec![Interval::single()]);
        assert_eq!(profile("spike").unwrap().len(), 3);
        assert!(matches!(
            profile("chaos"),
            Err(ConfigError::UnknownProfile(name)) if name == "chaos"
        ));
    }
}
