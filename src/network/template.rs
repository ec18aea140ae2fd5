/// Key/value template files that override command-line options.
///
/// ```text
/// pysar.network.coherenceFile   = auto  #[filename], auto for coherence.h5
/// pysar.network.maskFile        = auto  #[file name, no], auto for mask.h5
/// pysar.network.minCoherence    = 0.7
/// ```
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::errors::NetworkError;

/// Prefix shared by all network template keys.
pub const PREFIX: &str = "pysar.network.";

/// Coherence threshold used when the template says `auto`.
pub const AUTO_MIN_COHERENCE: f64 = 0.7;

/// Coherence file used when the template says `auto`.
pub const AUTO_COHERENCE_FILE: &str = "coherence.h5";

/// Mask candidates tried in order when the template says `auto`.
/// `*` matches any run of characters.
const AUTO_MASK_CANDIDATES: [&str; 3] = ["mask.h5", "geometry*.h5", "maskLand.h5"];

/// Parsed template: key → raw value.
#[derive(Debug, Clone, Default)]
pub struct Template {
    values: BTreeMap<String, String>,
}

impl Template {
    /// Parse template text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let values = text
            .lines()
            .filter_map(|line| {
                let line = line.split('#').next().unwrap_or("").trim();
                let (key, value) = line.split_once('=')?;
                let (key, value) = (key.trim(), value.trim());
                (!key.is_empty() && !value.is_empty()).then(|| (key.to_owned(), value.to_owned()))
            })
            .collect();
        Self { values }
    }

    /// Raw value of a full key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn network_value(&self, name: &str) -> Option<&str> {
        self.get(&format!("{PREFIX}{name}"))
    }

    /// Coherence file override.
    #[must_use]
    pub fn coherence_file(&self) -> Option<PathBuf> {
        self.network_value("coherenceFile").map(|v| match v {
            "auto" => PathBuf::from(AUTO_COHERENCE_FILE),
            other => PathBuf::from(other),
        })
    }

    /// Mask file override. `Some(None)` means "use no mask".
    ///
    /// `auto` resolves against `dir`.
    #[must_use]
    pub fn mask_file(&self, dir: &Path) -> Option<Option<PathBuf>> {
        self.network_value("maskFile").map(|v| match v {
            "auto" => find_auto_mask(dir),
            "no" => None,
            other => Some(PathBuf::from(other)),
        })
    }

    /// Coherence threshold override.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidTemplateValue` if the value is not a number.
    pub fn min_coherence(&self) -> Result<Option<f64>, NetworkError> {
        match self.network_value("minCoherence") {
            None => Ok(None),
            Some("auto") => Ok(Some(AUTO_MIN_COHERENCE)),
            Some(v) => v
                .parse()
                .map(Some)
                .map_err(|_| NetworkError::InvalidTemplateValue {
                    key: format!("{PREFIX}minCoherence"),
                    value: v.to_owned(),
                }),
        }
    }
}

/// Read and parse a template file.
///
/// # Errors
///
/// Returns `NetworkError::Io` if the file cannot be read.
pub fn read_template(path: &Path) -> Result<Template, NetworkError> {
    let text = std::fs::read_to_string(path).map_err(|e| NetworkError::io(path, e))?;
    Ok(Template::parse(&text))
}

fn find_auto_mask(dir: &Path) -> Option<PathBuf> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    AUTO_MASK_CANDIDATES.iter().find_map(|pattern| {
        names
            .iter()
            .find(|name| matches_pattern(name, pattern))
            .map(|name| dir.join(name))
    })
}

fn matches_pattern(name: &str, pattern: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
        }
        None => name == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
## network options
pysar.network.coherenceFile   = auto  #[filename], auto for coherence.h5
pysar.network.maskFile        = no
pysar.network.minCoherence    = 0.85
pysar.network.maskAoi.yx      =       # empty values are ignored
";

    #[test]
    fn test_parse_strips_comments() {
        let t = Template::parse(TEMPLATE);
        assert_eq!(t.get("pysar.network.coherenceFile"), Some("auto"));
        assert_eq!(t.get("pysar.network.maskAoi.yx"), None);
    }

    #[test]
    fn test_typed_overrides() {
        let t = Template::parse(TEMPLATE);
        assert_eq!(t.coherence_file(), Some(PathBuf::from("coherence.h5")));
        assert_eq!(t.mask_file(Path::new(".")), Some(None));
        assert_eq!(t.min_coherence().unwrap(), Some(0.85));
    }

    #[test]
    fn test_auto_threshold_and_absent_keys() {
        let t = Template::parse("pysar.network.minCoherence = auto\n");
        assert_eq!(t.min_coherence().unwrap(), Some(AUTO_MIN_COHERENCE));
        assert_eq!(t.coherence_file(), None);
        assert_eq!(t.mask_file(Path::new(".")), None);
    }

    #[test]
    fn test_bad_threshold() {
        let t = Template::parse("pysar.network.minCoherence = high\n");
        assert!(matches!(
            t.min_coherence(),
            Err(NetworkError::InvalidTemplateValue { .. })
        ));
    }

    #[test]
    fn test_auto_mask_prefers_candidates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let t = Template::parse("pysar.network.maskFile = auto\n");
        assert_eq!(t.mask_file(dir.path()), Some(None));

        std::fs::write(dir.path().join("maskLand.h5"), b"").unwrap();
        std::fs::write(dir.path().join("geometryRadar.h5"), b"").unwrap();
        assert_eq!(
            t.mask_file(dir.path()),
            Some(Some(dir.path().join("geometryRadar.h5")))
        );

        std::fs::write(dir.path().join("mask.h5"), b"").unwrap();
        assert_eq!(t.mask_file(dir.path()), Some(Some(dir.path().join("mask.h5"))));
    }

    #[test]
    fn test_read_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pysarApp_template.txt");
        std::fs::write(&path, TEMPLATE).unwrap();
        let t = read_template(&path).unwrap();
        assert_eq!(t.min_coherence().unwrap(), Some(0.85));
    }
}
