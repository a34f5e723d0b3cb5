use crate::board::*;

use std::path::Path;

/// The data file used when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "progreso.csv";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    pub color: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutSection {
    pub seed: Option<u64>,
    #[serde(rename = "categoryMaxSize")]
    pub category_max_size: Option<f64>,
    #[serde(rename = "personMaxSize")]
    pub person_max_size: Option<f64>,
    #[serde(rename = "minSize")]
    pub min_size: Option<f64>,
    #[serde(rename = "maxSize")]
    pub max_size: Option<f64>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(rename = "dataFile")]
    pub data_file: Option<String>,
    pub categories: Option<Vec<CategoryEntry>>,
    pub layout: Option<LayoutSection>,
    #[serde(rename = "duplicateNameMode")]
    pub duplicate_name_mode: Option<String>,
}

/// The validated settings of a board. The data file is not part of them: it
/// belongs to the store.
#[derive(PartialEq, Debug, Clone)]
pub struct BoardSettings {
    pub categories: CategoryTable,
    pub category_scatter: ScatterSettings,
    pub person_scatter: ScatterSettings,
    pub radial: RadialSettings,
    pub duplicate_name_mode: DuplicateNameMode,
}

impl Default for BoardSettings {
    fn default() -> Self {
        BoardSettings {
            categories: CategoryTable::generic(),
            category_scatter: ScatterSettings::CATEGORY_DEFAULT,
            person_scatter: ScatterSettings::PERSON_DEFAULT,
            radial: RadialSettings::DEFAULT,
            duplicate_name_mode: DuplicateNameMode::UpdateAll,
        }
    }
}

/// Reads a configuration file. Returns the data file it names, if any, and
/// the board settings.
pub fn read_config(path: &str) -> BoardResult<(Option<PathBuf>, BoardSettings)> {
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
    let config: BoardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingConfigSnafu { path })?;
    debug!("read_config: {:?}", config);
    let data = data_path(&config, Path::new(path).parent())?;
    Ok((data, validate_config(&config)?))
}

/// The data file named by the configuration. A relative path is resolved
/// against `root`, the directory of the configuration file.
pub fn data_path(config: &BoardConfig, root: Option<&Path>) -> BoardResult<Option<PathBuf>> {
    let res = match (&config.data_file, root) {
        (Some(f), _) if f.trim().is_empty() => whatever!("dataFile cannot be empty"),
        (Some(f), Some(r)) if Path::new(f).is_relative() => Some(r.join(f)),
        (Some(f), _) => Some(PathBuf::from(f)),
        (None, _) => None,
    };
    Ok(res)
}

fn validate_size(name: &str, x: Option<f64>, default: f64) -> BoardResult<f64> {
    match x {
        None => Ok(default),
        Some(s) if s.is_finite() && s >= 0.0 => Ok(s),
        Some(s) => whatever!("{} must be a non-negative number, got {}", name, s),
    }
}

/// Checks the configuration and fills in the defaults.
pub fn validate_config(config: &BoardConfig) -> BoardResult<BoardSettings> {
    let defaults = BoardSettings::default();

    let categories = match &config.categories {
        None => defaults.categories.clone(),
        Some(entries) if entries.is_empty() => whatever!("at least one category is required"),
        Some(entries) => {
            if let Some(e) = entries.iter().find(|e| e.name.trim().is_empty()) {
                whatever!("category names cannot be empty: {:?}", e)
            }
            let pairs: Vec<(String, Option<String>)> = entries
                .iter()
                .map(|e| (e.name.clone(), e.color.clone().filter(|c| !c.is_empty())))
                .collect();
            CategoryTable::new(&pairs)
        }
    };

    let layout = config.layout.clone().unwrap_or_default();
    let seed = layout.seed.unwrap_or(defaults.category_scatter.seed);
    let category_scatter = ScatterSettings {
        seed,
        max_size: validate_size(
            "categoryMaxSize",
            layout.category_max_size,
            defaults.category_scatter.max_size,
        )?,
    };
    let person_scatter = ScatterSettings {
        seed,
        max_size: validate_size(
            "personMaxSize",
            layout.person_max_size,
            defaults.person_scatter.max_size,
        )?,
    };
    let radial = RadialSettings {
        min_size: validate_size("minSize", layout.min_size, defaults.radial.min_size)?,
        max_size: validate_size("maxSize", layout.max_size, defaults.radial.max_size)?,
    };
    ensure_whatever!(
        radial.min_size <= radial.max_size,
        "minSize ({}) cannot be larger than maxSize ({})",
        radial.min_size,
        radial.max_size
    );

    let duplicate_name_mode = match config.duplicate_name_mode.as_deref() {
        None | Some("updateAll") => DuplicateNameMode::UpdateAll,
        Some("requireUnique") => DuplicateNameMode::RequireUnique,
        Some(x) => whatever!("Unknown duplicateNameMode {:?}", x),
    };

    let res = BoardSettings {
        categories,
        category_scatter,
        person_scatter,
        radial,
        duplicate_name_mode,
    };
    info!("validate_config: {:?}", res);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gives_defaults() {
        let config: BoardConfig = serde_json::from_str("{}").unwrap();
        let settings = validate_config(&config).unwrap();
        assert_eq!(settings, BoardSettings::default());
        assert_eq!(data_path(&config, None).unwrap(), None);
    }

    #[test]
    fn full_config() {
        let config: BoardConfig = serde_json::from_str(
            r##"{
                "dataFile": "votes.csv",
                "categories": [
                    {"name": "Kindness", "color": "#E74C3C"},
                    {"name": "Courage"}
                ],
                "layout": {"seed": 7, "personMaxSize": 40, "minSize": 10, "maxSize": 50},
                "duplicateNameMode": "requireUnique"
            }"##,
        )
        .unwrap();
        let settings = validate_config(&config).unwrap();
        assert_eq!(
            data_path(&config, Some(Path::new("/tmp/board"))).unwrap(),
            Some(PathBuf::from("/tmp/board/votes.csv"))
        );
        assert_eq!(settings.categories.color("Kindness"), Some("#E74C3C"));
        assert_eq!(settings.categories.color("Courage"), Some("#EF553B"));
        assert_eq!(settings.category_scatter.seed, 7);
        assert_eq!(settings.category_scatter.max_size, 100.0);
        assert_eq!(settings.person_scatter.max_size, 40.0);
        assert_eq!(settings.radial.min_size, 10.0);
        assert_eq!(
            settings.duplicate_name_mode,
            DuplicateNameMode::RequireUnique
        );
    }

    #[test]
    fn invalid_configs() {
        let bad = [
            r#"{"duplicateNameMode": "first"}"#,
            r#"{"categories": []}"#,
            r#"{"categories": [{"name": " "}]}"#,
            r#"{"layout": {"minSize": 80, "maxSize": 20}}"#,
            r#"{"layout": {"maxSize": -1}}"#,
        ];
        for s in bad.iter() {
            let config: BoardConfig = serde_json::from_str(s).unwrap();
            assert!(validate_config(&config).is_err(), "{}", s);
        }
        let config: BoardConfig = serde_json::from_str(r#"{"dataFile": " "}"#).unwrap();
        assert!(data_path(&config, None).is_err());
    }

    #[test]
    fn config_file_names_the_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("globos.json");
        fs::write(&path, r#"{"dataFile": "votes.csv", "layout": {"seed": 3}}"#).unwrap();
        let (data, settings) = read_config(path.to_str().unwrap()).unwrap();
        assert_eq!(data, Some(dir.path().join("votes.csv")));
        assert_eq!(settings.category_scatter.seed, 3);
    }

    #[test]
    fn missing_config_file() {
        assert!(matches!(
            read_config("/nonexistent/globos.json"),
            Err(BoardError::OpeningConfig { .. })
        ));
    }
}
