const DOCUMENTATION: &str = r#"# Sketchpad settings. You may edit this file, but be aware that formatting and comments will not
# be preserved, and all keys and values are case sensitive.

# log_level: one of "off", "error", "warn", "info", "debug", "trace".
# enforce_admission: when true, manipulation gestures only start on the selected layer, as a
# platform would. When false, every delivered event reaches the layer's handlers.
# report_transforms: print each layer's full matrix after replaying.

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub enforce_admission: bool,
    pub report_transforms: bool,
    #[serde(skip)]
    failed_to_load: bool,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "debug".to_owned(),
            enforce_admission: true,
            report_transforms: true,
            failed_to_load: false,
        }
    }
}
impl Settings {
    const FILENAME: &'static str = "settings.toml";
    /// Load from user preferences, or default if unavailable for some reason.
    ///
    /// Runs before logging is up, so failures are only recorded, see [`Self::did_fail_to_load`].
    #[must_use]
    pub fn load() -> Self {
        match Self::path() {
            None => Self::failed(),
            Some(path) => Self::load_or_default(&path),
        }
    }
    /// Where the settings live, if the platform has a preferences directory.
    #[must_use]
    pub fn path() -> Option<std::path::PathBuf> {
        let mut path = preferences_dir()?;
        path.push(Self::FILENAME);
        Some(path)
    }
    fn failed() -> Self {
        Self {
            failed_to_load: true,
            ..Self::default()
        }
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let settings: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            Ok(Self::from_toml(&string)?)
        };
        settings.unwrap_or_else(|_| Self::failed())
    }
    pub fn from_toml(string: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(string)
    }
    /// Return true if loading the user's settings failed and defaults are in use.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    /// The configured log filter, `Debug` if unrecognized.
    #[must_use]
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Debug)
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicitly do *not* create recursively. If the parent is missing, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        let string = DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(self)?;
        std::fs::write(preferences.join(Self::FILENAME), string)?;
        Ok(())
    }
}
