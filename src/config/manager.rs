use super::{evolution::EvolutionConfig, traits::ConfigSection};
use crate::error::{GepError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub evolution: EvolutionConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.evolution.validate()?;
        Ok(())
    }
}

/// Shared, validated application configuration backed by TOML files
#[derive(Clone, Default)]
pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GepError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| GepError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.write()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = self.read()?;
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| GepError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| GepError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig> {
        Ok(self.read()?.clone())
    }

    /// Applies `f` and keeps the result only if it validates
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.write()?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, AppConfig>> {
        self.config
            .read()
            .map_err(|_| GepError::Configuration("config lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, AppConfig>> {
        self.config
            .write()
            .map_err(|_| GepError::Configuration("config lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("karva.toml");

        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.evolution.seed = Some(42);
                c.evolution.is_transposition_lengths = vec![2, 4];
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let loaded = ConfigManager::new();
        loaded.load_from_file(&path).unwrap();
        assert_eq!(loaded.get().unwrap(), manager.get().unwrap());

        let written = std::fs::read_to_string(&path).unwrap();
        let table = format!("[{}]", EvolutionConfig::section_name());
        assert!(written.contains(&table));
    }

    #[test]
    fn test_rejected_update_keeps_previous() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.evolution.inversion_rate = 2.0);
        assert!(result.is_err());
        assert_eq!(manager.get().unwrap().evolution.inversion_rate, 0.1);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[evolution]\nexclusion_level = -1.0\n").unwrap();
        assert!(matches!(
            ConfigManager::new().load_from_file(&path),
            Err(GepError::Configuration(_))
        ));
        assert!(ConfigManager::new().load_from_file(dir.path().join("missing.toml")).is_err());
    }
}
