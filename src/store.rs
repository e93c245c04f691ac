//! Top score persistence
//!
//! Stored in ~/.config/pivotris/scores.toml (or platform equivalent)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Somewhere the best score survives between sessions
pub trait TopScoreStore {
    /// The stored best score, or None if nothing has been saved yet
    fn load_top_score(&self) -> Option<u64>;

    /// Record a new best score
    fn save_top_score(&mut self, score: u64) -> Result<(), String>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ScoreFile {
    top_score: u64,
}

/// TOML file in the platform config directory
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: Option<PathBuf>,
}

impl FileScoreStore {
    /// Store at the default location
    pub fn new() -> Self {
        let path = ProjectDirs::from("com", "pivotris", "pivotris")
            .map(|dirs| dirs.config_dir().join("scores.toml"));
        Self { path }
    }

    /// Store at an explicit path
    #[cfg(test)]
    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TopScoreStore for FileScoreStore {
    fn load_top_score(&self) -> Option<u64> {
        let path = self.path.as_ref()?;
        let contents = fs::read_to_string(path).ok()?;
        toml::from_str::<ScoreFile>(&contents)
            .ok()
            .map(|file| file.top_score)
    }

    fn save_top_score(&mut self, score: u64) -> Result<(), String> {
        let Some(path) = &self.path else {
            return Err("Could not determine score file path".to_string());
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let contents = toml::to_string(&ScoreFile { top_score: score })
            .map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(path, contents).map_err(|e| format!("Failed to write scores: {}", e))
    }
}

/// Keeps the score in memory only
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    top_score: Option<u64>,
    /// Every value passed to `save_top_score`, oldest first
    pub saves: Vec<u64>,
}

#[cfg(test)]
impl MemoryScoreStore {
    pub fn with_top_score(score: u64) -> Self {
        Self {
            top_score: Some(score),
            saves: Vec::new(),
        }
    }
}

#[cfg(test)]
impl TopScoreStore for MemoryScoreStore {
    fn load_top_score(&self) -> Option<u64> {
        self.top_score
    }

    fn save_top_score(&mut self, score: u64) -> Result<(), String> {
        self.top_score = Some(score);
        self.saves.push(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pivotris-test-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("scores.toml")
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path("round-trip");
        let mut store = FileScoreStore::at(path.clone());
        assert_eq!(store.load_top_score(), None);

        store.save_top_score(1240).unwrap();
        assert_eq!(FileScoreStore::at(path.clone()).load_top_score(), Some(1240));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let path = temp_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "top_score = \"lots\"").unwrap();
        assert_eq!(FileScoreStore::at(path.clone()).load_top_score(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_memory_store_records_saves() {
        let mut store = MemoryScoreStore::with_top_score(10);
        assert_eq!(store.load_top_score(), Some(10));
        store.save_top_score(40).unwrap();
        store.save_top_score(140).unwrap();
        assert_eq!(store.load_top_score(), Some(140));
        assert_eq!(store.saves, vec![40, 140]);
    }
}
