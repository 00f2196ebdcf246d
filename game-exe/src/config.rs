//! User configuration options.
//!
//! The persisted state is exactly the generation settings: the same file
//! always rebuilds the same floor.

use std::fs::{File, OpenOptions, create_dir};
use std::io::{Read, Write};
use std::path::PathBuf;

use dirs::config_dir;
use gameplay::GenerationSettings;
use gameplay::log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::cli::CliOptions;

const BASE_DIR: &str = "gloamhall/";

fn get_cfg_file() -> PathBuf {
    let mut dir = config_dir().unwrap_or_else(|| panic!("Couldn't open user config dir"));
    dir.push(BASE_DIR);
    if !dir.exists() {
        create_dir(&dir).unwrap_or_else(|e| panic!("Couldn't create {:?}: {}", dir, e));
    }
    dir.push("user.toml");
    dir
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub level: GenerationSettings,
}

impl UserConfig {
    pub fn load() -> Self {
        let mut file = match File::open(get_cfg_file()) {
            Ok(file) => file,
            Err(_) => {
                let config = UserConfig::default();
                config.write();
                return config;
            }
        };
        let mut buf = String::new();
        if let Ok(read) = file.read_to_string(&mut buf) {
            if read != 0 {
                if let Ok(config) = toml::from_str(&buf) {
                    return config;
                }
                warn!("Could not parse user config, resetting it");
            }
        }
        let config = UserConfig::default();
        config.write();
        config
    }

    pub fn sync_cli(&mut self, cli: &CliOptions) {
        if let Some(seed) = cli.seed {
            self.level.seed = seed;
        }
        if let Some(tile_count) = cli.tile_count {
            self.level.tile_count = tile_count;
        }
        if let Some(prob_room) = cli.prob_room {
            self.level.prob_room = prob_room;
        }
    }

    pub fn write(&self) {
        let path = get_cfg_file();
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&path)
            .unwrap_or_else(|e| panic!("Couldn't open {:?}: {}", path, e));
        let data = toml::to_string_pretty(self).expect("Parse config to TOML failed");
        file.write_all(data.as_bytes())
            .unwrap_or_else(|e| error!("Could not write config: {}", e));
        info!("Wrote user config to {:?}", path);
    }
}
