mod settings;

pub use settings::{APP_NAME, Config, ConfigFile, DATA_DIR_ENV, default_data_dir};
