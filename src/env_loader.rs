use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(root: Option<PathBuf>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    match root {
        Some(root) => Some(root.join(".env")),
        None => Some(config_dir?.join("rules-history/.env")),
    }
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("RULES_HISTORY_ROOT").map(PathBuf::from),
        dirs::config_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}
