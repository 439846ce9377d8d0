use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Кладёт config.toml и каталог migrations рядом с собранным бинарником,
/// чтобы сервер находил их без указания путей.
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=../../migrations");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is not set");
    let profile = env::var("PROFILE").expect("PROFILE is not set"); // "debug" or "release"

    // OUT_DIR: target/<profile>/build/rental-backend-xxx/out
    let target_dir = Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .expect("Could not find target profile directory")
        .to_path_buf();

    let workspace_root: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("Could not find workspace root")
        .to_path_buf();

    let source_config = workspace_root.join("config.toml");
    if source_config.exists() {
        fs::copy(&source_config, target_dir.join("config.toml"))
            .unwrap_or_else(|e| panic!("Failed to copy config.toml: {}", e));
    } else {
        println!("cargo:warning=config.toml not found at {:?}, using default config", source_config);
    }

    let source_migrations = workspace_root.join("migrations");
    if source_migrations.is_dir() {
        let dest = target_dir.join("migrations");
        fs::create_dir_all(&dest).unwrap_or_else(|e| panic!("Failed to create {:?}: {}", dest, e));
        let entries = fs::read_dir(&source_migrations)
            .unwrap_or_else(|e| panic!("Failed to read migrations: {}", e));
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|ext| ext == "sql").unwrap_or(false) {
                let name = entry.file_name();
                fs::copy(&path, dest.join(&name))
                    .unwrap_or_else(|e| panic!("Failed to copy {:?}: {}", path, e));
            }
        }
    }
}
