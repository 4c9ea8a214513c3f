use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=sdkconfig.defaults");
    println!("cargo:rerun-if-changed=bindings.h");

    if env::var("ESP_IDF_SDKCONFIG_DEFAULTS").is_err() {
        println!("cargo:warning=ESP_IDF_SDKCONFIG_DEFAULTS not set; main task stack will be the IDF default");
    }

    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        let manifest_dir = PathBuf::from(manifest_dir);
        invalidate_stale_sdkconfig(
            &manifest_dir.join("sdkconfig.defaults"),
            &manifest_dir.join("target"),
        );
    }

    embuild::espidf::sysenv::output();
}

/// esp-idf-sys caches the generated sdkconfig and ignores later edits to
/// sdkconfig.defaults. Delete the cached copy when the defaults are newer.
fn invalidate_stale_sdkconfig(defaults: &Path, target_dir: &Path) {
    let Some(defaults_time) = modified(defaults) else {
        return;
    };
    let Ok(profiles) = fs::read_dir(target_dir) else {
        return;
    };

    for build_dir in profiles
        .flatten()
        .map(|profile| profile.path().join("build"))
        .filter_map(|build| fs::read_dir(build).ok())
        .flat_map(|entries| entries.flatten())
        .map(|entry| entry.path())
        .filter(|path| path.to_string_lossy().contains("esp-idf-sys"))
    {
        let sdkconfig = build_dir.join("out/esp-idf/sdkconfig");
        if modified(&sdkconfig).is_some_and(|cached| defaults_time > cached) {
            println!("cargo:warning=sdkconfig.defaults changed, regenerating sdkconfig");
            let _ = fs::remove_file(&sdkconfig);
            let _ = fs::remove_dir_all(build_dir.join("out/esp-idf/sdkconfig.d"));
        }
    }
}

fn modified(path: &Path) -> Option<std::time::SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
