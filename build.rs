fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");
    println!("cargo:rerun-if-env-changed=FACEGATE_API_BASE_URL");
    println!("cargo:rerun-if-env-changed=FACEGATE_MODELS_PATH");
    println!("cargo:rerun-if-env-changed=FACEGATE_MODELS_FALLBACK_URL");
    println!("cargo:rerun-if-env-changed=FACEGATE_LOG_LEVEL");
    println!("cargo:rerun-if-env-changed=FACEGATE_REQUEST_TIMEOUT_MS");

    built::write_built_file().expect("Failed to acquire build-time information");
}
