#[allow(dead_code, clippy::doc_markdown, clippy::needless_raw_string_hashes)]
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub fn git_commit_hash() -> &'static str {
    match built_info::GIT_COMMIT_HASH_SHORT {
        Some(value) if !value.is_empty() => value,
        _ => "unknown",
    }
}

pub fn version() -> &'static str {
    built_info::PKG_VERSION
}
