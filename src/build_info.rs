//! Build metadata for `--version`

/// Generated by `built` at compile time
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Version line with build date and, when built from a git checkout, the
/// short commit hash
pub fn long_version() -> String {
    format_long_version(
        built_info::PKG_VERSION,
        env!("BUILD_DATE"),
        built_info::GIT_COMMIT_HASH_SHORT,
        built_info::GIT_DIRTY,
    )
}

fn format_long_version(
    version: &str,
    date: &str,
    commit: Option<&str>,
    dirty: Option<bool>,
) -> String {
    let mut out = format!("{} (built {}", version, date);
    if let Some(commit) = commit {
        out.push_str(", git ");
        out.push_str(commit);
        if dirty == Some(true) {
            out.push_str("-dirty");
        }
    }
    out.push(')');
    out
}
