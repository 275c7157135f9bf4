/// Joins `base` and `path` with exactly one `/` between them.
pub fn join_base_path(base: &str, path: &str) -> Result<String, String> {
    if base.trim().is_empty() {
        return Err("base_url is empty".to_string());
    }
    let normalized_base = base.trim().trim_end_matches('/');
    let normalized_path = path.trim_start_matches('/');
    Ok(format!("{normalized_base}/{normalized_path}"))
}
